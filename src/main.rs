use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod geometry;
mod gpu_types;
mod renderer;
mod scene;

use crate::app::App;

#[derive(Parser)]
#[command(name = "skylark")]
#[command(about = "Interactive 3D terrain viewer with a scripted rocket launch")]
struct Args {
    /// Directory containing terrain.obj, terrain.jpg and pad.obj
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "720")]
    height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args.assets, args.width, args.height);
    event_loop.run_app(&mut app)?;

    Ok(())
}
