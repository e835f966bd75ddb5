//! Simulation core for the skylark viewer.
//!
//! Everything in this crate is plain state plus arithmetic over `glam`
//! types: the free-fly and tracking cameras, the scripted launch animation,
//! the light rig, the exhaust particle pool, and per-frame render-view
//! assembly. Nothing here touches the window or the GPU, so the whole crate
//! runs under `cargo test` without a graphics context.

use glam::Vec3;

pub mod animation;
pub mod camera;
pub mod lights;
pub mod particles;
pub mod state;
pub mod view;

pub use animation::{AnimationState, LAUNCH_DURATION};
pub use camera::{CameraMode, FlyCamera, MoveState, TrackingCamera};
pub use lights::{LightRig, PointLight};
pub use particles::{ParticleSprite, ParticleSystem, EXHAUST_RATE, POOL_CAPACITY};
pub use state::SceneState;
pub use view::{split_widths, Projection, RenderView, SplitScreen, Viewport};

/// Up axis shared by every camera and orientation derivation.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Normalize `v`, falling back to a known-good axis when the input is too
/// short to carry a direction.
pub(crate) fn safe_dir(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len <= 1e-6 {
        fallback
    } else {
        v / len
    }
}
