//! Window management and input handling.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use skylark_sim::SceneState;

use crate::renderer::Renderer;
use crate::scene::SceneAssets;

pub struct App {
    asset_dir: PathBuf,
    window_size: PhysicalSize<u32>,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    state: Option<SceneState>,

    modifiers: ModifiersState,
    mouse_look: bool,
    last_frame: Instant,
}

impl App {
    pub fn new(asset_dir: PathBuf, width: u32, height: u32) -> Self {
        Self {
            asset_dir,
            window_size: PhysicalSize::new(width, height),
            window: None,
            renderer: None,
            state: None,
            modifiers: ModifiersState::empty(),
            mouse_look: false,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, pressed: bool, repeat: bool) {
        let Some(state) = &mut self.state else {
            return;
        };

        match key {
            // Held movement keys
            KeyCode::KeyW => state.movement.forward = pressed,
            KeyCode::KeyS => state.movement.backward = pressed,
            KeyCode::KeyA => state.movement.left = pressed,
            KeyCode::KeyD => state.movement.right = pressed,
            KeyCode::KeyE => state.movement.up = pressed,
            KeyCode::KeyQ => state.movement.down = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => state.movement.fast = pressed,
            KeyCode::ControlLeft | KeyCode::ControlRight => state.movement.slow = pressed,

            // One-shot toggles
            _ if pressed && !repeat => match key {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Digit1 => state.lights.toggle_point(0),
                KeyCode::Digit2 => state.lights.toggle_point(1),
                KeyCode::Digit3 => state.lights.toggle_point(2),
                KeyCode::Digit4 => state.lights.toggle_sun(),
                KeyCode::KeyF => state.animation.toggle_play(),
                KeyCode::KeyR => state.animation.reset(),
                KeyCode::KeyC => {
                    if self.modifiers.shift_key() {
                        state.split.cycle_secondary();
                    } else {
                        state.split.cycle_primary();
                    }
                }
                KeyCode::KeyV => state.split.toggle(),
                _ => {}
            },
            _ => {}
        }
    }

    fn toggle_mouse_look(&mut self) {
        self.mouse_look = !self.mouse_look;
        if let Some(window) = &self.window {
            if self.mouse_look {
                let _ = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                window.set_cursor_visible(false);
            } else {
                let _ = window.set_cursor_grab(CursorGrabMode::None);
                window.set_cursor_visible(true);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title("Skylark")
            .with_inner_size(self.window_size);

        let window = Arc::new(event_loop.create_window(attrs).unwrap());

        let assets = SceneAssets::load(&self.asset_dir).expect("failed to load scene assets");

        let mut state = SceneState::new(assets.vehicle_base, assets.lights);
        assets.place_camera(&mut state.camera);

        let renderer = pollster::block_on(Renderer::new(Arc::clone(&window), &assets))
            .expect("failed to create renderer");

        tracing::info!(
            "scene ready: {} terrain vertices, terrain radius {:.1}",
            assets.terrain_vertices.len(),
            assets.terrain_bounds.radius,
        );

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.state = Some(state);
        self.last_frame = Instant::now();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    self.handle_key(event_loop, key, pressed, event.repeat);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Right,
                ..
            } => {
                self.toggle_mouse_look();
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                if let (Some(renderer), Some(state)) = (&mut self.renderer, &mut self.state) {
                    state.advance(dt);
                    renderer.prepare_frame(state);
                    if let Err(err) = renderer.render() {
                        tracing::error!("render failed: {err:#}");
                        event_loop.exit();
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_look {
                if let Some(state) = &mut self.state {
                    state.camera.apply_mouse(dx as f32, dy as f32);
                }
            }
        }
    }
}
