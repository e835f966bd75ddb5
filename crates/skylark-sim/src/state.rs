//! Per-process simulation state and the per-frame step.

use glam::{Mat4, Vec3};

use crate::animation::AnimationState;
use crate::camera::{FlyCamera, MoveState, TrackingCamera};
use crate::lights::LightRig;
use crate::particles::{ParticleSystem, EXHAUST_RATE, POOL_CAPACITY};
use crate::view::{self, Projection, RenderView, SplitScreen};
use crate::safe_dir;

/// All mutable scene state, owned by the app and threaded by reference into
/// the update and render paths. No globals.
pub struct SceneState {
    pub camera: FlyCamera,
    pub movement: MoveState,
    pub tracking: TrackingCamera,
    pub split: SplitScreen,
    pub animation: AnimationState,
    pub lights: LightRig,
    pub particles: ParticleSystem,
    pub vehicle_transform: Mat4,
    pub projection: Projection,
}

impl SceneState {
    pub fn new(vehicle_base: Mat4, lights: LightRig) -> Self {
        Self {
            camera: FlyCamera::default(),
            movement: MoveState::default(),
            tracking: TrackingCamera::default(),
            split: SplitScreen::default(),
            animation: AnimationState::new(vehicle_base, &lights.points),
            lights,
            particles: ParticleSystem::new(POOL_CAPACITY),
            vehicle_transform: vehicle_base,
            projection: Projection::default(),
        }
    }

    /// One simulation step.
    ///
    /// Two clocks share the frame delta: the free camera always runs live,
    /// while the animation and the exhaust see a simulation delta that drops
    /// to zero whenever playback is paused.
    pub fn advance(&mut self, dt: f32) {
        self.camera.advance(&self.movement, dt);

        self.vehicle_transform = self.animation.update(dt, &mut self.lights.points);

        let sim_dt = if self.animation.paused { 0.0 } else { dt };
        if sim_dt > 0.0 {
            let position = self.vehicle_transform.w_axis.truncate();
            let forward = safe_dir(self.vehicle_transform.y_axis.truncate(), Vec3::Z);
            let emitter = position - forward * 2.0 + Vec3::new(0.0, -0.3, 0.0);

            self.particles
                .emit(emitter, -forward, EXHAUST_RATE, sim_dt);
            self.particles.update(sim_dt);
        }
    }

    /// The view list for this frame: one full-window view, or two panes in
    /// split-screen.
    pub fn views(&self, fb_width: u32, fb_height: u32) -> Vec<RenderView> {
        view::assemble_views(
            &self.split,
            &self.tracking,
            &self.camera,
            &self.vehicle_transform,
            &self.projection,
            fb_width,
            fb_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::PointLight;

    fn test_state() -> SceneState {
        let lights = LightRig::new([
            PointLight::new(Vec3::new(6.0, 3.0, 0.0), Vec3::new(100.0, 0.0, 0.0)),
            PointLight::new(Vec3::new(-3.0, 3.0, 5.2), Vec3::new(0.0, 100.0, 0.0)),
            PointLight::new(Vec3::new(-3.0, 3.0, -5.2), Vec3::new(0.0, 0.0, 100.0)),
        ]);
        SceneState::new(Mat4::IDENTITY, lights)
    }

    #[test]
    fn exhaust_runs_while_parked() {
        let mut state = test_state();
        state.advance(0.1);
        assert!(state.particles.alive_count() > 0);
    }

    #[test]
    fn camera_stays_live_while_animation_is_paused() {
        let mut state = test_state();
        state.animation.toggle_play();
        state.advance(0.5);
        state.animation.toggle_play();
        assert!(state.animation.paused);

        let elapsed = state.animation.elapsed();
        let alive = state.particles.alive_count();
        let vehicle = state.vehicle_transform;

        state.movement.forward = true;
        let camera_before = state.camera.position;
        state.advance(0.25);

        // Camera moved; the simulation clock did not.
        assert!((state.camera.position - camera_before).length() > 0.0);
        assert_eq!(state.animation.elapsed(), elapsed);
        assert_eq!(state.particles.alive_count(), alive);
        assert_eq!(
            state.vehicle_transform.to_cols_array(),
            vehicle.to_cols_array()
        );
    }

    #[test]
    fn views_track_the_split_toggle() {
        let mut state = test_state();
        assert_eq!(state.views(1280, 720).len(), 1);
        state.split.toggle();
        assert_eq!(state.views(1280, 720).len(), 2);
    }
}
