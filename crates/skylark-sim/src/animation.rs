//! Scripted launch animation for the vehicle.
//!
//! The trajectory is a fixed cubic/quadratic blend over an eight second
//! window; orientation is not scripted but derived from the instantaneous
//! velocity each frame. The three point lights are rigidly attached to the
//! vehicle: their offsets are captured once at construction and never
//! recomputed.

use glam::{Mat4, Vec3};

use crate::lights::PointLight;
use crate::{safe_dir, WORLD_UP};

/// Seconds from ignition to the parked end-of-flight transform.
pub const LAUNCH_DURATION: f32 = 8.0;

/// Total travel along each world axis over the full flight.
const TRAVEL_RANGE: Vec3 = Vec3::new(60.0, 40.0, 20.0);

/// Below this speed the derived heading is unreliable; hold world up instead.
const MIN_HEADING_SPEED: f32 = 1e-4;

#[derive(Clone, Copy, Debug)]
pub struct AnimationState {
    pub active: bool,
    pub paused: bool,
    elapsed: f32,
    start_position: Vec3,
    last_position: Vec3,
    base_transform: Mat4,
    current_transform: Mat4,
    light_offsets: [Vec3; 3],
}

impl AnimationState {
    /// Capture the resting vehicle transform and the initial light positions.
    /// Light offsets are fixed here for the lifetime of the state.
    pub fn new(base_transform: Mat4, lights: &[PointLight; 3]) -> Self {
        let start_position = base_transform.w_axis.truncate();
        let light_offsets = [
            lights[0].position - start_position,
            lights[1].position - start_position,
            lights[2].position - start_position,
        ];

        Self {
            active: false,
            paused: false,
            elapsed: 0.0,
            start_position,
            last_position: start_position,
            base_transform,
            current_transform: base_transform,
            light_offsets,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn current_transform(&self) -> Mat4 {
        self.current_transform
    }

    pub fn light_offsets(&self) -> [Vec3; 3] {
        self.light_offsets
    }

    /// Start playback from rest, or flip pause while in flight.
    pub fn toggle_play(&mut self) {
        if !self.active {
            self.active = true;
            self.paused = false;
            self.elapsed = 0.0;
            self.last_position = self.start_position;
        } else {
            self.paused = !self.paused;
        }
    }

    /// Rewind to the resting transform.
    pub fn reset(&mut self) {
        self.active = false;
        self.paused = false;
        self.elapsed = 0.0;
        self.current_transform = self.base_transform;
        self.last_position = self.start_position;
    }

    /// Advance the animation and refresh the light positions.
    ///
    /// Inactive, paused, or non-positive `dt` is an idempotent freeze: the
    /// stored transform is returned unchanged and lights are re-derived from
    /// it, so the vehicle stays parked wherever the flight left it.
    pub fn update(&mut self, dt: f32, lights: &mut [PointLight; 3]) -> Mat4 {
        if !self.active || self.paused || dt <= 0.0 {
            let position = self.current_transform.w_axis.truncate();
            self.place_lights(position, lights);
            return self.current_transform;
        }

        self.elapsed += dt;
        let u = (self.elapsed / LAUNCH_DURATION).clamp(0.0, 1.0);
        let u2 = u * u;
        let u3 = u2 * u;

        let offset = Vec3::new(
            TRAVEL_RANGE.x * u3,
            TRAVEL_RANGE.y * u2,
            TRAVEL_RANGE.z * u3,
        );
        let position = self.start_position + offset;

        let velocity = (position - self.last_position) / dt;
        self.last_position = position;

        let forward = if velocity.length() < MIN_HEADING_SPEED {
            WORLD_UP
        } else {
            velocity.normalize()
        };

        // Build a stable side reference, flipping it away from forward when
        // the two are near-parallel.
        let mut side = Vec3::Z;
        if side.dot(forward).abs() > 0.9 {
            side = Vec3::X;
        }
        let right = safe_dir(side.cross(forward), Vec3::X);
        let up = forward.cross(right);

        self.current_transform = Mat4::from_cols(
            right.extend(0.0),
            forward.extend(0.0),
            up.extend(0.0),
            position.extend(1.0),
        );

        self.place_lights(position, lights);

        if u >= 1.0 {
            self.active = false;
            self.paused = false;
        }

        self.current_transform
    }

    fn place_lights(&self, position: Vec3, lights: &mut [PointLight; 3]) {
        for (light, offset) in lights.iter_mut().zip(self.light_offsets) {
            light.position = position + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lights() -> [PointLight; 3] {
        [
            PointLight::new(Vec3::new(6.0, 3.0, 0.0), Vec3::new(100.0, 0.0, 0.0)),
            PointLight::new(Vec3::new(-3.0, 3.0, 5.2), Vec3::new(0.0, 100.0, 0.0)),
            PointLight::new(Vec3::new(-3.0, 3.0, -5.2), Vec3::new(0.0, 0.0, 100.0)),
        ]
    }

    fn launched() -> (AnimationState, [PointLight; 3]) {
        let mut lights = test_lights();
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);
        anim.toggle_play();
        anim.update(0.016, &mut lights);
        (anim, lights)
    }

    #[test]
    fn replay_is_deterministic() {
        let mut lights_a = test_lights();
        let mut lights_b = test_lights();
        let mut a = AnimationState::new(Mat4::IDENTITY, &lights_a);
        let mut b = AnimationState::new(Mat4::IDENTITY, &lights_b);
        a.toggle_play();
        b.toggle_play();

        for step in 0..200 {
            let dt = if step % 3 == 0 { 0.016 } else { 0.021 };
            let ta = a.update(dt, &mut lights_a);
            let tb = b.update(dt, &mut lights_b);
            assert_eq!(ta.to_cols_array(), tb.to_cols_array());
        }
    }

    #[test]
    fn zero_dt_is_an_idempotent_freeze() {
        let (mut anim, mut lights) = launched();
        let before = anim.current_transform();
        let elapsed = anim.elapsed();

        let frozen = anim.update(0.0, &mut lights);
        assert_eq!(frozen.to_cols_array(), before.to_cols_array());
        assert_eq!(anim.elapsed(), elapsed);

        let frozen = anim.update(-1.0, &mut lights);
        assert_eq!(frozen.to_cols_array(), before.to_cols_array());
        assert_eq!(anim.elapsed(), elapsed);
    }

    #[test]
    fn pause_freezes_without_losing_progress() {
        let (mut anim, mut lights) = launched();
        anim.toggle_play();
        assert!(anim.paused);

        let before = anim.current_transform();
        let elapsed = anim.elapsed();
        let frozen = anim.update(0.5, &mut lights);
        assert_eq!(frozen.to_cols_array(), before.to_cols_array());
        assert_eq!(anim.elapsed(), elapsed);

        // Second toggle resumes rather than restarting.
        anim.toggle_play();
        assert!(anim.active && !anim.paused);
        assert_eq!(anim.elapsed(), elapsed);
    }

    #[test]
    fn completes_exactly_at_full_duration() {
        let mut lights = test_lights();
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);
        anim.toggle_play();

        let transform = anim.update(LAUNCH_DURATION, &mut lights);
        assert!(!anim.active);
        assert!(!anim.paused);

        let position = transform.w_axis.truncate();
        assert_eq!(position, Vec3::new(60.0, 40.0, 20.0));
    }

    #[test]
    fn stays_parked_after_completion() {
        let mut lights = test_lights();
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);
        anim.toggle_play();
        let finished = anim.update(LAUNCH_DURATION, &mut lights);

        let held = anim.update(0.016, &mut lights);
        assert_eq!(held.to_cols_array(), finished.to_cols_array());
        assert_eq!(held.w_axis.truncate(), Vec3::new(60.0, 40.0, 20.0));
    }

    #[test]
    fn lights_stay_rigidly_offset() {
        let mut lights = test_lights();
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);
        let offsets = anim.light_offsets();
        anim.toggle_play();

        for _ in 0..120 {
            let transform = anim.update(0.03, &mut lights);
            let position = transform.w_axis.truncate();
            for (light, offset) in lights.iter().zip(offsets) {
                assert!((light.position - position - offset).length() < 1e-4);
            }
        }
    }

    #[test]
    fn orientation_stays_orthonormal_in_flight() {
        let mut lights = test_lights();
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);
        anim.toggle_play();

        for _ in 0..100 {
            let transform = anim.update(0.05, &mut lights);
            let right = transform.x_axis.truncate();
            let forward = transform.y_axis.truncate();
            let up = transform.z_axis.truncate();
            assert!((right.length() - 1.0).abs() < 1e-4);
            assert!((forward.length() - 1.0).abs() < 1e-4);
            assert!((up.length() - 1.0).abs() < 1e-4);
            assert!(right.dot(forward).abs() < 1e-4);
            assert!(forward.dot(up).abs() < 1e-4);
            assert!(up.dot(right).abs() < 1e-4);
        }
    }

    #[test]
    fn reset_returns_to_base() {
        let base = Mat4::from_translation(Vec3::new(-20.0, 0.3, 12.0));
        let mut lights = test_lights();
        let mut anim = AnimationState::new(base, &lights);
        anim.toggle_play();
        anim.update(3.0, &mut lights);

        anim.reset();
        assert!(!anim.active);
        assert_eq!(anim.elapsed(), 0.0);
        assert_eq!(
            anim.current_transform().to_cols_array(),
            base.to_cols_array()
        );

        // Replaying after reset matches a fresh run.
        let mut fresh_lights = test_lights();
        let mut fresh = AnimationState::new(base, &fresh_lights);
        fresh.toggle_play();
        anim.toggle_play();
        let ta = anim.update(1.0, &mut lights);
        let tb = fresh.update(1.0, &mut fresh_lights);
        assert_eq!(ta.to_cols_array(), tb.to_cols_array());
    }

    #[test]
    fn freeze_before_first_play_reports_base_lights() {
        let mut lights = test_lights();
        let initial = lights;
        let mut anim = AnimationState::new(Mat4::IDENTITY, &lights);

        anim.update(0.016, &mut lights);
        for (light, init) in lights.iter().zip(initial) {
            assert!((light.position - init.position).length() < 1e-6);
        }
    }
}
