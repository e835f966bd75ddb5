//! Free-fly camera and the Free/Follow/Ground tracking modes.

use glam::{Mat4, Vec3, Vec4};

use crate::{safe_dir, WORLD_UP};

/// Movement keys currently held, as reported by the windowing layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fast: bool,
    pub slow: bool,
}

/// Yaw/pitch fly camera.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians, around the world up axis.
    pub yaw: f32,
    /// Radians, clamped short of straight up/down.
    pub pitch: f32,
    /// Meters per second before modifiers.
    pub base_speed: f32,
    pub fast_multiplier: f32,
    pub slow_multiplier: f32,
    /// Radians per cursor pixel.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            base_speed: 35.0,
            fast_multiplier: 6.0,
            slow_multiplier: 0.2,
            sensitivity: 0.0025,
        }
    }
}

impl FlyCamera {
    /// Forward direction from the current yaw/pitch.
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        safe_dir(
            Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch),
            WORLD_UP,
        )
    }

    /// Apply a cursor delta to yaw/pitch.
    pub fn apply_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;

        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    /// Point the camera at a world position.
    pub fn aim_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() < 1e-12 {
            return;
        }
        let dir = dir.normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
    }

    /// Move the camera from held keys. Horizontal axes follow the view
    /// direction; vertical movement is along world up.
    pub fn advance(&mut self, input: &MoveState, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let forward = self.forward();
        let right = safe_dir(forward.cross(WORLD_UP), Vec3::X);

        let mut movement = Vec3::ZERO;
        if input.forward {
            movement += forward;
        }
        if input.backward {
            movement -= forward;
        }
        if input.right {
            movement += right;
        }
        if input.left {
            movement -= right;
        }
        if input.up {
            movement += WORLD_UP;
        }
        if input.down {
            movement -= WORLD_UP;
        }

        if movement.length_squared() > 0.0 {
            movement = movement.normalize();
        }

        let mut speed = self.base_speed;
        if input.fast {
            speed *= self.fast_multiplier;
        }
        if input.slow {
            speed *= self.slow_multiplier;
        }

        self.position += movement * (speed * dt);
    }

    pub fn view_matrix(&self) -> Mat4 {
        view_from_forward(self.position, self.forward())
    }
}

/// How a viewport tracks the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Follow,
    Ground,
}

impl CameraMode {
    /// Cycle Free -> Follow -> Ground -> Free.
    pub fn next(self) -> Self {
        match self {
            CameraMode::Free => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Ground,
            CameraMode::Ground => CameraMode::Free,
        }
    }
}

/// Per-viewport camera selection plus the fixed anchor points the non-free
/// modes use.
#[derive(Clone, Copy, Debug)]
pub struct TrackingCamera {
    pub mode: CameraMode,
    /// World-space position of the fixed ground camera.
    pub ground_position: Vec3,
    /// Offset from the vehicle, in the vehicle's local frame.
    pub follow_offset: Vec3,
}

impl Default for TrackingCamera {
    fn default() -> Self {
        Self {
            mode: CameraMode::Free,
            ground_position: Vec3::new(-30.0, 0.0, 20.0),
            follow_offset: Vec3::new(0.0, 5.0, -15.0),
        }
    }
}

impl TrackingCamera {
    /// View matrix for the current mode. Pure: reads the free camera and the
    /// vehicle transform, mutates nothing.
    pub fn view_matrix(&self, free: &FlyCamera, vehicle: &Mat4) -> Mat4 {
        let target = vehicle.w_axis.truncate();
        match self.mode {
            CameraMode::Free => free.view_matrix(),
            CameraMode::Follow => {
                let eye = target + vehicle.transform_vector3(self.follow_offset);
                view_from_forward(eye, safe_dir(target - eye, WORLD_UP))
            }
            CameraMode::Ground => {
                let eye = self.ground_position;
                view_from_forward(eye, safe_dir(target - eye, WORLD_UP))
            }
        }
    }
}

/// Right-handed view matrix from an eye point and a forward direction.
/// The right axis falls back to +X when forward is near-parallel to world up.
pub(crate) fn view_from_forward(eye: Vec3, forward: Vec3) -> Mat4 {
    let right = safe_dir(forward.cross(WORLD_UP), Vec3::X);
    let up = right.cross(forward);

    Mat4::from_cols(
        Vec4::new(right.x, up.x, -forward.x, 0.0),
        Vec4::new(right.y, up.y, -forward.y, 0.0),
        Vec4::new(right.z, up.z, -forward.z, 0.0),
        Vec4::new(-right.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cycle_returns_after_three_steps() {
        for mode in [CameraMode::Free, CameraMode::Follow, CameraMode::Ground] {
            assert_eq!(mode.next().next().next(), mode);
        }
    }

    #[test]
    fn forward_at_rest_points_along_x() {
        let camera = FlyCamera::default();
        let forward = camera.forward();
        assert!((forward - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn pitch_clamps_short_of_vertical() {
        let mut camera = FlyCamera::default();
        camera.apply_mouse(0.0, -1e6);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.apply_mouse(0.0, 1e6);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn view_matrix_centers_eye_and_looks_down_negative_z() {
        let mut camera = FlyCamera::default();
        camera.position = Vec3::new(3.0, 1.0, -2.0);
        camera.yaw = 0.7;
        camera.pitch = -0.3;

        let view = camera.view_matrix();
        let eye = view * camera.position.extend(1.0);
        assert!(eye.truncate().length() < 1e-5);

        let ahead = view * (camera.position + camera.forward()).extend(1.0);
        assert!(ahead.x.abs() < 1e-5);
        assert!(ahead.y.abs() < 1e-5);
        assert!((ahead.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn advance_applies_speed_modifiers() {
        let dt = 0.5;
        let base = {
            let mut camera = FlyCamera::default();
            camera.advance(
                &MoveState {
                    forward: true,
                    ..MoveState::default()
                },
                dt,
            );
            camera.position.length()
        };

        let fast = {
            let mut camera = FlyCamera::default();
            camera.advance(
                &MoveState {
                    forward: true,
                    fast: true,
                    ..MoveState::default()
                },
                dt,
            );
            camera.position.length()
        };

        assert!((fast - base * 6.0).abs() < 1e-3);
    }

    #[test]
    fn advance_ignores_non_positive_dt() {
        let mut camera = FlyCamera::default();
        let before = camera.position;
        camera.advance(
            &MoveState {
                forward: true,
                ..MoveState::default()
            },
            0.0,
        );
        assert_eq!(camera.position, before);
    }

    #[test]
    fn follow_camera_keeps_vehicle_centered() {
        let tracking = TrackingCamera {
            mode: CameraMode::Follow,
            ..TrackingCamera::default()
        };
        let vehicle = Mat4::from_translation(Vec3::new(10.0, 4.0, -6.0));
        let view = tracking.view_matrix(&FlyCamera::default(), &vehicle);

        let target = view * vehicle.w_axis;
        // The vehicle sits straight ahead of the camera.
        assert!(target.x.abs() < 1e-4);
        assert!(target.y.abs() < 1e-4);
        let expected = tracking.follow_offset.length();
        assert!((target.z + expected).abs() < 1e-3);
    }

    #[test]
    fn ground_camera_watches_from_fixed_point() {
        let tracking = TrackingCamera {
            mode: CameraMode::Ground,
            ..TrackingCamera::default()
        };
        let vehicle = Mat4::from_translation(Vec3::new(5.0, 30.0, 5.0));
        let view = tracking.view_matrix(&FlyCamera::default(), &vehicle);

        let eye = view * tracking.ground_position.extend(1.0);
        assert!(eye.truncate().length() < 1e-4);

        let target = view * vehicle.w_axis;
        assert!(target.x.abs() < 1e-3);
        assert!(target.y.abs() < 1e-3);
        assert!(target.z < 0.0);
    }
}
