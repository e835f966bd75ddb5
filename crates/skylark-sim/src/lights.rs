//! Scene light rig: three point lights riding the vehicle plus one
//! directional "sun".

use glam::Vec3;

use crate::safe_dir;

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub enabled: bool,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightRig {
    pub points: [PointLight; 3],
    pub sun_direction: Vec3,
    pub sun_enabled: bool,
    pub ambient: Vec3,
    pub diffuse: Vec3,
}

impl LightRig {
    pub fn new(points: [PointLight; 3]) -> Self {
        Self {
            points,
            sun_direction: safe_dir(Vec3::new(0.0, 1.0, -1.0), Vec3::Y),
            sun_enabled: true,
            ambient: Vec3::splat(0.25),
            diffuse: Vec3::splat(0.75),
        }
    }

    pub fn toggle_point(&mut self, index: usize) {
        if let Some(light) = self.points.get_mut(index) {
            light.enabled = !light.enabled;
        }
    }

    pub fn toggle_sun(&mut self) {
        self.sun_enabled = !self.sun_enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_and_restore() {
        let mut rig = LightRig::new([PointLight::new(Vec3::ZERO, Vec3::X); 3]);

        rig.toggle_point(1);
        assert!(!rig.points[1].enabled);
        assert!(rig.points[0].enabled && rig.points[2].enabled);
        rig.toggle_point(1);
        assert!(rig.points[1].enabled);

        rig.toggle_sun();
        assert!(!rig.sun_enabled);

        // Out-of-range toggles are ignored.
        rig.toggle_point(7);
    }
}
