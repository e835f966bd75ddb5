//! Per-frame render-view assembly: projection, viewports, split-screen.

use glam::Mat4;

use crate::camera::{CameraMode, FlyCamera, TrackingCamera};

/// Perspective projection parameters shared by every viewport.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_3,
            near: 0.5,
            far: 4000.0,
        }
    }
}

impl Projection {
    /// Projection matrix for a viewport of the given pixel size.
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything the renderer needs to draw one on-screen view.
#[derive(Clone, Copy, Debug)]
pub struct RenderView {
    pub view: Mat4,
    pub proj: Mat4,
    pub viewport: Viewport,
}

/// Split-screen toggle plus the camera mode shown in each pane.
#[derive(Clone, Copy, Debug)]
pub struct SplitScreen {
    pub enabled: bool,
    pub primary: CameraMode,
    pub secondary: CameraMode,
}

impl Default for SplitScreen {
    fn default() -> Self {
        Self {
            enabled: false,
            primary: CameraMode::Free,
            secondary: CameraMode::Follow,
        }
    }
}

impl SplitScreen {
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn cycle_primary(&mut self) {
        self.primary = self.primary.next();
    }

    pub fn cycle_secondary(&mut self) {
        self.secondary = self.secondary.next();
    }
}

/// Left/right pane widths for a framebuffer of width `width`. Both panes are
/// kept at least one pixel wide.
pub fn split_widths(width: u32) -> (u32, u32) {
    let width = width.max(1);
    let left = (width / 2).max(1);
    let right = (width - left).max(1);
    (left, right)
}

/// Build the one or two views drawn this frame.
pub fn assemble_views(
    split: &SplitScreen,
    tracking: &TrackingCamera,
    camera: &FlyCamera,
    vehicle: &Mat4,
    projection: &Projection,
    fb_width: u32,
    fb_height: u32,
) -> Vec<RenderView> {
    let height = fb_height.max(1);
    let primary = TrackingCamera {
        mode: split.primary,
        ..*tracking
    };

    if !split.enabled {
        let viewport = Viewport {
            x: 0,
            y: 0,
            width: fb_width.max(1),
            height,
        };
        return vec![RenderView {
            view: primary.view_matrix(camera, vehicle),
            proj: projection.matrix(viewport.width, viewport.height),
            viewport,
        }];
    }

    let (left_width, right_width) = split_widths(fb_width);
    let secondary = TrackingCamera {
        mode: split.secondary,
        ..*tracking
    };

    let left = Viewport {
        x: 0,
        y: 0,
        width: left_width,
        height,
    };
    let right = Viewport {
        x: left_width,
        y: 0,
        width: right_width,
        height,
    };

    vec![
        RenderView {
            view: primary.view_matrix(camera, vehicle),
            proj: projection.matrix(left.width, left.height),
            viewport: left,
        },
        RenderView {
            view: secondary.view_matrix(camera, vehicle),
            proj: projection.matrix(right.width, right.height),
            viewport: right,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_widths_cover_the_framebuffer() {
        for width in 2..200 {
            let (left, right) = split_widths(width);
            assert_eq!(left + right, width, "width = {width}");
            assert!(left >= 1 && right >= 1);
        }
    }

    #[test]
    fn split_widths_never_collapse_a_pane() {
        let (left, right) = split_widths(1);
        assert!(left >= 1 && right >= 1);
        let (left, right) = split_widths(0);
        assert!(left >= 1 && right >= 1);
    }

    #[test]
    fn single_view_fills_the_framebuffer() {
        let views = assemble_views(
            &SplitScreen::default(),
            &TrackingCamera::default(),
            &FlyCamera::default(),
            &Mat4::IDENTITY,
            &Projection::default(),
            1280,
            720,
        );
        assert_eq!(views.len(), 1);
        assert_eq!(
            views[0].viewport,
            Viewport {
                x: 0,
                y: 0,
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn split_views_sit_side_by_side() {
        let split = SplitScreen {
            enabled: true,
            ..SplitScreen::default()
        };
        let views = assemble_views(
            &split,
            &TrackingCamera::default(),
            &FlyCamera::default(),
            &Mat4::IDENTITY,
            &Projection::default(),
            1281,
            720,
        );
        assert_eq!(views.len(), 2);
        let (left, right) = (views[0].viewport, views[1].viewport);
        assert_eq!(left.x, 0);
        assert_eq!(right.x, left.width);
        assert_eq!(left.width + right.width, 1281);
        assert_eq!(left.height, 720);
        assert_eq!(right.height, 720);
    }

    #[test]
    fn panes_use_their_own_aspect_ratio() {
        let split = SplitScreen {
            enabled: true,
            ..SplitScreen::default()
        };
        let full = assemble_views(
            &SplitScreen::default(),
            &TrackingCamera::default(),
            &FlyCamera::default(),
            &Mat4::IDENTITY,
            &Projection::default(),
            1280,
            720,
        );
        let halves = assemble_views(
            &split,
            &TrackingCamera::default(),
            &FlyCamera::default(),
            &Mat4::IDENTITY,
            &Projection::default(),
            1280,
            720,
        );
        assert_ne!(
            full[0].proj.to_cols_array(),
            halves[0].proj.to_cols_array()
        );
    }

    #[test]
    fn pane_modes_cycle_independently() {
        let mut split = SplitScreen::default();
        split.cycle_primary();
        assert_eq!(split.primary, CameraMode::Follow);
        assert_eq!(split.secondary, CameraMode::Follow);
        split.cycle_secondary();
        assert_eq!(split.secondary, CameraMode::Ground);
        assert_eq!(split.primary, CameraMode::Follow);
    }
}
