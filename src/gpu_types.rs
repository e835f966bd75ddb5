//! GPU-compatible data types

use bytemuck::{Pod, Zeroable};
use skylark_sim::{LightRig, ParticleSprite, RenderView};

/// Textured, lit vertex (terrain).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VertexPnt {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl VertexPnt {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// Vertex-colored, lit vertex (landing pads, vehicle).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VertexPnc {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl VertexPnc {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// Per-viewport camera matrices.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ViewUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl ViewUniforms {
    pub fn from_render_view(render_view: &RenderView) -> Self {
        Self {
            view: render_view.view.to_cols_array_2d(),
            proj: render_view.proj.to_cols_array_2d(),
        }
    }
}

/// Per-object model matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
}

/// Light rig, packed to 16-byte boundaries for WGSL uniform layout.
/// Enable flags ride in the w components.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightsUniforms {
    pub point_position: [[f32; 4]; 3],
    pub point_color: [[f32; 4]; 3],
    pub sun_direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
}

impl LightsUniforms {
    pub fn from_rig(rig: &LightRig) -> Self {
        let mut point_position = [[0.0; 4]; 3];
        let mut point_color = [[0.0; 4]; 3];
        for (i, light) in rig.points.iter().enumerate() {
            point_position[i] = light.position.extend(0.0).to_array();
            point_color[i] = light
                .color
                .extend(if light.enabled { 1.0 } else { 0.0 })
                .to_array();
        }

        Self {
            point_position,
            point_color,
            sun_direction: rig
                .sun_direction
                .extend(if rig.sun_enabled { 1.0 } else { 0.0 })
                .to_array(),
            ambient: rig.ambient.extend(0.0).to_array(),
            diffuse: rig.diffuse.extend(0.0).to_array(),
        }
    }
}

/// One exhaust particle in the storage buffer fed to the billboard shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3],
    pub size: f32,
    pub alpha: f32,
    pub _pad: [f32; 3],
}

impl GpuParticle {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn from_sprite(sprite: &ParticleSprite) -> Self {
        Self {
            position: sprite.position.to_array(),
            size: sprite.size,
            alpha: sprite.alpha,
            _pad: [0.0; 3],
        }
    }
}
