//! Main renderer orchestrating everything.
//!
//! Three pipelines share one render pass per frame: textured terrain,
//! vertex-colored solids (landing pads and the vehicle), and additive
//! exhaust billboards fed from a fixed-capacity storage buffer. Split-screen
//! is a viewport/scissor loop over the frame's view list.

use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::window::Window;

use skylark_sim::{RenderView, SceneState, POOL_CAPACITY};

use crate::geometry;
use crate::gpu_types::{
    GpuParticle, LightsUniforms, ModelUniforms, VertexPnc, VertexPnt, ViewUniforms,
};
use crate::scene::{SceneAssets, TextureData};

const PARTICLE_SPRITE_SIZE: u32 = 64;
const EXHAUST_TINT: [f32; 4] = [1.0, 0.8, 0.5, 1.0];

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_view: wgpu::TextureView,

    terrain_pipeline: wgpu::RenderPipeline,
    solid_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,

    // One view uniform per split-screen pane.
    view_buffers: [wgpu::Buffer; 2],
    view_bind_groups: [wgpu::BindGroup; 2],

    lights_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,

    terrain_model_bind_group: wgpu::BindGroup,
    pad_model_bind_groups: Vec<wgpu::BindGroup>,
    vehicle_model_buffer: wgpu::Buffer,
    vehicle_model_bind_group: wgpu::BindGroup,

    terrain_texture_bind_group: wgpu::BindGroup,

    particle_buffer: wgpu::Buffer,
    particle_bind_group: wgpu::BindGroup,
    particle_count: u32,

    terrain_vertex_buffer: wgpu::Buffer,
    terrain_vertex_count: u32,
    pad_vertex_buffer: wgpu::Buffer,
    pad_vertex_count: u32,
    vehicle_vertex_buffer: wgpu::Buffer,
    vehicle_vertex_count: u32,

    // Views assembled by the last prepare_frame.
    frame_views: Vec<RenderView>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, assets: &SceneAssets) -> Result<Self> {
        let size = window.inner_size();

        // 1) WGPU init
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapters found")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Skylark Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("request_device failed")?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_texture(&device, config.width, config.height);

        // 2) Vertex buffers
        let terrain_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Vertex Buffer"),
            contents: bytemuck::cast_slice(&assets.terrain_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let pad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Pad Vertex Buffer"),
            contents: bytemuck::cast_slice(&assets.pad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let vehicle_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vehicle Vertex Buffer"),
            contents: bytemuck::cast_slice(&assets.vehicle_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // 3) Bind group layouts
        let view_layout = uniform_layout(&device, "View Layout", wgpu::ShaderStages::VERTEX);
        let lights_layout = uniform_layout(&device, "Lights Layout", wgpu::ShaderStages::FRAGMENT);
        let model_layout = uniform_layout(&device, "Model Layout", wgpu::ShaderStages::VERTEX);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let particle_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Layout"),
            entries: &[
                // particle storage
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // sprite texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                // tint
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // 4) Uniform buffers and bind groups
        let view_buffers = [
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Primary View Buffer"),
                size: std::mem::size_of::<ViewUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Secondary View Buffer"),
                size: std::mem::size_of::<ViewUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        ];
        let view_bind_groups = [
            uniform_group(&device, "Primary View Group", &view_layout, &view_buffers[0]),
            uniform_group(&device, "Secondary View Group", &view_layout, &view_buffers[1]),
        ];

        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Buffer"),
            size: std::mem::size_of::<LightsUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_bind_group = uniform_group(&device, "Lights Group", &lights_layout, &lights_buffer);

        let terrain_model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Model Buffer"),
            contents: bytemuck::bytes_of(&ModelUniforms {
                model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let terrain_model_bind_group = uniform_group(
            &device,
            "Terrain Model Group",
            &model_layout,
            &terrain_model_buffer,
        );

        let pad_model_bind_groups = assets
            .pad_models
            .iter()
            .map(|model| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Pad Model Buffer"),
                    contents: bytemuck::bytes_of(&ModelUniforms {
                        model: model.to_cols_array_2d(),
                    }),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                uniform_group(&device, "Pad Model Group", &model_layout, &buffer)
            })
            .collect();

        let vehicle_model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vehicle Model Buffer"),
            contents: bytemuck::bytes_of(&ModelUniforms {
                model: assets.vehicle_base.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let vehicle_model_bind_group = uniform_group(
            &device,
            "Vehicle Model Group",
            &model_layout,
            &vehicle_model_buffer,
        );

        // 5) Textures
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let terrain_texture_view = upload_texture(
            &device,
            &queue,
            "Terrain Albedo",
            &assets.terrain_texture,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        let terrain_texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Terrain Texture Group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&terrain_texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        // 6) Particle resources
        let sprite = TextureData {
            pixels: geometry::particle_sprite_pixels(PARTICLE_SPRITE_SIZE),
            width: PARTICLE_SPRITE_SIZE,
            height: PARTICLE_SPRITE_SIZE,
        };
        let sprite_view = upload_texture(
            &device,
            &queue,
            "Exhaust Sprite",
            &sprite,
            wgpu::TextureFormat::Rgba8Unorm,
        );

        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Storage Buffer"),
            size: (POOL_CAPACITY * GpuParticle::SIZE) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let particle_params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Params Buffer"),
            contents: bytemuck::cast_slice(&EXHAUST_TINT),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let particle_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Group"),
            layout: &particle_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: particle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sprite_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: particle_params_buffer.as_entire_binding(),
                },
            ],
        });

        // 7) Pipelines
        let terrain_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/terrain.wgsl"));
        let solid_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/solid.wgsl"));
        let particle_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/particles.wgsl"));

        let terrain_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Terrain Pipeline Layout"),
                bind_group_layouts: &[&view_layout, &lights_layout, &model_layout, &texture_layout],
                push_constant_ranges: &[],
            });
        let terrain_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Terrain Pipeline"),
            layout: Some(&terrain_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &terrain_shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPnt::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &terrain_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(Some(wgpu::Face::Back)),
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let solid_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Solid Pipeline Layout"),
                bind_group_layouts: &[&view_layout, &lights_layout, &model_layout],
                push_constant_ranges: &[],
            });
        let solid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Solid Pipeline"),
            layout: Some(&solid_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &solid_shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPnc::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &solid_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(Some(wgpu::Face::Back)),
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let particle_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Particle Pipeline Layout"),
                bind_group_layouts: &[&view_layout, &particle_layout],
                push_constant_ranges: &[],
            });
        let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&particle_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &particle_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &particle_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Additive: exhaust accumulates brightness.
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(None),
            // Particles test depth but do not write it.
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            terrain_pipeline,
            solid_pipeline,
            particle_pipeline,
            view_buffers,
            view_bind_groups,
            lights_buffer,
            lights_bind_group,
            terrain_model_bind_group,
            pad_model_bind_groups,
            vehicle_model_buffer,
            vehicle_model_bind_group,
            terrain_texture_bind_group,
            particle_buffer,
            particle_bind_group,
            particle_count: 0,
            terrain_vertex_buffer,
            terrain_vertex_count: assets.terrain_vertices.len() as u32,
            pad_vertex_buffer,
            pad_vertex_count: assets.pad_vertices.len() as u32,
            vehicle_vertex_buffer,
            vehicle_vertex_count: assets.vehicle_vertices.len() as u32,
            frame_views: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_texture(&self.device, new_size.width, new_size.height);
        }
    }

    /// Upload this frame's dynamic state: view matrices, the vehicle model,
    /// the light rig, and the compacted particle list.
    pub fn prepare_frame(&mut self, state: &SceneState) {
        self.frame_views = state.views(self.config.width, self.config.height);

        for (buffer, render_view) in self.view_buffers.iter().zip(&self.frame_views) {
            self.queue.write_buffer(
                buffer,
                0,
                bytemuck::bytes_of(&ViewUniforms::from_render_view(render_view)),
            );
        }

        self.queue.write_buffer(
            &self.vehicle_model_buffer,
            0,
            bytemuck::bytes_of(&ModelUniforms {
                model: state.vehicle_transform.to_cols_array_2d(),
            }),
        );

        self.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&LightsUniforms::from_rig(&state.lights)),
        );

        let sprites = state.particles.snapshot();
        let particles: Vec<GpuParticle> = sprites.iter().map(GpuParticle::from_sprite).collect();
        self.particle_count = particles.len() as u32;
        if !particles.is_empty() {
            self.queue
                .write_buffer(&self.particle_buffer, 0, bytemuck::cast_slice(&particles));
        }
    }

    pub fn render(&mut self) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                anyhow::bail!("Surface out of memory");
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e));
            }
        };

        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.15,
                            g: 0.17,
                            b: 0.22,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (index, render_view) in self.frame_views.iter().enumerate().take(2) {
                // Pane rects must stay inside the surface.
                let vp = render_view.viewport;
                let max_width = self.config.width.saturating_sub(vp.x);
                let max_height = self.config.height.saturating_sub(vp.y);
                if max_width == 0 || max_height == 0 {
                    continue;
                }
                let width = vp.width.min(max_width);
                let height = vp.height.min(max_height);

                rpass.set_viewport(vp.x as f32, vp.y as f32, width as f32, height as f32, 0.0, 1.0);
                rpass.set_scissor_rect(vp.x, vp.y, width, height);

                // Terrain
                rpass.set_pipeline(&self.terrain_pipeline);
                rpass.set_bind_group(0, &self.view_bind_groups[index], &[]);
                rpass.set_bind_group(1, &self.lights_bind_group, &[]);
                rpass.set_bind_group(2, &self.terrain_model_bind_group, &[]);
                rpass.set_bind_group(3, &self.terrain_texture_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.terrain_vertex_buffer.slice(..));
                rpass.draw(0..self.terrain_vertex_count, 0..1);

                // Landing pads and vehicle
                rpass.set_pipeline(&self.solid_pipeline);
                rpass.set_bind_group(0, &self.view_bind_groups[index], &[]);
                rpass.set_bind_group(1, &self.lights_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.pad_vertex_buffer.slice(..));
                for pad_group in &self.pad_model_bind_groups {
                    rpass.set_bind_group(2, pad_group, &[]);
                    rpass.draw(0..self.pad_vertex_count, 0..1);
                }

                rpass.set_bind_group(2, &self.vehicle_model_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.vehicle_vertex_buffer.slice(..));
                rpass.draw(0..self.vehicle_vertex_count, 0..1);

                // Exhaust, 6 vertices per alive particle
                if self.particle_count > 0 {
                    rpass.set_pipeline(&self.particle_pipeline);
                    rpass.set_bind_group(0, &self.view_bind_groups[index], &[]);
                    rpass.set_bind_group(1, &self.particle_bind_group, &[]);
                    rpass.draw(0..6, 0..self.particle_count);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn uniform_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &TextureData,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn primitive_state(cull_mode: Option<wgpu::Face>) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn depth_state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: wgpu::TextureFormat::Depth32Float,
        depth_write_enabled,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
