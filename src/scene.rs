//! Scene assembly: mesh and texture loading, object placement, and the
//! initial camera/light setup derived from the terrain bounds.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::{Mat4, Vec3};

use skylark_sim::{FlyCamera, LightRig, PointLight};

use crate::geometry;
use crate::gpu_types::{VertexPnc, VertexPnt};

/// World anchors for the two landing pads; y is replaced by the water level.
const PAD_ANCHORS: [Vec3; 2] = [Vec3::new(-20.0, 0.0, 12.0), Vec3::new(-10.0, 0.0, 23.0)];
const PAD_SCALE: f32 = 25.0;

/// Ring of point lights around the occupied pad.
const LIGHT_RING_RADIUS: f32 = 6.0;
const LIGHT_RING_HEIGHT: f32 = 5.0;

/// Axis-aligned bounds of a loaded mesh.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
}

impl Bounds {
    fn from_positions<'a>(positions: impl Iterator<Item = &'a [f32; 3]>) -> Self {
        let mut min = Vec3::MAX;
        let mut max = Vec3::MIN;
        for p in positions {
            let p = Vec3::from_array(*p);
            min = min.min(p);
            max = max.max(p);
        }
        Self {
            min,
            max,
            center: (min + max) * 0.5,
            radius: 0.5 * (max - min).length(),
        }
    }
}

/// Decoded RGBA8 image.
pub struct TextureData {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Everything the renderer uploads and the simulation starts from.
pub struct SceneAssets {
    pub terrain_vertices: Vec<VertexPnt>,
    pub terrain_bounds: Bounds,
    pub terrain_texture: TextureData,
    pub pad_vertices: Vec<VertexPnc>,
    pub pad_models: [Mat4; 2],
    pub vehicle_vertices: Vec<VertexPnc>,
    pub vehicle_base: Mat4,
    pub lights: LightRig,
}

impl SceneAssets {
    /// Load and place the whole scene. Any missing or malformed file is a
    /// fatal startup error naming the resource.
    pub fn load(asset_dir: &Path) -> Result<Self> {
        let terrain_path = asset_dir.join("terrain.obj");
        let (terrain_vertices, terrain_bounds) = load_terrain_mesh(&terrain_path)
            .with_context(|| format!("failed to load terrain '{}'", terrain_path.display()))?;

        let texture_path = asset_dir.join("terrain.jpg");
        let terrain_texture = load_texture(&texture_path)
            .with_context(|| format!("failed to load texture '{}'", texture_path.display()))?;

        let pad_path = asset_dir.join("pad.obj");
        let pad_vertices = load_colored_mesh(&pad_path)
            .with_context(|| format!("failed to load landing pad '{}'", pad_path.display()))?;

        // Pads float just above the water line (the terrain's lowest point).
        let water_level = terrain_bounds.min.y;
        let pad_scale = Mat4::from_scale(Vec3::splat(PAD_SCALE));
        let pad_models = PAD_ANCHORS.map(|anchor| {
            let position = Vec3::new(anchor.x, water_level + 0.1, anchor.z);
            Mat4::from_translation(position) * pad_scale
        });

        let vehicle_vertices = geometry::build_vehicle_mesh();
        let vehicle_base = pad_models[0] * Mat4::from_translation(Vec3::new(0.0, 0.2, 0.0));

        let lights = light_ring(Vec3::new(
            PAD_ANCHORS[0].x,
            water_level + LIGHT_RING_HEIGHT,
            PAD_ANCHORS[0].z,
        ));

        Ok(Self {
            terrain_vertices,
            terrain_bounds,
            terrain_texture,
            pad_vertices,
            pad_models,
            vehicle_vertices,
            vehicle_base,
            lights,
        })
    }

    /// Free camera start: pulled up and back from the terrain center, aimed
    /// at it.
    pub fn place_camera(&self, camera: &mut FlyCamera) {
        let bounds = &self.terrain_bounds;
        camera.position = Vec3::new(
            bounds.center.x,
            bounds.center.y + bounds.radius * 0.45,
            bounds.center.z + bounds.radius * 1.1,
        );
        camera.aim_at(bounds.center);
    }
}

/// Red/green/blue point lights at 120 degree spacing around `center`.
fn light_ring(center: Vec3) -> LightRig {
    let r = LIGHT_RING_RADIUS;
    // sin(60 degrees), for the two rear ring positions.
    let h = 0.87;

    LightRig::new([
        PointLight::new(
            center + Vec3::new(r, 3.0, 0.0),
            Vec3::new(100.0, 0.0, 0.0),
        ),
        PointLight::new(
            center + Vec3::new(-r * 0.5, 3.0, r * h),
            Vec3::new(0.0, 100.0, 0.0),
        ),
        PointLight::new(
            center + Vec3::new(-r * 0.5, 3.0, -r * h),
            Vec3::new(0.0, 0.0, 100.0),
        ),
    ])
}

fn load_obj(path: &Path) -> Result<(Vec<tobj::Model>, Vec<tobj::Material>)> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("failed to parse OBJ '{}'", path.display()))?;

    // Missing .mtl files are tolerated; faces fall back to a default color.
    let materials = materials.unwrap_or_default();
    Ok((models, materials))
}

/// Flatten an OBJ into a textured triangle list plus its bounds.
fn load_terrain_mesh(path: &Path) -> Result<(Vec<VertexPnt>, Bounds)> {
    let (models, _) = load_obj(path)?;

    let mut vertices = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        for triangle in mesh.indices.chunks_exact(3) {
            let positions = [
                fetch_vec3(&mesh.positions, triangle[0]),
                fetch_vec3(&mesh.positions, triangle[1]),
                fetch_vec3(&mesh.positions, triangle[2]),
            ];
            let face_normal = (positions[1] - positions[0])
                .cross(positions[2] - positions[0])
                .normalize_or_zero();

            for (corner, position) in triangle.iter().zip(positions) {
                let normal = if has_normals {
                    fetch_vec3(&mesh.normals, *corner)
                } else {
                    face_normal
                };
                let texcoord = if has_texcoords {
                    let base = (*corner as usize) * 2;
                    [mesh.texcoords[base], mesh.texcoords[base + 1]]
                } else {
                    [0.0, 0.0]
                };
                vertices.push(VertexPnt {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    texcoord,
                });
            }
        }
    }

    ensure!(
        !vertices.is_empty(),
        "OBJ '{}' contains no triangles",
        path.display()
    );

    let bounds = Bounds::from_positions(vertices.iter().map(|v| &v.position));
    Ok((vertices, bounds))
}

/// Flatten an OBJ into a vertex-colored triangle list, taking each model's
/// material diffuse as its color.
fn load_colored_mesh(path: &Path) -> Result<Vec<VertexPnc>> {
    let (models, materials) = load_obj(path)?;

    let mut vertices = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|material| material.diffuse)
            .unwrap_or([0.7, 0.7, 0.7]);
        let has_normals = !mesh.normals.is_empty();

        for triangle in mesh.indices.chunks_exact(3) {
            let positions = [
                fetch_vec3(&mesh.positions, triangle[0]),
                fetch_vec3(&mesh.positions, triangle[1]),
                fetch_vec3(&mesh.positions, triangle[2]),
            ];
            let face_normal = (positions[1] - positions[0])
                .cross(positions[2] - positions[0])
                .normalize_or_zero();

            for (corner, position) in triangle.iter().zip(positions) {
                let normal = if has_normals {
                    fetch_vec3(&mesh.normals, *corner)
                } else {
                    face_normal
                };
                vertices.push(VertexPnc {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    color,
                });
            }
        }
    }

    ensure!(
        !vertices.is_empty(),
        "OBJ '{}' contains no triangles",
        path.display()
    );
    Ok(vertices)
}

fn fetch_vec3(values: &[f32], index: u32) -> Vec3 {
    let base = index as usize * 3;
    Vec3::new(values[base], values[base + 1], values[base + 2])
}

fn load_texture(path: &Path) -> Result<TextureData> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image '{}'", path.display()))?
        .flipv()
        .to_rgba8();

    let (width, height) = image.dimensions();
    ensure!(
        width > 0 && height > 0,
        "image '{}' has invalid size {}x{}",
        path.display(),
        width,
        height
    );

    Ok(TextureData {
        pixels: image.into_raw(),
        width,
        height,
    })
}
