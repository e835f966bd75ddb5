//! Simple procedural mesh and texture generation utilities.

use glam::Vec3;

use crate::gpu_types::VertexPnc;

/// Append one axis-aligned box as twelve CCW triangles with flat normals.
pub fn append_box(vertices: &mut Vec<VertexPnc>, center: Vec3, half: Vec3, color: Vec3) {
    let p000 = center + Vec3::new(-half.x, -half.y, -half.z);
    let p001 = center + Vec3::new(-half.x, -half.y, half.z);
    let p010 = center + Vec3::new(-half.x, half.y, -half.z);
    let p011 = center + Vec3::new(-half.x, half.y, half.z);
    let p100 = center + Vec3::new(half.x, -half.y, -half.z);
    let p101 = center + Vec3::new(half.x, -half.y, half.z);
    let p110 = center + Vec3::new(half.x, half.y, -half.z);
    let p111 = center + Vec3::new(half.x, half.y, half.z);

    let mut tri = |a: Vec3, b: Vec3, c: Vec3| {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for position in [a, b, c] {
            vertices.push(VertexPnc {
                position: position.to_array(),
                normal: normal.to_array(),
                color: color.to_array(),
            });
        }
    };

    // Two triangles per face.
    tri(p100, p110, p111);
    tri(p100, p111, p101); // +X
    tri(p000, p011, p010);
    tri(p000, p001, p011); // -X
    tri(p010, p111, p110);
    tri(p010, p011, p111); // +Y
    tri(p000, p101, p001);
    tri(p000, p100, p101); // -Y
    tri(p001, p101, p111);
    tri(p001, p111, p011); // +Z
    tri(p000, p110, p100);
    tri(p000, p010, p110); // -Z
}

/// Build the rocket mesh: slender body on a wider skirt, four fins, and a
/// cockpit block on top. Local +Y is the thrust axis.
pub fn build_vehicle_mesh() -> Vec<VertexPnc> {
    let mut vertices = Vec::with_capacity(7 * 36);
    let s = 0.2;

    // Body
    append_box(
        &mut vertices,
        Vec3::new(0.0, 2.5, 0.0) * s,
        Vec3::new(0.5, 2.5, 0.5) * s,
        Vec3::new(0.85, 0.85, 0.95),
    );
    // Skirt
    append_box(
        &mut vertices,
        Vec3::new(0.0, 0.5, 0.0) * s,
        Vec3::new(0.7, 0.5, 0.7) * s,
        Vec3::new(0.7, 0.7, 0.8),
    );
    // Fins
    let fin_color = Vec3::new(1.0, 0.2, 0.2);
    append_box(
        &mut vertices,
        Vec3::new(0.9, 0.0, 0.0) * s,
        Vec3::new(0.3, 0.7, 0.05) * s,
        fin_color,
    );
    append_box(
        &mut vertices,
        Vec3::new(-0.9, 0.0, 0.0) * s,
        Vec3::new(0.3, 0.7, 0.05) * s,
        fin_color,
    );
    append_box(
        &mut vertices,
        Vec3::new(0.0, 0.0, 0.9) * s,
        Vec3::new(0.05, 0.7, 0.3) * s,
        fin_color,
    );
    append_box(
        &mut vertices,
        Vec3::new(0.0, 0.0, -0.9) * s,
        Vec3::new(0.05, 0.7, 0.3) * s,
        fin_color,
    );
    // Cockpit
    append_box(
        &mut vertices,
        Vec3::new(0.0, 5.2, 0.0) * s,
        Vec3::splat(0.3) * s,
        Vec3::new(0.9, 0.9, 1.0),
    );

    vertices
}

/// Generate a soft round sprite for the exhaust: white RGB with a squared
/// radial alpha falloff.
pub fn particle_sprite_pixels(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let nx = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
            let ny = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
            let r = (nx * nx + ny * ny).sqrt();
            let alpha = (1.0 - r).clamp(0.0, 1.0).powi(2);

            data.push(255);
            data.push(255);
            data.push(255);
            data.push((alpha * 255.0) as u8);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_mesh_is_whole_triangles_with_unit_normals() {
        let vertices = build_vehicle_mesh();
        assert_eq!(vertices.len(), 7 * 36);

        for vertex in &vertices {
            let normal = Vec3::from_array(vertex.normal);
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn vehicle_mesh_is_centered_on_the_thrust_axis() {
        let vertices = build_vehicle_mesh();
        let centroid: Vec3 = vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .sum::<Vec3>()
            / vertices.len() as f32;
        assert!(centroid.x.abs() < 1e-4);
        assert!(centroid.z.abs() < 1e-4);
        assert!(centroid.y > 0.0);
    }

    #[test]
    fn sprite_fades_from_center_to_edge() {
        let size = 64;
        let pixels = particle_sprite_pixels(size);
        assert_eq!(pixels.len(), (size * size * 4) as usize);

        let alpha_at = |x: u32, y: u32| pixels[((y * size + x) * 4 + 3) as usize];
        assert!(alpha_at(size / 2, size / 2) > 200);
        assert_eq!(alpha_at(0, 0), 0);
    }
}
