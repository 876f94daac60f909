// asset/geometry.rs
use glam::Vec3;
use std::f32::consts::PI;

use crate::renderer::mesh::{v, Vertex};

pub const SPHERE_WIDTH_SEGMENTS: u32 = 32;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryKind {
    Cuboid { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

/// CPU-side triangle mesh. Uploaded lazily by the renderer the first time a
/// node referencing it is drawn.
#[derive(Debug, Clone)]
pub struct Geometry {
    kind: GeometryKind,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    /// Axis-aligned box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;

        // (normal, u axis, v axis) with u x v == normal so every face winds CCW
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, (normal, u, w)) in faces.into_iter().enumerate() {
            let corners = [
                (normal - u - w, [0.0, 1.0]),
                (normal + u - w, [1.0, 1.0]),
                (normal + u + w, [1.0, 0.0]),
                (normal - u + w, [0.0, 0.0]),
            ];
            for (corner, uv) in corners {
                vertices.push(v((corner * half).to_array(), normal.to_array(), uv));
            }

            let o = face as u32 * 4;
            indices.extend_from_slice(&[o, o + 1, o + 2, o, o + 2, o + 3]);
        }

        Self {
            kind: GeometryKind::Cuboid {
                width,
                height,
                depth,
            },
            vertices,
            indices,
        }
    }

    /// Single quad in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let normal = [0.0, 0.0, 1.0];

        let vertices = vec![
            v([-hw, -hh, 0.0], normal, [0.0, 1.0]),
            v([hw, -hh, 0.0], normal, [1.0, 1.0]),
            v([hw, hh, 0.0], normal, [1.0, 0.0]),
            v([-hw, hh, 0.0], normal, [0.0, 0.0]),
        ];

        Self {
            kind: GeometryKind::Plane { width, height },
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::sphere_with_segments(radius, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS)
    }

    pub fn sphere_with_segments(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::new();
        let mut grid: Vec<Vec<u32>> = Vec::new();

        for iy in 0..=height_segments {
            let tex_v = iy as f32 / height_segments as f32;
            let mut row = Vec::new();

            for ix in 0..=width_segments {
                let tex_u = ix as f32 / width_segments as f32;
                let theta = tex_u * 2.0 * PI;
                let phi = tex_v * PI;

                let normal = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());

                row.push(vertices.len() as u32);
                vertices.push(v(
                    (normal * radius).to_array(),
                    normal.to_array(),
                    [tex_u, tex_v],
                ));
            }

            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                // Degenerate triangles at the poles are skipped
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            kind: GeometryKind::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            vertices,
            indices,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_counts_look_right() {
        let g = Geometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(g.vertices().len(), 24);
        assert_eq!(g.indices().len(), 36);
    }

    #[test]
    fn cuboid_respects_dimensions() {
        let g = Geometry::cuboid(5.0, 1.0, 5.0);
        let max = g
            .vertices()
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, vert| acc.max(Vec3::from(vert.pos)));
        assert!(max.abs_diff_eq(Vec3::new(2.5, 0.5, 2.5), 1e-6));
    }

    #[test]
    fn cuboid_faces_wind_outwards() {
        let g = Geometry::cuboid(1.0, 2.0, 3.0);
        for tri in g.indices().chunks(3) {
            let a = Vec3::from(g.vertices()[tri[0] as usize].pos);
            let b = Vec3::from(g.vertices()[tri[1] as usize].pos);
            let c = Vec3::from(g.vertices()[tri[2] as usize].pos);
            let n = Vec3::from(g.vertices()[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let g = Geometry::plane(10.0, 10.0);
        let p = g.vertices();
        let n = (Vec3::from(p[1].pos) - Vec3::from(p[0].pos))
            .cross(Vec3::from(p[2].pos) - Vec3::from(p[0].pos));
        assert!(n.normalize().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let g = Geometry::sphere(0.5);
        assert_eq!(
            g.vertices().len() as u32,
            (SPHERE_WIDTH_SEGMENTS + 1) * (SPHERE_HEIGHT_SEGMENTS + 1)
        );
        for vert in g.vertices() {
            assert!((Vec3::from(vert.pos).length() - 0.5).abs() < 1e-5);
        }
        // Two poles lose one triangle per segment each
        let expected_tris = SPHERE_WIDTH_SEGMENTS * (SPHERE_HEIGHT_SEGMENTS * 2 - 2);
        assert_eq!(g.indices().len() as u32, expected_tris * 3);
    }
}
