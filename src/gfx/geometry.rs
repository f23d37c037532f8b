//! # Procedural Geometry
//!
//! Fallback mesh generation for when no asset directory is supplied: a unit
//! quad for the ground plane, a UV sphere for light proxies, and a few
//! simple solids to populate scenes with. All shapes come with outward
//! normals and 0..1 texture coordinates.

use std::f32::consts::PI;

use super::vertex::Vertex3D;

/// CPU-side mesh data ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.indices.len() as u32 / 3
    }
}

/// A square in the XY plane from -1 to 1, facing +Z.
///
/// The scene lays it flat with a 90 degree X rotation, so its local frame
/// matches the other meshes.
pub fn generate_square() -> GeometryData {
    let normal = [0.0, 0.0, 1.0];
    GeometryData {
        vertices: vec![
            Vertex3D {
                position: [-1.0, -1.0, 0.0],
                normal,
                tex_coord: [0.0, 0.0],
            },
            Vertex3D {
                position: [1.0, -1.0, 0.0],
                normal,
                tex_coord: [1.0, 0.0],
            },
            Vertex3D {
                position: [1.0, 1.0, 0.0],
                normal,
                tex_coord: [1.0, 1.0],
            },
            Vertex3D {
                position: [-1.0, 1.0, 0.0],
                normal,
                tex_coord: [0.0, 1.0],
            },
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// A UV sphere of radius 1 centred at the origin.
pub fn generate_sphere(segments: u32, rings: u32) -> GeometryData {
    let mut data = GeometryData::default();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = u * 2.0 * PI;

            let x = phi.sin() * theta.cos();
            let y = phi.cos();
            let z = phi.sin() * theta.sin();

            data.vertices.push(Vertex3D {
                position: [x, y, z],
                normal: [x, y, z],
                tex_coord: [u, v],
            });
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            data.indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    data
}

/// A unit cube centred at the origin with per-face normals.
pub fn generate_cube() -> GeometryData {
    // (face normal, four corners counter-clockwise from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
        ),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut data = GeometryData::default();
    for (normal, corners) in faces {
        let base = data.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            data.vertices.push(Vertex3D {
                position: corner,
                normal,
                tex_coord: uv,
            });
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

/// A capped cylinder of radius 1 and height 2, axis along Y.
pub fn generate_cylinder(segments: u32) -> GeometryData {
    let mut data = GeometryData::default();

    // Side wall: duplicated rings so the seam has clean texture coordinates.
    for segment in 0..=segments {
        let u = segment as f32 / segments as f32;
        let theta = u * 2.0 * PI;
        let (x, z) = (theta.cos(), theta.sin());
        for (y, v) in [(-1.0, 0.0), (1.0, 1.0)] {
            data.vertices.push(Vertex3D {
                position: [x, y, z],
                normal: [x, 0.0, z],
                tex_coord: [u, v],
            });
        }
    }
    for segment in 0..segments {
        let a = segment * 2;
        data.indices
            .extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
    }

    // Caps: a centre vertex fan per end.
    for (y, normal_y) in [(1.0f32, 1.0f32), (-1.0, -1.0)] {
        let centre = data.vertices.len() as u32;
        data.vertices.push(Vertex3D {
            position: [0.0, y, 0.0],
            normal: [0.0, normal_y, 0.0],
            tex_coord: [0.5, 0.5],
        });
        for segment in 0..=segments {
            let theta = segment as f32 / segments as f32 * 2.0 * PI;
            let (x, z) = (theta.cos(), theta.sin());
            data.vertices.push(Vertex3D {
                position: [x, y, z],
                normal: [0.0, normal_y, 0.0],
                tex_coord: [0.5 + x * 0.5, 0.5 + z * 0.5],
            });
        }
        for segment in 0..segments {
            let a = centre + 1 + segment;
            if normal_y > 0.0 {
                data.indices.extend_from_slice(&[centre, a + 1, a]);
            } else {
                data.indices.extend_from_slice(&[centre, a, a + 1]);
            }
        }
    }

    data
}

/// A cone of base radius 1 and height 2, apex up the Y axis.
pub fn generate_cone(segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    let slope = 1.0 / (1.0f32 + 0.25).sqrt();

    // Side: apex duplicated per segment for distinct normals.
    for segment in 0..segments {
        let u0 = segment as f32 / segments as f32;
        let u1 = (segment + 1) as f32 / segments as f32;
        let t0 = u0 * 2.0 * PI;
        let t1 = u1 * 2.0 * PI;
        let tm = (t0 + t1) * 0.5;

        let base = data.vertices.len() as u32;
        data.vertices.push(Vertex3D {
            position: [t0.cos(), -1.0, t0.sin()],
            normal: [t0.cos() * slope, 0.5 * slope, t0.sin() * slope],
            tex_coord: [u0, 0.0],
        });
        data.vertices.push(Vertex3D {
            position: [t1.cos(), -1.0, t1.sin()],
            normal: [t1.cos() * slope, 0.5 * slope, t1.sin() * slope],
            tex_coord: [u1, 0.0],
        });
        data.vertices.push(Vertex3D {
            position: [0.0, 1.0, 0.0],
            normal: [tm.cos() * slope, 0.5 * slope, tm.sin() * slope],
            tex_coord: [(u0 + u1) * 0.5, 1.0],
        });
        data.indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    // Base disc.
    let centre = data.vertices.len() as u32;
    data.vertices.push(Vertex3D {
        position: [0.0, -1.0, 0.0],
        normal: [0.0, -1.0, 0.0],
        tex_coord: [0.5, 0.5],
    });
    for segment in 0..=segments {
        let theta = segment as f32 / segments as f32 * 2.0 * PI;
        let (x, z) = (theta.cos(), theta.sin());
        data.vertices.push(Vertex3D {
            position: [x, -1.0, z],
            normal: [0.0, -1.0, 0.0],
            tex_coord: [0.5 + x * 0.5, 0.5 + z * 0.5],
        });
    }
    for segment in 0..segments {
        let a = centre + 1 + segment;
        data.indices.extend_from_slice(&[centre, a, a + 1]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_is_two_triangles() {
        let square = generate_square();
        assert_eq!(square.vertex_count(), 4);
        assert_eq!(square.triangle_count(), 2);
    }

    #[test]
    fn sphere_has_consistent_buffers() {
        let sphere = generate_sphere(16, 12);
        assert!(sphere.vertex_count() > 0);
        assert_eq!(sphere.indices.len() % 3, 0);
        let max = *sphere.indices.iter().max().unwrap();
        assert!(max < sphere.vertex_count());
        // Unit sphere: every position is also its own normal.
        for v in &sphere.vertices {
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn cube_has_six_faces() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn cylinder_and_cone_indices_stay_in_range() {
        for data in [generate_cylinder(24), generate_cone(24)] {
            assert_eq!(data.indices.len() % 3, 0);
            let max = *data.indices.iter().max().unwrap();
            assert!(max < data.vertex_count());
        }
    }
}
