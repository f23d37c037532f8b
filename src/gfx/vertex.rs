//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by the asset catalogs, the procedural
//! geometry generators and the render pipeline.

/// A 3D vertex with position, normal and texture coordinates.
///
/// `#[repr(C)]` keeps the memory layout C-compatible for GPU buffer uploads.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// Normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]; scaled per object at draw time
    pub tex_coord: [f32; 2],
}

impl Vertex3D {
    /// Vertex buffer layout for pipeline creation:
    /// location 0 position, 1 normal, 2 texture coordinates.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
