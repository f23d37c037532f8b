//! # Graphics Module
//!
//! GPU-facing side of the editor: geometry generation, texture upload, and
//! the wgpu render engine that draws the scene store each frame.
//!
//! Nothing in here owns editor state. The render engine borrows the store,
//! the camera, and the asset library per frame, so all scene mutation stays
//! in [`crate::editor`].

pub mod geometry;
pub mod render_engine;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use geometry::GeometryData;
pub use render_engine::RenderEngine;
pub use texture::TextureResource;
pub use vertex::Vertex3D;
