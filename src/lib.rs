// src/lib.rs
//! Brae Scene Editor
//!
//! An interactive 3D scene editor built on wgpu and winit: a ground plane,
//! light proxies and user-placed meshes, manipulated through pointer-driven
//! tool bindings and a menu-bar command surface.
//!
//! The editor core ([`editor`]) holds all scene semantics and is fully
//! testable off-GPU; [`gfx`] draws it, [`ui`] overlays the menus, and
//! [`app`] wires both into the winit event loop.

pub mod app;
pub mod assets;
pub mod editor;
pub mod gfx;
pub mod ui;

// Re-export main types for convenience
pub use app::BraeApp;

use assets::AssetLibrary;

/// Creates an application with the asset directory resolved from the given
/// command-line argument or the default search path.
pub fn with_assets(dir_arg: Option<String>) -> anyhow::Result<BraeApp> {
    let dir = assets::resolve_asset_dir(dir_arg);
    let assets = AssetLibrary::load(dir.as_deref())?;
    BraeApp::new(assets)
}
