//! # User Interface Module
//!
//! Dear ImGui overlay for the editor.
//!
//! The [`UiManager`] owns the ImGui context, the winit platform glue and the
//! wgpu renderer. [`menu`] builds the main menu bar each frame; selections
//! come out as `(Menu, id)` pairs that feed straight into
//! [`Command::from_menu`](crate::editor::Command::from_menu), keeping the UI
//! layer free of editor semantics.
//!
//! ## Input Handling
//!
//! UI input capture takes priority over scene interaction: while a menu is
//! open, pointer events never reach the tool engine.

pub mod manager;
pub mod menu;

// Re-export main types
pub use manager::UiManager;
pub use menu::build_menu_bar;
