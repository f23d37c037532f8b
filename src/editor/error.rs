//! Editor error taxonomy.
//!
//! Only two kinds of failure surface as values: capacity exhaustion, which
//! callers refuse and carry on from, and contract violations (bad catalog
//! references, unknown menu commands), which the application treats as fatal.
//! Structural no-ops and attribute-floor skips are silent and never produce
//! an error.

use thiserror::Error;

use super::command::Menu;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// The store already holds its maximum number of objects.
    #[error("scene is full ({capacity} objects)")]
    SceneFull { capacity: usize },

    /// A mesh id outside the catalog reached the store. Programming error in
    /// a dispatch table, not a runtime condition.
    #[error("mesh id {id} out of range (catalog holds {count} meshes)")]
    InvalidMeshId { id: usize, count: usize },

    /// A texture id outside the catalog reached the store.
    #[error("texture id {id} out of range (catalog holds {count} textures)")]
    InvalidTextureId { id: usize, count: usize },

    /// A menu produced an id its decoder does not know.
    #[error("unknown id {id} for {menu:?} menu")]
    UnknownCommand { menu: Menu, id: u32 },
}

impl EditorError {
    /// Fatal errors indicate a broken dispatch table and terminate the
    /// process; the rest are refused and logged.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EditorError::SceneFull { .. })
    }
}
