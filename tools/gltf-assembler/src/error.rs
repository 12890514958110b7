//! Error types for document assembly

use std::path::PathBuf;

use crate::geometry::GeometryError;

/// Result alias used throughout the assembler
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Errors raised while assembling or writing a document
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// An attribute setter ran before any mesh was created
    #[error("{operation}() called with no open mesh - call create_mesh() first")]
    NoOpenMesh { operation: &'static str },

    /// A mesh primitive points past the end of the accessor list
    #[error("mesh {mesh} references accessor {accessor}, but only {count} accessors exist")]
    AccessorOutOfRange {
        mesh: usize,
        accessor: usize,
        count: usize,
    },

    /// An accessor points past the end of the buffer view list
    #[error("accessor {accessor} references buffer view {view}, but only {count} views exist")]
    ViewOutOfRange {
        accessor: usize,
        view: usize,
        count: usize,
    },

    /// Embedded texture mode needs the image file, which was not found
    #[error("texture image not found: {}", .path.display())]
    MissingImage { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
}
