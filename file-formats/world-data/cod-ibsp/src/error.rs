//! Error handling for IBSP parsing

use std::io;
use thiserror::Error;

use crate::version::LumpKind;

/// Errors that can occur when reading IBSP files
#[derive(Debug, Error)]
pub enum IbspError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in the file header
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Unsupported IBSP version
    #[error("Unsupported IBSP version: {0}")]
    UnsupportedVersion(i32),

    /// A lump extends past the end of the file
    #[error("{kind} lump at offset {offset} with length {length} exceeds file size {file_size}")]
    LumpOutOfBounds {
        /// Which lump
        kind: LumpKind,
        /// Declared offset
        offset: u32,
        /// Declared length
        length: u32,
        /// Total file size
        file_size: u64,
    },

    /// Triangle soup references a material that does not exist
    #[error("Material index {index} out of range ({count} materials)")]
    MaterialIndexOutOfRange {
        /// Referenced index
        index: usize,
        /// Number of materials in the level
        count: usize,
    },

    /// Triangle soup references a triangle past the triangle lump
    #[error("Triangle index {index} out of range ({count} triangles)")]
    TriangleIndexOutOfRange {
        /// Referenced index
        index: usize,
        /// Number of triangles in the level
        count: usize,
    },

    /// Soup offset plus local index falls outside the vertex lump
    #[error("Vertex index {index} out of range ({count} vertices)")]
    VertexIndexOutOfRange {
        /// Computed global index
        index: u64,
        /// Number of vertices in the level
        count: usize,
    },

    /// The repaired entity text is not valid JSON
    #[error("Entity parse error: {0}")]
    Entities(#[from] serde_json::Error),

    /// The model name pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Type alias for Results from IBSP operations
pub type Result<T> = std::result::Result<T, IbspError>;
