use std::io;
use thiserror::Error;

/// Error type for xmodel, xmodelpart and xmodelsurf parsing
#[derive(Error, Debug)]
pub enum XModelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported {kind} version: {version}")]
    UnsupportedVersion { kind: &'static str, version: u16 },

    #[error("Bone {bone} references parent {parent} which is not an earlier bone")]
    InvalidParent { bone: usize, parent: i8 },

    #[error("Bone index {index} out of range ({count} bones)")]
    BoneIndexOutOfRange { index: u16, count: usize },

    #[error("Triangle stream ended after {produced} of {expected} triangles")]
    TriangleStreamExhausted { produced: usize, expected: usize },

    #[error("Surface {surface} failed to load: {source}")]
    Surface {
        surface: String,
        #[source]
        source: Box<XModelError>,
    },
}

pub type Result<T> = std::result::Result<T, XModelError>;
