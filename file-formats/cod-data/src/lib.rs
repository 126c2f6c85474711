//! Shared building blocks for the Call of Duty asset parsers.
//!
//! Every format crate in this workspace reads little-endian binary layouts
//! through [`io_ext::CodReadExt`] and produces the value types from
//! [`types`]. Version tags shared by several formats live in [`version`].

pub mod error;
pub mod io_ext;
pub mod types;
pub mod version;

pub use error::{DataError, Result};

pub mod prelude {
    pub use crate::io_ext::CodReadExt;
    pub use crate::types::{Color, Quaternion, Triangle, Uv, Vec3};
    pub use crate::version::{Game, ModelType, ModelVersion};
    pub use byteorder::{LittleEndian, ReadBytesExt};
    pub use std::io::{Read, Seek, SeekFrom};
}
