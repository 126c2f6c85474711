//! Parsers for Call of Duty model files.
//!
//! A model is split across three files sharing a name convention:
//!
//! - `xmodel/<name>`: the descriptor listing LODs and their materials
//! - `xmodelparts/<lod>`: the skeleton of one LOD
//! - `xmodelsurfs/<lod>`: the skinned surfaces of one LOD
//!
//! ```no_run
//! use cod_xmodel::{XModelPart, XModelSurf};
//!
//! let part = XModelPart::load("xmodelparts/viewmodel_hands_cloth4")?;
//! let surf = XModelSurf::load("xmodelsurfs/viewmodel_hands_cloth4", Some(&part))?;
//! println!("{} bones, {} vertices", part.bones.len(), surf.vertex_count());
//! # Ok::<(), cod_xmodel::XModelError>(())
//! ```

pub mod error;
pub mod model;
pub mod viewhands;
pub mod xmodel;
pub mod xmodelpart;
pub mod xmodelsurf;

pub use error::{Result, XModelError};
pub use model::{Model, ModelLod};
pub use xmodel::{DescriptorLayout, Lod, XModel};
pub use xmodelpart::{Bone, BoneTransform, SkeletonLayout, XModelPart};
pub use xmodelsurf::{
    SkippedSurface, Surface, SurfaceLayout, SurfaceVertex, Weight, XModelSurf,
};

use std::path::Path;

/// Asset name as used by the file-name conventions: the final path
/// component without extension.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
