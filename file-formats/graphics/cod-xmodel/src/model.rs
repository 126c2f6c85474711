//! A descriptor together with the skeleton and surfaces of each LOD.

use log::warn;
use std::path::Path;

use crate::error::{Result, XModelError};
use crate::xmodel::{Lod, XModel};
use crate::xmodelpart::XModelPart;
use crate::xmodelsurf::XModelSurf;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct ModelLod {
    pub lod: Lod,
    /// Missing when the xmodelpart failed to load
    pub skeleton: Option<XModelPart>,
    pub surface: XModelSurf,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Model {
    pub name: String,
    pub version: cod_data::version::ModelVersion,
    pub lods: Vec<ModelLod>,
}

impl Model {
    /// Loads every LOD of `descriptor` from the sibling part and surface
    /// directories.
    ///
    /// The skeleton must be read before the surface. A skeleton that fails
    /// to load is logged and the surface stays in bind space; a surface
    /// failure fails the whole model.
    pub fn load(descriptor: XModel, parts_dir: &Path, surfs_dir: &Path) -> Result<Self> {
        let mut lods = Vec::with_capacity(descriptor.lods.len());

        for lod in descriptor.lods {
            let skeleton = match XModelPart::load(parts_dir.join(&lod.name)) {
                Ok(part) => Some(part),
                Err(e) => {
                    warn!("No skeleton for {}: {e}", lod.name);
                    None
                }
            };

            let surface = XModelSurf::load(surfs_dir.join(&lod.name), skeleton.as_ref())
                .map_err(|e| XModelError::Surface {
                    surface: lod.name.clone(),
                    source: Box::new(e),
                })?;

            lods.push(ModelLod {
                lod,
                skeleton,
                surface,
            });
        }

        Ok(Self {
            name: descriptor.name,
            version: descriptor.version,
            lods,
        })
    }

    /// Material names of every LOD in first-seen order.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.lods.iter().flat_map(|l| &l.lod.materials) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}
