//! Loads a model or level together with every file it references.
//!
//! The decoders only see fully joined paths. This module owns the
//! directory convention of an extracted game install and fans work out over
//! rayon: level materials in parallel, then one job per distinct entity
//! model. A unit that fails to load is logged and skipped.

use anyhow::{Context, Result};
use cod_data::version::{Game, ModelVersion};
use cod_ibsp::{Entity, IbspVersion, Level};
use cod_iwi::Iwi;
use cod_material::Material;
use cod_xmodel::{Model, XModel};
use log::{info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub const MATERIALS_DIR: &str = "materials";
pub const IMAGES_DIR: &str = "images";
pub const XMODEL_DIR: &str = "xmodel";
pub const XMODELPARTS_DIR: &str = "xmodelparts";
pub const XMODELSURFS_DIR: &str = "xmodelsurfs";
pub const MAPS_DIR: &str = "maps";
pub const TEXTURE_EXTENSION: &str = "iwi";

/// Root of an extracted asset tree
#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn material(&self, name: &str) -> PathBuf {
        self.root.join(MATERIALS_DIR).join(name)
    }

    pub fn image(&self, name: &str) -> PathBuf {
        let mut path = self.root.join(IMAGES_DIR).join(name);
        path.set_extension(TEXTURE_EXTENSION);
        path
    }

    pub fn xmodel(&self, name: &str) -> PathBuf {
        self.root.join(XMODEL_DIR).join(name)
    }

    pub fn xmodelparts(&self) -> PathBuf {
        self.root.join(XMODELPARTS_DIR)
    }

    pub fn xmodelsurfs(&self) -> PathBuf {
        self.root.join(XMODELSURFS_DIR)
    }

    pub fn map(&self, name: &str) -> PathBuf {
        self.root.join(MAPS_DIR).join(name)
    }
}

#[derive(Debug, Clone)]
pub struct ImportedTexture {
    pub name: String,
    /// Semantic slot of the first binding using this texture
    pub texture_type: Option<String>,
    pub image: Iwi,
}

#[derive(Debug, Clone)]
pub struct ImportedMaterial {
    pub name: String,
    /// `None` for assets whose material names are texture names
    pub material: Option<Material>,
    pub textures: Vec<ImportedTexture>,
}

#[derive(Debug, Clone)]
pub struct ImportedModel {
    pub model: Model,
    pub materials: Vec<ImportedMaterial>,
}

#[derive(Debug)]
pub struct ImportedLevel {
    pub name: String,
    pub game: Game,
    pub level: Level,
    pub materials: Vec<ImportedMaterial>,
    /// One entry per distinct entity model that loaded
    pub models: BTreeMap<String, ImportedModel>,
    /// Distinct entity models that failed to load
    pub failed_models: Vec<String>,
}

impl ImportedLevel {
    /// Entities whose model is available.
    pub fn placed_entities(&self) -> impl Iterator<Item = (&Entity, &ImportedModel)> {
        self.level
            .entities
            .iter()
            .filter_map(|e| self.models.get(&e.name).map(|m| (e, m)))
    }
}

/// Game a level belongs to, by its BSP version.
pub fn level_game(version: IbspVersion) -> Game {
    match version {
        IbspVersion::V59 => Game::Cod1,
        IbspVersion::V4 => Game::Cod2,
    }
}

/// Loads a material and each distinct texture it binds.
///
/// A texture that fails to load is logged and left out.
pub fn import_material(
    root: &AssetRoot,
    name: &str,
    version: ModelVersion,
) -> Result<ImportedMaterial> {
    let path = root.material(name);
    let material = Material::load(&path, version)
        .with_context(|| format!("Failed to load material {}", path.display()))?;

    let textures = material
        .unique_texture_names()
        .into_iter()
        .filter_map(|texture| {
            let texture_type = material
                .textures
                .iter()
                .find(|binding| binding.name == texture)
                .map(|binding| binding.texture_type.clone());
            load_texture(root, texture, texture_type)
        })
        .collect();

    Ok(ImportedMaterial {
        name: name.to_string(),
        material: Some(material),
        textures,
    })
}

/// Version 14 assets and version 59 levels name their textures directly.
fn import_texture_material(root: &AssetRoot, name: &str) -> ImportedMaterial {
    ImportedMaterial {
        name: name.to_string(),
        material: None,
        textures: load_texture(root, name, None).into_iter().collect(),
    }
}

fn load_texture(
    root: &AssetRoot,
    name: &str,
    texture_type: Option<String>,
) -> Option<ImportedTexture> {
    let path = root.image(name);
    match Iwi::load(&path) {
        Ok(image) => Some(ImportedTexture {
            name: name.to_string(),
            texture_type,
            image,
        }),
        Err(e) => {
            warn!("Skipping texture {}: {e}", path.display());
            None
        }
    }
}

/// Loads a model descriptor, its LOD skeletons and surfaces, and its
/// materials.
pub fn import_model(root: &AssetRoot, name: &str, game: Game) -> Result<ImportedModel> {
    let path = root.xmodel(name);
    let descriptor = XModel::load(&path)
        .with_context(|| format!("Failed to load xmodel {}", path.display()))?;

    if descriptor.version != game.model_version() {
        warn!(
            "{} is a {} model, expected {} for {}",
            name,
            descriptor.version,
            game.model_version(),
            game
        );
    }

    let version = descriptor.version;
    let model = Model::load(descriptor, &root.xmodelparts(), &root.xmodelsurfs())
        .with_context(|| format!("Failed to load geometry of {name}"))?;

    let materials = model
        .material_names()
        .into_iter()
        .filter_map(|material| match version {
            ModelVersion::V14 => Some(import_texture_material(root, material)),
            ModelVersion::V20 | ModelVersion::V25 => {
                match import_material(root, material, version) {
                    Ok(material) => Some(material),
                    Err(e) => {
                        warn!("{e:#}");
                        None
                    }
                }
            }
        })
        .collect();

    info!("Imported model {name}");
    Ok(ImportedModel { model, materials })
}

/// Loads a level, its materials and every distinct entity model.
///
/// All materials finish loading before any model import starts.
pub fn import_level(root: &AssetRoot, path: &Path) -> Result<ImportedLevel> {
    let level =
        Level::load(path).with_context(|| format!("Failed to load level {}", path.display()))?;
    let game = level_game(level.version());
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let material_names = level.material_names();
    let materials: Vec<ImportedMaterial> = material_names
        .par_iter()
        .filter_map(|&material| match level.version() {
            IbspVersion::V59 => Some(import_texture_material(root, material)),
            IbspVersion::V4 => match import_material(root, material, game.model_version()) {
                Ok(material) => Some(material),
                Err(e) => {
                    warn!("{e:#}");
                    None
                }
            },
        })
        .collect();
    info!(
        "Loaded {} of {} level materials",
        materials.len(),
        material_names.len()
    );

    let model_names: BTreeSet<&str> = level.entities.iter().map(|e| e.name.as_str()).collect();
    let results: Vec<(String, Result<ImportedModel>)> = model_names
        .into_par_iter()
        .map(|model| (model.to_string(), import_model(root, model, game)))
        .collect();

    let mut models = BTreeMap::new();
    let mut failed_models = Vec::new();
    for (model, result) in results {
        match result {
            Ok(imported) => {
                models.insert(model, imported);
            }
            Err(e) => {
                warn!("Skipping model {model}: {e:#}");
                failed_models.push(model);
            }
        }
    }

    Ok(ImportedLevel {
        name,
        game,
        level,
        materials,
        models,
        failed_models,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        let root = AssetRoot::new("/games/cod2/main");
        assert_eq!(
            root.image("weapon_kar98"),
            PathBuf::from("/games/cod2/main/images/weapon_kar98.iwi")
        );
        assert_eq!(
            root.material("mtl_kar98"),
            PathBuf::from("/games/cod2/main/materials/mtl_kar98")
        );
        assert_eq!(
            root.xmodel("weapon_kar98"),
            PathBuf::from("/games/cod2/main/xmodel/weapon_kar98")
        );
        assert_eq!(
            root.xmodelparts(),
            PathBuf::from("/games/cod2/main/xmodelparts")
        );
        assert_eq!(
            root.map("mp_toujane.d3dbsp"),
            PathBuf::from("/games/cod2/main/maps/mp_toujane.d3dbsp")
        );
    }

    #[test]
    fn test_level_game() {
        assert_eq!(level_game(IbspVersion::V59), Game::Cod1);
        assert_eq!(level_game(IbspVersion::V4), Game::Cod2);
    }
}
