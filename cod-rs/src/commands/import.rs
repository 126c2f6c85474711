//! Import command implementations

use anyhow::Result;
use clap::Subcommand;
use cod_data::version::Game;
use serde::Serialize;
use std::path::PathBuf;

use crate::import::{AssetRoot, ImportedLevel, ImportedMaterial, ImportedModel, import_level, import_model};

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Load an xmodel with its skeletons, surfaces, materials and textures
    Model {
        /// Root of the extracted assets
        #[arg(short, long, env = "COD_ASSET_ROOT")]
        root: PathBuf,

        /// Model name under xmodel/
        name: String,

        /// Game the model ships with
        #[arg(short, long, default_value = "cod2")]
        game: Game,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a level with its materials and every placed model
    Level {
        /// Root of the extracted assets
        #[arg(short, long, env = "COD_ASSET_ROOT")]
        root: PathBuf,

        /// Path to the IBSP file
        bsp: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct MaterialSummary {
    pub name: String,
    pub techset: Option<String>,
    pub textures: Vec<String>,
}

impl From<&ImportedMaterial> for MaterialSummary {
    fn from(material: &ImportedMaterial) -> Self {
        Self {
            name: material.name.clone(),
            techset: material.material.as_ref().map(|m| m.techset.clone()),
            textures: material.textures.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LodSummary {
    pub name: String,
    pub distance: f32,
    pub bones: usize,
    pub surfaces: usize,
    pub skipped_surfaces: usize,
    pub vertices: usize,
    pub triangles: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub version: String,
    pub lods: Vec<LodSummary>,
    pub materials: Vec<MaterialSummary>,
}

impl From<&ImportedModel> for ModelSummary {
    fn from(imported: &ImportedModel) -> Self {
        let model = &imported.model;
        Self {
            name: model.name.clone(),
            version: model.version.to_string(),
            lods: model
                .lods
                .iter()
                .map(|lod| LodSummary {
                    name: lod.lod.name.clone(),
                    distance: lod.lod.distance,
                    bones: lod.skeleton.as_ref().map_or(0, |s| s.bones.len()),
                    surfaces: lod.surface.surfaces.len(),
                    skipped_surfaces: lod.surface.skipped_surfaces.len(),
                    vertices: lod.surface.vertex_count(),
                    triangles: lod.surface.triangle_count(),
                })
                .collect(),
            materials: imported.materials.iter().map(MaterialSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LevelSummary {
    pub name: String,
    pub game: String,
    pub version: String,
    pub surfaces: usize,
    pub skipped_surfaces: usize,
    pub entities: usize,
    pub entity_error: Option<String>,
    pub materials: Vec<MaterialSummary>,
    pub models: Vec<ModelSummary>,
    pub failed_models: Vec<String>,
}

impl From<&ImportedLevel> for LevelSummary {
    fn from(imported: &ImportedLevel) -> Self {
        let level = &imported.level;
        Self {
            name: imported.name.clone(),
            game: imported.game.to_string(),
            version: level.version().to_string(),
            surfaces: level.surfaces.len(),
            skipped_surfaces: level.skipped_surfaces.len(),
            entities: level.entities.len(),
            entity_error: level.entity_error.as_ref().map(ToString::to_string),
            materials: imported.materials.iter().map(MaterialSummary::from).collect(),
            models: imported.models.values().map(ModelSummary::from).collect(),
            failed_models: imported.failed_models.clone(),
        }
    }
}

pub fn execute(cmd: ImportCommands) -> Result<()> {
    match cmd {
        ImportCommands::Model {
            root,
            name,
            game,
            json,
        } => {
            let imported = import_model(&AssetRoot::new(root), &name, game)?;
            let summary = ModelSummary::from(&imported);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_model(&summary, "");
            }
            Ok(())
        }
        ImportCommands::Level { root, bsp, json } => {
            let imported = import_level(&AssetRoot::new(root), &bsp)?;
            let summary = LevelSummary::from(&imported);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_level(&summary);
            }
            Ok(())
        }
    }
}

fn print_model(summary: &ModelSummary, indent: &str) {
    println!("{indent}Model: {} ({})", summary.name, summary.version);
    for lod in &summary.lods {
        println!(
            "{indent}  LOD {} @ {}: {} bones, {} surfaces, {} vertices, {} triangles",
            lod.name, lod.distance, lod.bones, lod.surfaces, lod.vertices, lod.triangles
        );
    }
    for material in &summary.materials {
        println!(
            "{indent}  Material {}: {} textures",
            material.name,
            material.textures.len()
        );
    }
}

fn print_level(summary: &LevelSummary) {
    println!("Level: {} ({}, IBSP {})", summary.name, summary.game, summary.version);
    println!(
        "  Surfaces: {} ({} skipped)",
        summary.surfaces, summary.skipped_surfaces
    );
    println!("  Entities: {}", summary.entities);
    if let Some(error) = &summary.entity_error {
        println!("  Entity lump error: {error}");
    }
    println!("  Materials: {}", summary.materials.len());
    for model in &summary.models {
        print_model(model, "  ");
    }
    if !summary.failed_models.is_empty() {
        println!("  Failed models: {}", summary.failed_models.join(", "));
    }
}
