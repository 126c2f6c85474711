//! xmodel, xmodelpart and xmodelsurf command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use cod_xmodel::{XModel, XModelPart, XModelSurf};
use std::path::{Path, PathBuf};

use crate::utils::{add_table_row, create_table, format_quat, format_vec3};

#[derive(Subcommand)]
pub enum XModelCommands {
    /// Display the LODs and materials of an xmodel descriptor
    Info {
        /// Path to the xmodel file
        file: PathBuf,
    },

    /// Display the bone table of an xmodelpart skeleton
    Part {
        /// Path to the xmodelpart file
        file: PathBuf,
    },

    /// Display vertex and triangle counts of an xmodelsurf
    Surf {
        /// Path to the xmodelsurf file
        file: PathBuf,

        /// Skeleton used to move vertices into world space
        #[arg(short, long)]
        part: Option<PathBuf>,
    },
}

pub fn execute(cmd: XModelCommands) -> Result<()> {
    match cmd {
        XModelCommands::Info { file } => handle_info(&file),
        XModelCommands::Part { file } => handle_part(&file),
        XModelCommands::Surf { file, part } => handle_surf(&file, part.as_deref()),
    }
}

fn handle_info(path: &Path) -> Result<()> {
    let model =
        XModel::load(path).with_context(|| format!("Failed to load xmodel {}", path.display()))?;

    println!("XModel: {}", model.name);
    println!("  Version: {}", model.version);
    println!("  LODs:    {}", model.lods.len());

    let mut table = create_table(vec!["LOD", "Distance", "Materials"]);
    for lod in &model.lods {
        add_table_row(
            &mut table,
            vec![
                lod.name.clone(),
                lod.distance.to_string(),
                lod.materials.join(", "),
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn handle_part(path: &Path) -> Result<()> {
    let part = XModelPart::load(path)
        .with_context(|| format!("Failed to load xmodelpart {}", path.display()))?;

    println!("XModelPart: {}", part.name);
    println!("  Version: {}", part.version);
    println!("  Type:    {:?}", part.model_type);
    println!("  Bones:   {}", part.bones.len());

    let mut table = create_table(vec![
        "#",
        "Name",
        "Parent",
        "Local position",
        "World position",
        "World rotation",
    ]);
    for (index, bone) in part.bones.iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                index.to_string(),
                bone.name.clone(),
                bone.parent.map_or_else(|| "-".to_string(), |p| p.to_string()),
                format_vec3(bone.local.position),
                format_vec3(bone.world.position),
                format_quat(bone.world.rotation),
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn handle_surf(path: &Path, part: Option<&Path>) -> Result<()> {
    let skeleton = part
        .map(|p| {
            XModelPart::load(p).with_context(|| format!("Failed to load xmodelpart {}", p.display()))
        })
        .transpose()?;

    let surf = XModelSurf::load(path, skeleton.as_ref())
        .with_context(|| format!("Failed to load xmodelsurf {}", path.display()))?;

    println!("XModelSurf: {}", surf.name);
    println!("  Version:   {}", surf.version);
    println!("  Surfaces:  {}", surf.surfaces.len());
    println!("  Vertices:  {}", surf.vertex_count());
    println!("  Triangles: {}", surf.triangle_count());
    if let Some(skeleton) = &skeleton {
        println!("  Skeleton:  {} ({} bones)", skeleton.name, skeleton.bones.len());
    }

    let mut table = create_table(vec!["#", "Vertices", "Triangles", "Weighted vertices"]);
    for (index, surface) in surf.surfaces.iter().enumerate() {
        let weighted = surface
            .vertices
            .iter()
            .filter(|v| v.weights.len() > 1)
            .count();
        add_table_row(
            &mut table,
            vec![
                index.to_string(),
                surface.vertices.len().to_string(),
                surface.triangles.len().to_string(),
                weighted.to_string(),
            ],
        );
    }
    table.printstd();

    if !surf.skipped_surfaces.is_empty() {
        println!("\nSkipped surfaces:");
        for skipped in &surf.skipped_surfaces {
            println!("  surface {}: {}", skipped.index, skipped.error);
        }
    }

    Ok(())
}
