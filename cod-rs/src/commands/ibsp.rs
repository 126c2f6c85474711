//! IBSP level command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use cod_ibsp::Level;
use std::path::{Path, PathBuf};

use crate::utils::{add_table_row, create_table, format_vec3};

#[derive(Subcommand)]
pub enum IbspCommands {
    /// Display lump counts and per-surface summary of a level
    Info {
        /// Path to the IBSP file
        file: PathBuf,

        /// List placed model entities
        #[arg(short, long)]
        entities: bool,
    },
}

pub fn execute(cmd: IbspCommands) -> Result<()> {
    match cmd {
        IbspCommands::Info { file, entities } => handle_info(&file, entities),
    }
}

fn handle_info(path: &Path, show_entities: bool) -> Result<()> {
    let level =
        Level::load(path).with_context(|| format!("Failed to load level from {}", path.display()))?;

    println!("IBSP Level: {}", path.display());
    println!("  Version:        {}", level.version());
    println!("  Materials:      {}", level.materials.len());
    println!("  Triangle soups: {}", level.triangle_soups.len());
    println!("  Vertices:       {}", level.vertices.len());
    println!("  Triangles:      {}", level.triangles.len());
    println!("  Surfaces:       {}", level.surfaces.len());
    println!("  Entities:       {}", level.entities.len());

    if !level.surfaces.is_empty() {
        let mut table = create_table(vec!["Material", "Draw order", "Vertices", "Triangles"]);
        for surface in &level.surfaces {
            add_table_row(
                &mut table,
                vec![
                    surface.material.clone(),
                    surface.draw_order.to_string(),
                    surface.vertices.len().to_string(),
                    surface.triangles.len().to_string(),
                ],
            );
        }
        println!();
        table.printstd();
    }

    if !level.skipped_surfaces.is_empty() {
        println!("\nSkipped surfaces:");
        for skipped in &level.skipped_surfaces {
            println!("  soup {}: {}", skipped.soup_index, skipped.error);
        }
    }

    if let Some(error) = &level.entity_error {
        println!("\nEntity lump could not be parsed: {error}");
    }

    if show_entities && !level.entities.is_empty() {
        let mut table = create_table(vec!["Model", "Class", "Origin", "Angles", "Scale"]);
        for entity in &level.entities {
            add_table_row(
                &mut table,
                vec![
                    entity.name.clone(),
                    entity.classname.clone(),
                    format_vec3(entity.origin),
                    format_vec3(entity.angles),
                    format_vec3(entity.scale),
                ],
            );
        }
        println!();
        table.printstd();
    }

    Ok(())
}
