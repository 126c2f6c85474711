//! Material command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use cod_data::version::Game;
use cod_material::Material;
use std::path::{Path, PathBuf};

use crate::utils::{add_table_row, create_table};

#[derive(Subcommand)]
pub enum MaterialCommands {
    /// Display the technique set and texture bindings of a material
    Info {
        /// Path to the material file
        file: PathBuf,

        /// Game the material ships with (cod2, cod4, cod5)
        #[arg(short, long, default_value = "cod2")]
        game: Game,
    },
}

pub fn execute(cmd: MaterialCommands) -> Result<()> {
    match cmd {
        MaterialCommands::Info { file, game } => handle_info(&file, game),
    }
}

fn handle_info(path: &Path, game: Game) -> Result<()> {
    let material = Material::load(path, game.model_version())
        .with_context(|| format!("Failed to load material from {}", path.display()))?;

    println!("Material: {}", material.name);
    println!("  Techset:  {}", material.techset);
    println!("  Textures: {}", material.textures.len());

    if !material.textures.is_empty() {
        let mut table = create_table(vec!["Type", "Flags", "Texture"]);
        for binding in &material.textures {
            add_table_row(
                &mut table,
                vec![
                    binding.texture_type.clone(),
                    format!("{:#010x}", binding.flags),
                    binding.name.clone(),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}
