//! IWi texture command implementations

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use cod_iwi::{Iwi, IwiLayout};
use image::ImageFormat;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::utils::format_bytes;

#[derive(Subcommand)]
pub enum IwiCommands {
    /// Display header, info block and selected mipmap of an IWi file
    Info {
        /// Path to the IWi file
        file: PathBuf,
    },

    /// Decode an IWi texture and write it as PNG
    Convert {
        /// Input IWi file
        input: PathBuf,

        /// Output PNG file
        output: PathBuf,
    },
}

pub fn execute(cmd: IwiCommands) -> Result<()> {
    match cmd {
        IwiCommands::Info { file } => handle_info(&file),
        IwiCommands::Convert { input, output } => handle_convert(&input, &output),
    }
}

fn handle_info(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let layout = IwiLayout::read(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read IWi layout from {}", path.display()))?;

    println!("IWi Texture: {}", path.display());
    println!("  Version:   {}", layout.header.version);
    match layout.info.texture_format() {
        Some(format) => println!("  Format:    {format} ({:#04x})", layout.info.format),
        None => println!("  Format:    unknown ({:#04x})", layout.info.format),
    }
    println!("  Usage:     {}", layout.info.usage);
    println!(
        "  Size:      {}x{} (depth {})",
        layout.info.width, layout.info.height, layout.info.depth
    );
    println!("  File size: {}", format_bytes(layout.file_size));
    println!("  Markers:   {:?}", layout.markers);
    println!(
        "  Mipmap:    offset {} ({})",
        layout.mipmap.offset,
        format_bytes(layout.mipmap.size)
    );

    Ok(())
}

fn handle_convert(input: &Path, output: &Path) -> Result<()> {
    let iwi =
        Iwi::load(input).with_context(|| format!("Failed to load IWi from {}", input.display()))?;

    let image = iwi
        .to_rgba_image()
        .ok_or_else(|| anyhow!("Decoded pixel buffer does not match {}x{}", iwi.width(), iwi.height()))?;
    image
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Converted {} ({}x{}) to {}",
        input.display(),
        iwi.width(),
        iwi.height(),
        output.display()
    );
    Ok(())
}
