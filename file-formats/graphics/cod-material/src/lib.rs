//! Parser for Call of Duty material files.
//!
//! ```no_run
//! use cod_data::version::ModelVersion;
//! use cod_material::Material;
//!
//! let material = Material::load("materials/mtl_wall_brick", ModelVersion::V20)?;
//! for texture in &material.textures {
//!     println!("{}: {}", texture.texture_type, texture.name);
//! }
//! # Ok::<(), cod_material::MaterialError>(())
//! ```

pub mod error;

pub use error::{MaterialError, Result};

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use cod_data::version::ModelVersion;
use log::{debug, trace};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes between the name pointer and the texture count.
pub fn header_padding(version: ModelVersion) -> u64 {
    match version {
        ModelVersion::V20 => 48,
        ModelVersion::V14 | ModelVersion::V25 => 44,
    }
}

/// One texture slot of a material
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct TextureBinding {
    /// Semantic slot, e.g. `colorMap`
    pub texture_type: String,
    pub flags: u32,
    /// Texture file name without extension
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Material {
    pub name: String,
    pub techset: String,
    /// Bindings in file order; names may repeat
    pub textures: Vec<TextureBinding>,
}

impl Material {
    pub fn load<P: AsRef<Path>>(path: P, version: ModelVersion) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader, version)
    }

    pub fn parse<R: Read + Seek>(reader: &mut R, version: ModelVersion) -> Result<Self> {
        let file_size = reader.total_len()?;

        let name_offset = reader.read_u32::<LittleEndian>()?;
        let name = read_string_at(reader, "name", name_offset, file_size)?;

        reader.skip_bytes(header_padding(version))?;

        let texture_count = reader.read_u16::<LittleEndian>()?;
        reader.skip_bytes(2)?;
        let techset_offset = reader.read_u32::<LittleEndian>()?;
        let textures_offset = reader.read_u32::<LittleEndian>()?;

        let techset = read_string_at(reader, "techset", techset_offset, file_size)?;

        check_offset("textures", textures_offset, file_size)?;
        reader.seek(SeekFrom::Start(u64::from(textures_offset)))?;

        let mut textures = Vec::with_capacity(usize::from(texture_count));
        for _ in 0..texture_count {
            let type_offset = reader.read_u32::<LittleEndian>()?;
            let flags = reader.read_u32::<LittleEndian>()?;
            let name_offset = reader.read_u32::<LittleEndian>()?;

            let texture_type = read_string_at(reader, "texture type", type_offset, file_size)?;
            let name = read_string_at(reader, "texture name", name_offset, file_size)?;
            trace!("{name}: {texture_type} flags {flags:#010x}");

            textures.push(TextureBinding {
                texture_type,
                flags,
                name,
            });
        }

        debug!(
            "Material {} uses techset {} with {} textures",
            name,
            techset,
            textures.len()
        );

        Ok(Self {
            name,
            techset,
            textures,
        })
    }

    /// Texture names in first-seen order with duplicates removed.
    pub fn unique_texture_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.textures
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

fn check_offset(field: &'static str, offset: u32, file_size: u64) -> Result<()> {
    if u64::from(offset) >= file_size {
        return Err(MaterialError::InvalidOffset {
            field,
            offset,
            file_size,
        });
    }
    Ok(())
}

fn read_string_at<R: Read + Seek>(
    reader: &mut R,
    field: &'static str,
    offset: u32,
    file_size: u64,
) -> Result<String> {
    check_offset(field, offset, file_size)?;
    Ok(reader.read_cstring_at(u64::from(offset))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ModelVersion::V14, 44)]
    #[test_case(ModelVersion::V20, 48)]
    #[test_case(ModelVersion::V25, 44)]
    fn test_header_padding(version: ModelVersion, expected: u64) {
        assert_eq!(header_padding(version), expected);
    }

    #[test]
    fn test_unique_texture_names() {
        let binding = |texture_type: &str, name: &str| TextureBinding {
            texture_type: texture_type.to_string(),
            flags: 0,
            name: name.to_string(),
        };
        let material = Material {
            name: "mtl_test".to_string(),
            techset: "l_sm_b0c0".to_string(),
            textures: vec![
                binding("colorMap", "brick_c"),
                binding("detailMap", "brick_c"),
                binding("normalMap", "brick_n"),
            ],
        };
        assert_eq!(material.unique_texture_names(), vec!["brick_c", "brick_n"]);
    }
}
