//! Model descriptors: the LOD list and the material names per LOD.

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use cod_data::version::ModelVersion;
use log::{debug, trace};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::{Result, XModelError};
use crate::file_stem;

/// Bytes per collision vertex in the skipped collision block
const COLLISION_VERTEX_SIZE: u64 = 48;
/// Fixed bytes trailing each collision entry
const COLLISION_ENTRY_TRAILER: u64 = 36;

/// Header layout per descriptor version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorLayout {
    /// Bytes between the version and the first LOD slot
    pub header_padding: u64,
    pub lod_slots: usize,
}

impl DescriptorLayout {
    pub const fn for_version(version: ModelVersion) -> Self {
        match version {
            ModelVersion::V14 => Self {
                header_padding: 24,
                lod_slots: 3,
            },
            ModelVersion::V20 => Self {
                header_padding: 25,
                lod_slots: 4,
            },
            ModelVersion::V25 => Self {
                header_padding: 26,
                lod_slots: 4,
            },
        }
    }
}

/// One level of detail
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Lod {
    /// Shared by the xmodelpart and xmodelsurf files of this LOD
    pub name: String,
    pub distance: f32,
    /// Material names, or texture names for version 14
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct XModel {
    pub name: String,
    pub version: ModelVersion,
    pub lods: Vec<Lod>,
}

impl XModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader, file_stem(path))
    }

    pub fn parse<R: Read + Seek>(reader: &mut R, name: impl Into<String>) -> Result<Self> {
        let version = read_model_version(reader, "xmodel")?;
        let layout = DescriptorLayout::for_version(version);

        reader.skip_bytes(layout.header_padding)?;

        let mut lods = Vec::with_capacity(layout.lod_slots);
        for _ in 0..layout.lod_slots {
            let distance = reader.read_f32::<LittleEndian>()?;
            let name = reader.read_cstring()?;
            if !name.is_empty() {
                lods.push(Lod {
                    name,
                    distance,
                    materials: Vec::new(),
                });
            }
        }

        reader.skip_bytes(4)?;
        let collision_count = reader.read_u32::<LittleEndian>()?;
        for _ in 0..collision_count {
            let vertex_count = u64::from(reader.read_u32::<LittleEndian>()?);
            reader.skip_bytes(vertex_count * COLLISION_VERTEX_SIZE + COLLISION_ENTRY_TRAILER)?;
        }

        for lod in &mut lods {
            let material_count = reader.read_u16::<LittleEndian>()?;
            for _ in 0..material_count {
                lod.materials.push(reader.read_cstring()?);
            }
            trace!("LOD {} at {}: {:?}", lod.name, lod.distance, lod.materials);
        }

        let name = name.into();
        debug!("XModel {} ({}) has {} LODs", name, version, lods.len());

        Ok(Self {
            name,
            version,
            lods,
        })
    }
}

/// Reads the leading u16 version shared by all three model file types.
pub(crate) fn read_model_version<R: Read>(
    reader: &mut R,
    kind: &'static str,
) -> Result<ModelVersion> {
    let version = reader.read_u16::<LittleEndian>()?;
    ModelVersion::from_version_number(version)
        .map_err(|_| XModelError::UnsupportedVersion { kind, version })
}
