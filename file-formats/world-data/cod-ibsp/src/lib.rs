//! Parser for Call of Duty IBSP level files.
//!
//! Reading is sequential: header, lump directory, materials, triangle
//! soups, vertices, triangles and entities, after which every soup is
//! resolved into a [`Surface`].
//!
//! ```no_run
//! use cod_ibsp::Level;
//!
//! let level = Level::load("maps/mp/mp_harbor.d3dbsp")?;
//! for surface in &level.surfaces {
//!     println!("{}: {} triangles", surface.material, surface.triangles.len());
//! }
//! for entity in &level.entities {
//!     println!("{} at {:?}", entity.name, entity.origin);
//! }
//! # Ok::<(), cod_ibsp::IbspError>(())
//! ```

pub mod entity;
pub mod error;
pub mod geometry;
pub mod lump;
pub mod surface;
pub mod version;

pub use entity::{Entity, parse_entities, parse_transform};
pub use error::{IbspError, Result};
pub use geometry::{BspMaterial, RawVertex, TriangleSoup, Vertex};
pub use lump::{LUMP_COUNT, Lump, LumpDirectory};
pub use surface::{SkippedSurface, Surface, build_surface};
pub use version::{IbspVersion, LumpKind, LumpTable};

use cod_data::io_ext::CodReadExt;
use cod_data::types::Triangle;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

/// Magic signature at the start of every IBSP file
pub const IBSP_MAGIC: [u8; 4] = *b"IBSP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IbspHeader {
    pub magic: [u8; 4],
    pub version: IbspVersion,
}

impl IbspHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != IBSP_MAGIC {
            return Err(IbspError::InvalidMagic {
                expected: String::from_utf8_lossy(&IBSP_MAGIC).into_owned(),
                found: String::from_utf8_lossy(&magic).into_owned(),
            });
        }

        let version = IbspVersion::from_version_number(reader.read_i32::<LittleEndian>()?)?;
        Ok(Self { magic, version })
    }
}

/// A fully decoded level
#[derive(Debug)]
pub struct Level {
    pub header: IbspHeader,
    pub lumps: LumpDirectory,
    pub materials: Vec<BspMaterial>,
    pub triangle_soups: Vec<TriangleSoup>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    /// Placed `xmodel/...` instances
    pub entities: Vec<Entity>,
    /// Set when the entity lump could not be parsed; geometry is still valid
    pub entity_error: Option<IbspError>,
    pub surfaces: Vec<Surface>,
    pub skipped_surfaces: Vec<SkippedSurface>,
}

impl Level {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader)
    }

    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let file_size = reader.total_len()?;
        let header = IbspHeader::read(reader)?;
        let lumps = LumpDirectory::read(reader)?;
        let version = header.version;
        let table = version.lump_table();
        debug!("IBSP version {version}, {file_size} bytes");

        let lump = lumps.get(table, LumpKind::Materials, file_size)?;
        let materials = read_records(reader, lump, geometry::MATERIAL_SIZE, BspMaterial::read)?;

        let lump = lumps.get(table, LumpKind::TriangleSoups, file_size)?;
        let triangle_soups =
            read_records(reader, lump, geometry::TRIANGLE_SOUP_SIZE, TriangleSoup::read)?;

        let lump = lumps.get(table, LumpKind::Vertices, file_size)?;
        let vertices = read_records(reader, lump, version.vertex_size(), |r| {
            RawVertex::read(r, version).map(RawVertex::into_vertex)
        })?;

        let lump = lumps.get(table, LumpKind::Triangles, file_size)?;
        let triangles = read_records(reader, lump, geometry::TRIANGLE_SIZE, geometry::read_triangle)?;

        debug!(
            "Found {} materials, {} triangle soups, {} vertices, {} triangles",
            materials.len(),
            triangle_soups.len(),
            vertices.len(),
            triangles.len()
        );

        let lump = lumps.get(table, LumpKind::Entities, file_size)?;
        reader.seek(SeekFrom::Start(u64::from(lump.offset)))?;
        let mut raw_entities = vec![0u8; lump.length as usize];
        reader.read_exact(&mut raw_entities)?;

        let (entities, entity_error) = match parse_entities(&raw_entities) {
            Ok(entities) => (entities, None),
            Err(e) => {
                warn!("Failed to parse entity lump: {e}");
                (Vec::new(), Some(e))
            }
        };
        debug!("Found {} model entities", entities.len());

        let mut surfaces = Vec::with_capacity(triangle_soups.len());
        let mut skipped_surfaces = Vec::new();
        for (soup_index, soup) in triangle_soups.iter().enumerate() {
            match build_surface(soup, &materials, &vertices, &triangles) {
                Ok(surface) => surfaces.push(surface),
                Err(error) => {
                    warn!("Skipping triangle soup {soup_index}: {error}");
                    skipped_surfaces.push(SkippedSurface { soup_index, error });
                }
            }
        }

        Ok(Self {
            header,
            lumps,
            materials,
            triangle_soups,
            vertices,
            triangles,
            entities,
            entity_error,
            surfaces,
            skipped_surfaces,
        })
    }

    pub fn version(&self) -> IbspVersion {
        self.header.version
    }

    /// Distinct material names in first-seen order.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.materials.len());
        for material in &self.materials {
            if !names.contains(&material.name.as_str()) {
                names.push(&material.name);
            }
        }
        names
    }
}

/// Seeks to a lump and reads as many whole records as it holds.
fn read_records<R, T, F>(reader: &mut R, lump: Lump, size: usize, mut read: F) -> Result<Vec<T>>
where
    R: Read + Seek,
    F: FnMut(&mut R) -> Result<T>,
{
    reader.seek(SeekFrom::Start(u64::from(lump.offset)))?;
    let count = lump.record_count(size);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(read(reader)?);
    }
    Ok(records)
}
