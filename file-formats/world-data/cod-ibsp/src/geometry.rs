//! Fixed-size records of the material, triangle soup, vertex and triangle
//! lumps

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use cod_data::types::{Color, Triangle, Uv, Vec3};
use std::io::{Read, Seek};

use crate::error::Result;
use crate::version::IbspVersion;

/// Bytes in the fixed name field of a material record
pub const MATERIAL_NAME_SIZE: usize = 64;
/// Name plus 64-bit flags
pub const MATERIAL_SIZE: usize = MATERIAL_NAME_SIZE + 8;
pub const TRIANGLE_SOUP_SIZE: usize = 16;
pub const TRIANGLE_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct BspMaterial {
    pub name: String,
    pub flags: u64,
}

impl BspMaterial {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; MATERIAL_NAME_SIZE];
        reader.read_exact(&mut raw)?;
        // Names are NUL-padded, so this matches trimming trailing NULs
        let end = memchr::memchr(0, &raw).unwrap_or(raw.len());
        Ok(Self {
            name: String::from_utf8_lossy(&raw[..end]).into_owned(),
            flags: reader.read_u64::<LittleEndian>()?,
        })
    }
}

/// A contiguous vertex/index range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct TriangleSoup {
    pub material_index: u16,
    pub draw_order: u16,
    /// First vertex of the range; triangle indices are relative to it
    pub vertices_offset: u32,
    pub vertices_length: u16,
    /// Number of indices, three per triangle
    pub triangles_length: u16,
    /// Index of the first index, three per triangle
    pub triangles_offset: u32,
}

impl TriangleSoup {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            material_index: reader.read_u16::<LittleEndian>()?,
            draw_order: reader.read_u16::<LittleEndian>()?,
            vertices_offset: reader.read_u32::<LittleEndian>()?,
            vertices_length: reader.read_u16::<LittleEndian>()?,
            triangles_length: reader.read_u16::<LittleEndian>()?,
            triangles_offset: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn first_triangle(&self) -> usize {
        self.triangles_offset as usize / 3
    }

    pub fn triangle_count(&self) -> usize {
        usize::from(self.triangles_length) / 3
    }
}

/// A level vertex in its canonical form
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
    pub uv: Uv,
}

/// Vertex records as laid out by each version
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawVertex {
    /// position, uv, 8 bytes of lightmap data, normal, color
    V59 {
        position: Vec3,
        uv: Uv,
        normal: Vec3,
        color: Color,
    },
    /// position, normal, color, uv, 32 bytes of lightmap and tangent data
    V4 {
        position: Vec3,
        normal: Vec3,
        color: Color,
        uv: Uv,
    },
}

impl RawVertex {
    pub fn read<R: Read + Seek>(reader: &mut R, version: IbspVersion) -> Result<Self> {
        Ok(match version {
            IbspVersion::V59 => {
                let position = reader.read_vec3()?;
                let uv = reader.read_uv()?;
                reader.skip_bytes(8)?;
                Self::V59 {
                    position,
                    uv,
                    normal: reader.read_vec3()?,
                    color: reader.read_color_rgba8()?,
                }
            }
            IbspVersion::V4 => {
                let vertex = Self::V4 {
                    position: reader.read_vec3()?,
                    normal: reader.read_vec3()?,
                    color: reader.read_color_rgba8()?,
                    uv: reader.read_uv()?,
                };
                reader.skip_bytes(32)?;
                vertex
            }
        })
    }

    /// Only version 59 stores V with the top-left origin.
    pub fn into_vertex(self) -> Vertex {
        match self {
            Self::V59 {
                position,
                uv,
                normal,
                color,
            } => Vertex {
                position,
                normal,
                color,
                uv: uv.flip_v(),
            },
            Self::V4 {
                position,
                normal,
                color,
                uv,
            } => Vertex {
                position,
                normal,
                color,
                uv,
            },
        }
    }
}

pub fn read_triangle<R: Read>(reader: &mut R) -> Result<Triangle> {
    Ok(Triangle::new(
        reader.read_u16::<LittleEndian>()?,
        reader.read_u16::<LittleEndian>()?,
        reader.read_u16::<LittleEndian>()?,
    ))
}
