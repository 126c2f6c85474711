//! Version tags and per-version lump layouts

use std::fmt;

use crate::error::{IbspError, Result};

/// Supported IBSP versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum IbspVersion {
    /// Call of Duty and United Offensive
    V59,
    /// Call of Duty 2
    V4,
}

/// Lumps this crate decodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LumpKind {
    Materials,
    TriangleSoups,
    Vertices,
    Triangles,
    Entities,
}

impl fmt::Display for LumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Materials => "materials",
            Self::TriangleSoups => "triangle soups",
            Self::Vertices => "vertices",
            Self::Triangles => "triangles",
            Self::Entities => "entities",
        };
        f.write_str(name)
    }
}

/// Directory slot of each decoded lump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LumpTable {
    pub materials: usize,
    pub triangle_soups: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub entities: usize,
}

impl LumpTable {
    pub fn index(&self, kind: LumpKind) -> usize {
        match kind {
            LumpKind::Materials => self.materials,
            LumpKind::TriangleSoups => self.triangle_soups,
            LumpKind::Vertices => self.vertices,
            LumpKind::Triangles => self.triangles,
            LumpKind::Entities => self.entities,
        }
    }
}

const LUMPS_V59: LumpTable = LumpTable {
    materials: 0,
    triangle_soups: 6,
    vertices: 7,
    triangles: 8,
    entities: 29,
};

const LUMPS_V4: LumpTable = LumpTable {
    materials: 0,
    triangle_soups: 7,
    vertices: 8,
    triangles: 9,
    entities: 37,
};

impl IbspVersion {
    pub fn version_number(self) -> i32 {
        match self {
            Self::V59 => 0x3B,
            Self::V4 => 0x04,
        }
    }

    pub fn from_version_number(version: i32) -> Result<Self> {
        match version {
            0x3B => Ok(Self::V59),
            0x04 => Ok(Self::V4),
            other => Err(IbspError::UnsupportedVersion(other)),
        }
    }

    pub fn lump_table(self) -> &'static LumpTable {
        match self {
            Self::V59 => &LUMPS_V59,
            Self::V4 => &LUMPS_V4,
        }
    }

    /// On-disk size of one vertex record.
    pub fn vertex_size(self) -> usize {
        match self {
            Self::V59 => 44,
            Self::V4 => 68,
        }
    }
}

impl fmt::Display for IbspVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V59 => write!(f, "59 (CoD1/UO)"),
            Self::V4 => write!(f, "4 (CoD2)"),
        }
    }
}
