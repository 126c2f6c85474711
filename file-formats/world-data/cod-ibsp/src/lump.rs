use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::error::{IbspError, Result};
use crate::version::{LumpKind, LumpTable};

/// Number of entries in the lump directory
pub const LUMP_COUNT: usize = 39;

/// One `{length, offset}` directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lump {
    pub length: u32,
    pub offset: u32,
}

impl Lump {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            length: reader.read_u32::<LittleEndian>()?,
            offset: reader.read_u32::<LittleEndian>()?,
        })
    }

    /// Number of whole records of `size` bytes the lump holds.
    pub fn record_count(&self, size: usize) -> usize {
        self.length as usize / size
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpDirectory {
    pub lumps: [Lump; LUMP_COUNT],
}

impl LumpDirectory {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut lumps = [Lump::default(); LUMP_COUNT];
        for lump in &mut lumps {
            *lump = Lump::read(reader)?;
        }
        Ok(Self { lumps })
    }

    /// Looks up a lump and checks it lies within the file.
    pub fn get(&self, table: &LumpTable, kind: LumpKind, file_size: u64) -> Result<Lump> {
        let lump = self.lumps[table.index(kind)];
        if u64::from(lump.offset) + u64::from(lump.length) > file_size {
            return Err(IbspError::LumpOutOfBounds {
                kind,
                offset: lump.offset,
                length: lump.length,
                file_size,
            });
        }
        Ok(lump)
    }
}
