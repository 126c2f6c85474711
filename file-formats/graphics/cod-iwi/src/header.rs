use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Read;

use crate::dxt::DxtFormat;
use crate::error::{IwiError, Result};

/// Magic signature at the start of every IWi file
pub const IWI_MAGIC: [u8; 3] = *b"IWi";

/// IWi container versions with a known layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IwiVersion {
    /// Call of Duty 2
    V5,
    /// Call of Duty 4 and World at War, which share one version byte
    V6,
}

impl IwiVersion {
    pub fn version_number(self) -> u8 {
        match self {
            Self::V5 => 0x05,
            Self::V6 => 0x06,
        }
    }

    pub fn from_version_number(version: u8) -> Result<Self> {
        match version {
            0x05 => Ok(Self::V5),
            0x06 => Ok(Self::V6),
            other => Err(IwiError::UnsupportedVersion(other)),
        }
    }
}

impl fmt::Display for IwiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V5 => write!(f, "5 (CoD2)"),
            Self::V6 => write!(f, "6 (CoD4/CoD5)"),
        }
    }
}

/// Pixel format codes found in the info block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Argb32,
    Rgb24,
    Ga16,
    A8,
    Dxt1,
    Dxt3,
    Dxt5,
}

impl TextureFormat {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Argb32),
            0x02 => Some(Self::Rgb24),
            0x03 => Some(Self::Ga16),
            0x04 => Some(Self::A8),
            0x0B => Some(Self::Dxt1),
            0x0C => Some(Self::Dxt3),
            0x0D => Some(Self::Dxt5),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Argb32 => 0x01,
            Self::Rgb24 => 0x02,
            Self::Ga16 => 0x03,
            Self::A8 => 0x04,
            Self::Dxt1 => 0x0B,
            Self::Dxt3 => 0x0C,
            Self::Dxt5 => 0x0D,
        }
    }

    /// Block-compression variant, if this format has a decode path.
    pub fn dxt(self) -> Option<DxtFormat> {
        match self {
            Self::Dxt1 => Some(DxtFormat::Dxt1),
            Self::Dxt3 => Some(DxtFormat::Dxt3),
            Self::Dxt5 => Some(DxtFormat::Dxt5),
            Self::Argb32 | Self::Rgb24 | Self::Ga16 | Self::A8 => None,
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Argb32 => "ARGB32",
            Self::Rgb24 => "RGB24",
            Self::Ga16 => "GA16",
            Self::A8 => "A8",
            Self::Dxt1 => "DXT1",
            Self::Dxt3 => "DXT3",
            Self::Dxt5 => "DXT5",
        };
        f.write_str(name)
    }
}

/// The 4-byte file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IwiHeader {
    pub magic: [u8; 3],
    pub version: IwiVersion,
}

impl IwiHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 3];
        reader.read_exact(&mut magic)?;
        if magic != IWI_MAGIC {
            return Err(IwiError::InvalidMagic {
                expected: String::from_utf8_lossy(&IWI_MAGIC).into_owned(),
                found: String::from_utf8_lossy(&magic).into_owned(),
            });
        }

        let version = IwiVersion::from_version_number(reader.read_u8()?)?;
        Ok(Self { magic, version })
    }
}

/// Texture description following the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IwiInfo {
    /// Raw format code, see [`TextureFormat`]
    pub format: u8,
    pub usage: u8,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
}

impl IwiInfo {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            format: reader.read_u8()?,
            usage: reader.read_u8()?,
            width: reader.read_u16::<LittleEndian>()?,
            height: reader.read_u16::<LittleEndian>()?,
            depth: reader.read_u16::<LittleEndian>()?,
        })
    }

    pub fn texture_format(&self) -> Option<TextureFormat> {
        TextureFormat::from_code(self.format)
    }
}
