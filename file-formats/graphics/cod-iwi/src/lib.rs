//! Parser for Call of Duty IWi texture files.
//!
//! An IWi file is a 4-byte header, an 8-byte info block, four mipmap
//! offset markers and the packed mipmap levels. Loading picks the largest
//! level and expands it to RGBA8 with the [`dxt`] decoder.
//!
//! ```no_run
//! use cod_iwi::Iwi;
//!
//! let texture = Iwi::load("images/wc_l_brick.iwi")?;
//! println!("{}x{} {:?}", texture.width(), texture.height(), texture.info.texture_format());
//! # Ok::<(), cod_iwi::IwiError>(())
//! ```

pub mod dxt;
pub mod error;
pub mod header;
pub mod mipmap;

pub use dxt::{DxtFormat, decode};
pub use error::{DecodeError, IwiError, Result};
pub use header::{IWI_MAGIC, IwiHeader, IwiInfo, IwiVersion, TextureFormat};
pub use mipmap::Mipmap;

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use image::RgbaImage;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use mipmap::MIPMAP_MARKERS;

/// Everything in front of the pixel data, plus the chosen mipmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IwiLayout {
    pub header: IwiHeader,
    pub info: IwiInfo,
    pub markers: [i32; MIPMAP_MARKERS],
    /// Position right after the offset markers
    pub data_start: u64,
    pub file_size: u64,
    pub mipmap: Mipmap,
}

impl IwiLayout {
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let header = IwiHeader::read(reader)?;
        let info = IwiInfo::read(reader)?;

        let mut markers = [0i32; MIPMAP_MARKERS];
        reader.read_i32_into::<LittleEndian>(&mut markers)?;

        let data_start = reader.stream_position()?;
        let file_size = reader.total_len()?;
        let mipmap = mipmap::select_largest(&markers, data_start, file_size)?;
        debug!(
            "IWi v{} {}x{} format {:#04x}, mipmap at {} ({} bytes)",
            header.version.version_number(),
            info.width,
            info.height,
            info.format,
            mipmap.offset,
            mipmap.size
        );

        Ok(Self {
            header,
            info,
            markers,
            data_start,
            file_size,
            mipmap,
        })
    }
}

/// A decoded IWi texture
#[derive(Debug, Clone)]
pub struct Iwi {
    pub header: IwiHeader,
    pub info: IwiInfo,
    pub mipmap: Mipmap,
    /// Raw bytes of the selected mipmap
    pub compressed: Vec<u8>,
    /// RGBA8 pixels, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

impl Iwi {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader)
    }

    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let layout = IwiLayout::read(reader)?;
        let format = layout
            .info
            .texture_format()
            .and_then(TextureFormat::dxt)
            .ok_or(IwiError::UnsupportedFormat(layout.info.format))?;

        reader.seek(SeekFrom::Start(layout.mipmap.offset))?;
        let mut compressed = vec![0u8; layout.mipmap.size as usize];
        reader.read_exact(&mut compressed)?;

        let pixels = dxt::decode(
            format,
            &compressed,
            usize::from(layout.info.width),
            usize::from(layout.info.height),
        )?;

        Ok(Self {
            header: layout.header,
            info: layout.info,
            mipmap: layout.mipmap,
            compressed,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.info.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.info.height)
    }

    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width(), self.height(), self.pixels.clone())
    }
}
