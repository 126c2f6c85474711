use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Result, Seek, SeekFrom};

use crate::types::{Color, Uv, Vec3};

/// Extension trait for the primitive reads shared by every asset format.
///
/// All multi-byte values are little-endian.
pub trait CodReadExt: Read + Seek {
    /// Reads bytes up to and including a NUL terminator, returning the
    /// string without it. Invalid UTF-8 is replaced rather than rejected.
    fn read_cstring(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            match self.read_u8()? {
                0 => break,
                b => bytes.push(b),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads a NUL-terminated string at an absolute offset and restores the
    /// stream position afterwards.
    fn read_cstring_at(&mut self, offset: u64) -> Result<String> {
        let pos = self.stream_position()?;
        self.seek(SeekFrom::Start(offset))?;
        let value = self.read_cstring();
        self.seek(SeekFrom::Start(pos))?;
        value
    }

    /// Skips a fixed padding span.
    fn skip_bytes(&mut self, count: u64) -> Result<()> {
        self.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    /// Total length of the underlying stream.
    fn total_len(&mut self) -> Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        if pos != len {
            self.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }

    fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3 {
            x: self.read_f32::<LittleEndian>()?,
            y: self.read_f32::<LittleEndian>()?,
            z: self.read_f32::<LittleEndian>()?,
        })
    }

    fn read_uv(&mut self) -> Result<Uv> {
        Ok(Uv {
            u: self.read_f32::<LittleEndian>()?,
            v: self.read_f32::<LittleEndian>()?,
        })
    }

    /// Reads four 8-bit channels and normalizes them to `0.0..=1.0`.
    fn read_color_rgba8(&mut self) -> Result<Color> {
        let mut rgba = [0u8; 4];
        self.read_exact(&mut rgba)?;
        Ok(Color::from_rgba8(rgba))
    }
}

impl<R: Read + Seek + ?Sized> CodReadExt for R {}
