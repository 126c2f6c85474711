//! DXT1/DXT3/DXT5 block decompression.
//!
//! Every format works on 4x4 pixel blocks laid out row-major. Each block
//! carries a 16-bit 5:6:5 color pair and sixteen 2-bit palette indices;
//! DXT3 and DXT5 prepend eight bytes of alpha data. Output is RGBA8,
//! row-major, top to bottom, exactly `width * height * 4` bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;

type Rgba = [u8; 4];

/// Block-compression variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxtFormat {
    /// Opaque color only, 8 bytes per block
    Dxt1,
    /// Explicit 4-bit alpha, 16 bytes per block
    Dxt3,
    /// Interpolated alpha, 16 bytes per block
    Dxt5,
}

impl DxtFormat {
    pub const fn block_size(self) -> usize {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt3 | Self::Dxt5 => 16,
        }
    }

    /// Compressed size of a `width` x `height` image.
    pub const fn compressed_size(self, width: usize, height: usize) -> usize {
        width.div_ceil(4) * height.div_ceil(4) * self.block_size()
    }
}

/// Expands `input` into an RGBA8 buffer.
///
/// Blocks on the right and bottom edges are clipped when the dimensions are
/// not multiples of four. An input shorter than the block grid requires is
/// rejected before anything is written.
pub fn decode(
    format: DxtFormat,
    input: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, DecodeError> {
    let required = format.compressed_size(width, height);
    if input.len() < required {
        return Err(DecodeError::TruncatedInput {
            width,
            height,
            required,
            actual: input.len(),
        });
    }

    let mut output = vec![0u8; width * height * 4];
    if required == 0 {
        return Ok(output);
    }

    let blocks_x = width.div_ceil(4);
    let last_columns = (width + 3) % 4 + 1;

    for (index, block) in input[..required]
        .chunks_exact(format.block_size())
        .enumerate()
    {
        let pixels = match format {
            DxtFormat::Dxt1 => decode_dxt1_block(block),
            DxtFormat::Dxt3 => decode_dxt3_block(block),
            DxtFormat::Dxt5 => decode_dxt5_block(block),
        };

        let (bx, by) = (index % blocks_x, index / blocks_x);
        let columns = if bx + 1 < blocks_x { 4 } else { last_columns };

        for (row, y) in (by * 4..height).take(4).enumerate() {
            let start = (y * width + bx * 4) * 4;
            let target = &mut output[start..start + columns * 4];
            for (dst, src) in target.chunks_exact_mut(4).zip(&pixels[row * 4..]) {
                dst.copy_from_slice(src);
            }
        }
    }

    Ok(output)
}

/// Widens a packed 5:6:5 color to 8 bits per channel by replicating the
/// high bits into the low bits.
fn unpack_565(color: u16) -> [u8; 3] {
    let r = ((color & 0xF800) >> 8) as u8;
    let g = ((color & 0x07E0) >> 3) as u8;
    let b = ((color & 0x001F) << 3) as u8;
    [r | (r >> 5), g | (g >> 6), b | (b >> 5)]
}

/// Four-entry palette from the two packed endpoints.
///
/// Entry 2 is the one-third blend when `c0 > c1` and the midpoint otherwise;
/// entry 3 is always the two-thirds blend. There is no punch-through alpha.
fn color_palette(c0: u16, c1: u16, alpha: u8) -> [Rgba; 4] {
    let e0 = unpack_565(c0);
    let e1 = unpack_565(c1);

    let blend = |f: fn(u16, u16) -> u16| -> Rgba {
        let mut out = [0, 0, 0, alpha];
        for channel in 0..3 {
            out[channel] = f(u16::from(e0[channel]), u16::from(e1[channel])) as u8;
        }
        out
    };

    let c2 = if c0 > c1 {
        blend(|a, b| (2 * a + b) / 3)
    } else {
        blend(|a, b| (a + b) / 2)
    };
    let c3 = blend(|a, b| (a + 2 * b) / 3);

    [
        [e0[0], e0[1], e0[2], alpha],
        [e1[0], e1[1], e1[2], alpha],
        c2,
        c3,
    ]
}

/// Decodes the 8-byte color part of a block with every pixel at `alpha`.
fn decode_color_block(block: &[u8], alpha: u8) -> [Rgba; 16] {
    let c0 = LittleEndian::read_u16(&block[0..2]);
    let c1 = LittleEndian::read_u16(&block[2..4]);
    let mut codes = LittleEndian::read_u32(&block[4..8]);
    let palette = color_palette(c0, c1, alpha);

    let mut pixels = [[0u8; 4]; 16];
    for pixel in &mut pixels {
        *pixel = palette[(codes & 0x03) as usize];
        codes >>= 2;
    }
    pixels
}

fn decode_dxt1_block(block: &[u8]) -> [Rgba; 16] {
    decode_color_block(block, 255)
}

fn decode_dxt3_block(block: &[u8]) -> [Rgba; 16] {
    let mut pixels = decode_color_block(&block[8..16], 0);
    for (word, chunk) in block[0..8].chunks_exact(2).enumerate() {
        let alpha = LittleEndian::read_u16(chunk);
        for nibble in 0..4 {
            let value = ((alpha >> (nibble * 4)) & 0x0F) as u8;
            pixels[word * 4 + nibble][3] |= value * 0x11;
        }
    }
    pixels
}

fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0w, a1w) = (u16::from(a0), u16::from(a1));
    let mut table = [a0, a1, 0, 0, 0, 0, 0, 255];
    if a0 > a1 {
        for (i, slot) in table[2..].iter_mut().enumerate() {
            let i = i as u16;
            *slot = (((6 - i) * a0w + (1 + i) * a1w) / 7) as u8;
        }
    } else {
        for (i, slot) in table[2..6].iter_mut().enumerate() {
            let i = i as u16;
            *slot = (((4 - i) * a0w + (1 + i) * a1w) / 5) as u8;
        }
    }
    table
}

fn decode_dxt5_block(block: &[u8]) -> [Rgba; 16] {
    let mut pixels = decode_color_block(&block[8..16], 0);
    let table = alpha_palette(block[0], block[1]);
    // 48-bit index stream follows the two endpoint bytes
    let mut codes = LittleEndian::read_u48(&block[2..8]);
    for pixel in &mut pixels {
        pixel[3] |= table[(codes & 0x07) as usize];
        codes >>= 3;
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const RED: u16 = 0xF800;
    const BLUE: u16 = 0x001F;
    const WHITE: u16 = 0xFFFF;

    fn color_block(c0: u16, c1: u16, codes: u32) -> Vec<u8> {
        let mut block = Vec::with_capacity(8);
        block.extend_from_slice(&c0.to_le_bytes());
        block.extend_from_slice(&c1.to_le_bytes());
        block.extend_from_slice(&codes.to_le_bytes());
        block
    }

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test_case(0x0000, [0, 0, 0])]
    #[test_case(0xFFFF, [255, 255, 255])]
    #[test_case(RED, [255, 0, 0])]
    #[test_case(0x07E0, [0, 255, 0])]
    #[test_case(BLUE, [0, 0, 255])]
    #[test_case(0x8410, [132, 130, 132])]
    fn test_unpack_565(packed: u16, expected: [u8; 3]) {
        assert_eq!(unpack_565(packed), expected);
    }

    #[test]
    fn test_dxt1_four_color_block() {
        // 0xE4 = indices 0,1,2,3 across each row
        let block = color_block(RED, BLUE, 0xE4E4_E4E4);
        let out = decode(DxtFormat::Dxt1, &block, 4, 4).unwrap();

        let expected_row = [
            [255, 0, 0, 255],
            [0, 0, 255, 255],
            [170, 0, 85, 255],
            [85, 0, 170, 255],
        ];
        for y in 0..4 {
            for (x, expected) in expected_row.iter().enumerate() {
                assert_eq!(pixel(&out, 4, x, y), *expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_dxt1_three_color_branch_stays_opaque() {
        let block = color_block(BLUE, RED, 0xE4E4_E4E4);
        let out = decode(DxtFormat::Dxt1, &block, 4, 4).unwrap();

        assert_eq!(pixel(&out, 4, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&out, 4, 1, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&out, 4, 2, 0), [127, 0, 127, 255]);
        assert_eq!(pixel(&out, 4, 3, 0), [170, 0, 85, 255]);
    }

    #[test]
    fn test_dxt3_explicit_alpha() {
        let mut block = Vec::new();
        for word in [0x3210u16, 0x7654, 0xBA98, 0xFEDC] {
            block.extend_from_slice(&word.to_le_bytes());
        }
        block.extend(color_block(WHITE, 0, 0));

        let out = decode(DxtFormat::Dxt3, &block, 4, 4).unwrap();
        for i in 0..16 {
            let (x, y) = (i % 4, i / 4);
            assert_eq!(pixel(&out, 4, x, y), [255, 255, 255, (i * 0x11) as u8]);
        }
    }

    // Indices 0..=7 twice per row pair: 0x88, 0xC6, 0xFA encodes 0,1,2,...,7
    const ALPHA_RAMP: [u8; 6] = [0x88, 0xC6, 0xFA, 0x88, 0xC6, 0xFA];

    #[test_case(255, 0, [255, 0, 218, 182, 145, 109, 72, 36] ; "eight step")]
    #[test_case(0, 255, [0, 255, 51, 102, 153, 204, 0, 255] ; "six step with fixed ends")]
    fn test_dxt5_alpha_interpolation(a0: u8, a1: u8, expected: [u8; 8]) {
        let mut block = vec![a0, a1];
        block.extend_from_slice(&ALPHA_RAMP);
        block.extend(color_block(WHITE, 0, 0));

        let out = decode(DxtFormat::Dxt5, &block, 4, 4).unwrap();
        for i in 0..16 {
            let (x, y) = (i % 4, i / 4);
            assert_eq!(
                pixel(&out, 4, x, y),
                [255, 255, 255, expected[i % 8]],
                "pixel {i}"
            );
        }
    }

    #[test]
    fn test_edge_blocks_are_clipped() {
        let mut input = color_block(RED, 0, 0);
        input.extend(color_block(BLUE, 0, 0));

        let out = decode(DxtFormat::Dxt1, &input, 5, 3).unwrap();
        assert_eq!(out.len(), 5 * 3 * 4);
        assert_eq!(pixel(&out, 5, 3, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&out, 5, 4, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&out, 5, 4, 2), [0, 0, 255, 255]);
    }

    #[test_case(1, 1)]
    #[test_case(3, 7)]
    #[test_case(6, 5)]
    #[test_case(9, 2)]
    fn test_output_length_for_odd_sizes(width: usize, height: usize) {
        for format in [DxtFormat::Dxt1, DxtFormat::Dxt3, DxtFormat::Dxt5] {
            let input = vec![0xA5; format.compressed_size(width, height)];
            let out = decode(format, &input, width, height).unwrap();
            assert_eq!(out.len(), width * height * 4);
        }
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        let err = decode(DxtFormat::Dxt5, &[0u8; 8], 4, 4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedInput {
                width: 4,
                height: 4,
                required: 16,
                actual: 8,
            }
        );

        assert!(decode(DxtFormat::Dxt1, &[0u8; 8], 8, 4).is_err());
    }

    #[test]
    fn test_zero_dimensions() {
        assert_eq!(decode(DxtFormat::Dxt1, &[], 0, 0).unwrap(), Vec::<u8>::new());
    }
}
