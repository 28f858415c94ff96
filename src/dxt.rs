// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoding of DXT1 to DXT5 (S3TC) compressed blocks.
//!
//! Every 4x4 block of texels is stored as a color block, preceded by an alpha block for
//! DXT2 to DXT5. DXT2 and DXT4 carry premultiplied alpha, which is returned as stored.

use std::io::{Cursor, Read, Seek};

use binrw::{binread, BinReaderExt, Endian};
use tracing::{debug, trace};

use crate::color::ColorValue;
use crate::descriptor::{get_descriptor, get_memory_size};
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::pack::{pack_with, unpack_with};
use crate::pixel_box::PixelBox;
use crate::{ByteBuffer, ByteSpan};

/// Two R5G6B5 endpoints and a 2-bit index per texel.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlock {
    pub colour_0: u16,
    pub colour_1: u16,
    /// One byte per row, the leftmost texel in the lowest bits.
    pub index_rows: [u8; 4],
}

/// A 4-bit alpha value per texel.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplicitAlphaBlock {
    /// One value per row, the leftmost texel in the lowest bits.
    pub alpha_rows: [u16; 4],
}

/// Two alpha endpoints and a 3-bit index per texel.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolatedAlphaBlock {
    pub alpha_0: u8,
    pub alpha_1: u8,
    /// Sixteen 3-bit indices packed little end first.
    pub indices: [u8; 6],
}

fn is_dxt(format: PixelFormat) -> bool {
    matches!(
        format,
        PixelFormat::DXT1
            | PixelFormat::DXT2
            | PixelFormat::DXT3
            | PixelFormat::DXT4
            | PixelFormat::DXT5
    )
}

/// Decodes a color block into `pixels`.
///
/// DXT1 blocks write whole colors, since their fourth palette entry can be transparent. The
/// other formats only write red, green and blue, leaving the alpha decoded before.
pub fn unpack_color_block(
    block: &ColorBlock,
    format: PixelFormat,
    pixels: &mut [ColorValue; 16],
) -> Result<()> {
    let r5g6b5 = get_descriptor(PixelFormat::R5G6B5);
    let endpoint = |value: u16| unpack_with(r5g6b5, &value.to_ne_bytes());

    let mut palette = [ColorValue::ZERO; 4];
    palette[0] = endpoint(block.colour_0)?;
    palette[1] = endpoint(block.colour_1)?;

    let is_dxt1 = format == PixelFormat::DXT1;
    if is_dxt1 && block.colour_0 <= block.colour_1 {
        palette[2] = (palette[0] + palette[1]) / 2.0;
        palette[3] = ColorValue::ZERO;
    } else {
        palette[2] = (palette[0] * 2.0 + palette[1]) / 3.0;
        palette[3] = (palette[0] + palette[1] * 2.0) / 3.0;
    }

    for (row, bits) in block.index_rows.iter().enumerate() {
        for x in 0..4 {
            let index = (bits >> (x * 2)) & 0x3;
            let color = palette[index as usize];
            let pixel = &mut pixels[row * 4 + x];
            if is_dxt1 {
                *pixel = color;
            } else {
                pixel.r = color.r;
                pixel.g = color.g;
                pixel.b = color.b;
            }
        }
    }
    Ok(())
}

/// Decodes an explicit alpha block into the alpha channel of `pixels`.
pub fn unpack_explicit_alpha_block(block: &ExplicitAlphaBlock, pixels: &mut [ColorValue; 16]) {
    for (row, bits) in block.alpha_rows.iter().enumerate() {
        for x in 0..4 {
            let value = (bits >> (x * 4)) & 0xF;
            pixels[row * 4 + x].a = f32::from(value) / 15.0;
        }
    }
}

/// Decodes an interpolated alpha block into the alpha channel of `pixels`.
pub fn unpack_interpolated_alpha_block(
    block: &InterpolatedAlphaBlock,
    pixels: &mut [ColorValue; 16],
) {
    let mut palette = [0.0f32; 8];
    palette[0] = f32::from(block.alpha_0) / 255.0;
    palette[1] = f32::from(block.alpha_1) / 255.0;

    if block.alpha_0 <= block.alpha_1 {
        // four interpolated values, plus fully transparent and fully opaque
        for i in 0..4 {
            let weight = i as f32;
            palette[i + 2] = ((4.0 - weight) * palette[0] + (weight + 1.0) * palette[1]) / 5.0;
        }
        palette[6] = 0.0;
        palette[7] = 1.0;
    } else {
        for i in 0..6 {
            let weight = i as f32;
            palette[i + 2] = ((6.0 - weight) * palette[0] + (weight + 1.0) * palette[1]) / 7.0;
        }
    }

    for (i, pixel) in pixels.iter_mut().enumerate() {
        let base_byte = (i * 3) / 8;
        let base_bit = (i * 3) % 8;
        let mut index = (u32::from(block.indices[base_byte]) >> base_bit) & 0x7;
        if base_bit > 5 {
            // the rest of the index is at the bottom of the next byte
            index |= (u32::from(block.indices[base_byte + 1]) << (8 - base_bit)) & 0x7;
        }
        pixel.a = palette[index as usize];
    }
}

/// Reads one compressed block from `reader` and decodes its 16 texels, in row order.
///
/// `endian` is the byte order the 16-bit fields were stored in. The reader is left right after
/// the block.
pub fn decode_dxt_block<R: Read + Seek>(
    reader: &mut R,
    format: PixelFormat,
    endian: Endian,
) -> Result<[ColorValue; 16]> {
    let mut pixels = [ColorValue::ZERO; 16];
    match format {
        PixelFormat::DXT1 => {}
        PixelFormat::DXT2 | PixelFormat::DXT3 => {
            let alpha: ExplicitAlphaBlock = reader.read_type(endian)?;
            unpack_explicit_alpha_block(&alpha, &mut pixels);
        }
        PixelFormat::DXT4 | PixelFormat::DXT5 => {
            let alpha: InterpolatedAlphaBlock = reader.read_type(endian)?;
            unpack_interpolated_alpha_block(&alpha, &mut pixels);
        }
        _ => {
            return Err(Error::UnsupportedFormat {
                format,
                operation: "decompress",
            })
        }
    }

    let color: ColorBlock = reader.read_type(endian)?;
    unpack_color_block(&color, format, &mut pixels)?;
    Ok(pixels)
}

/// Returns the format a surface decompresses to with [`decompress_surface`].
///
/// DXT1 surfaces only need alpha if some block uses the transparent palette entry, so every
/// block is checked and a single block is enough to switch the whole surface.
pub fn decompressed_format(
    data: ByteSpan,
    format: PixelFormat,
    endian: Endian,
) -> Result<PixelFormat> {
    match format {
        PixelFormat::DXT1 => {
            let mut cursor = Cursor::new(data);
            for _ in 0..data.len() / 8 {
                let block: ColorBlock = cursor.read_type(endian)?;
                if block.colour_0 <= block.colour_1 {
                    trace!("DXT1 surface has a block with transparency");
                    return Ok(PixelFormat::BYTE_RGBA);
                }
            }
            Ok(PixelFormat::BYTE_RGB)
        }
        PixelFormat::DXT2 | PixelFormat::DXT3 | PixelFormat::DXT4 | PixelFormat::DXT5 => {
            Ok(PixelFormat::BYTE_RGBA)
        }
        _ => Err(Error::UnsupportedFormat {
            format,
            operation: "decompress",
        }),
    }
}

/// A decompressed surface, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSurface {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub format: PixelFormat,
    pub data: ByteBuffer,
}

impl DecodedSurface {
    /// The box describing [`DecodedSurface::data`].
    pub fn pixel_box(&self) -> PixelBox {
        PixelBox::new(self.width, self.height, self.depth, self.format)
    }
}

/// Decompresses a whole surface into the format picked by [`decompressed_format`].
pub fn decompress_surface(
    data: ByteSpan,
    width: usize,
    height: usize,
    depth: usize,
    format: PixelFormat,
    endian: Endian,
) -> Result<DecodedSurface> {
    let size = get_memory_size(width, height, depth, format).min(data.len());
    let target = decompressed_format(&data[..size], format, endian)?;
    decompress_surface_to(data, width, height, depth, format, endian, target)
}

/// Decompresses a whole surface into `target`, which can be any format that can be packed.
///
/// Blocks on the right and bottom edge are clipped to the surface.
pub fn decompress_surface_to(
    data: ByteSpan,
    width: usize,
    height: usize,
    depth: usize,
    format: PixelFormat,
    endian: Endian,
    target: PixelFormat,
) -> Result<DecodedSurface> {
    if !is_dxt(format) {
        return Err(Error::UnsupportedFormat {
            format,
            operation: "decompress",
        });
    }
    if !target.is_accessible() {
        return Err(Error::UnsupportedFormat {
            format: target,
            operation: "pack",
        });
    }

    let needed = get_memory_size(width, height, depth, format);
    if data.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: data.len(),
        });
    }

    debug!(width, height, depth, %format, %target, "Decompressing surface");

    let target_desc = get_descriptor(target);
    let elem = target_desc.elem_size();
    let mut out = vec![0u8; width * height * depth * elem];
    let mut cursor = Cursor::new(&data[..needed]);

    for z in 0..depth {
        for block_y in (0..height).step_by(4) {
            for block_x in (0..width).step_by(4) {
                let texels = decode_dxt_block(&mut cursor, format, endian)?;
                for y in block_y..(block_y + 4).min(height) {
                    for x in block_x..(block_x + 4).min(width) {
                        let texel = texels[(y - block_y) * 4 + (x - block_x)];
                        let at = (x + y * width + z * width * height) * elem;
                        pack_with(target_desc, texel, &mut out[at..at + elem])?;
                    }
                }
            }
        }
    }

    Ok(DecodedSurface {
        width,
        height,
        depth,
        format: target,
        data: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::unpack_color;
    use crate::unpack_color_bytes;

    const RED: u16 = 0xF800;
    const BLUE: u16 = 0x001F;

    #[test]
    fn test_color_block_endpoints() {
        let block = ColorBlock {
            colour_0: RED,
            colour_1: BLUE,
            // texel 0 uses the first endpoint, texel 1 the second
            index_rows: [0b0100, 0, 0, 0],
        };
        let mut pixels = [ColorValue::ZERO; 16];
        unpack_color_block(&block, PixelFormat::DXT1, &mut pixels).unwrap();
        assert_eq!(pixels[0], ColorValue::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(pixels[1], ColorValue::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(pixels[2], pixels[0]);
    }

    fn color_block(colour_0: u16, colour_1: u16, rows: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&colour_0.to_le_bytes());
        bytes.extend_from_slice(&colour_1.to_le_bytes());
        bytes.extend_from_slice(&rows);
        bytes
    }

    fn assert_close(a: ColorValue, b: ColorValue) {
        for (x, y) in a.to_array().into_iter().zip(b.to_array()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    fn decode(bytes: &[u8], format: PixelFormat) -> [ColorValue; 16] {
        decode_dxt_block(&mut Cursor::new(bytes), format, Endian::Little).unwrap()
    }

    #[test]
    fn test_dxt1_opaque() {
        // indices 0, 1, 2, 3 from left to right on every row
        let pixels = decode(&color_block(RED, BLUE, [0xE4; 4]), PixelFormat::DXT1);
        for row in 0..4 {
            assert_close(pixels[row * 4], ColorValue::new(1.0, 0.0, 0.0, 1.0));
            assert_close(pixels[row * 4 + 1], ColorValue::new(0.0, 0.0, 1.0, 1.0));
            assert_close(pixels[row * 4 + 2], ColorValue::new(2.0 / 3.0, 0.0, 1.0 / 3.0, 1.0));
            assert_close(pixels[row * 4 + 3], ColorValue::new(1.0 / 3.0, 0.0, 2.0 / 3.0, 1.0));
        }
    }

    #[test]
    fn test_dxt1_transparent() {
        let pixels = decode(&color_block(BLUE, RED, [0xE4; 4]), PixelFormat::DXT1);
        assert_close(pixels[0], ColorValue::new(0.0, 0.0, 1.0, 1.0));
        assert_close(pixels[1], ColorValue::new(1.0, 0.0, 0.0, 1.0));
        assert_close(pixels[2], ColorValue::new(0.5, 0.0, 0.5, 1.0));
        assert_eq!(pixels[3], ColorValue::ZERO);
    }

    #[test]
    fn test_explicit_alpha() {
        let mut bytes = Vec::new();
        for row in [0x3210u16, 0x7654, 0xBA98, 0xFEDC] {
            bytes.extend_from_slice(&row.to_le_bytes());
        }
        // the four color modes must not matter for alpha, even when colour_0 <= colour_1
        bytes.extend(color_block(BLUE, RED, [0; 4]));

        let pixels = decode(&bytes, PixelFormat::DXT3);
        for (i, pixel) in pixels.iter().enumerate() {
            assert!((pixel.a - i as f32 / 15.0).abs() < 1e-6);
            assert_close(
                ColorValue::new(pixel.r, pixel.g, pixel.b, 0.0),
                ColorValue::new(0.0, 0.0, 1.0, 0.0),
            );
        }
    }

    #[test]
    fn test_interpolated_alpha_eight_values() {
        let mut bytes = vec![255, 0, 0xC2, 0x01, 0, 0, 0, 0];
        bytes.extend(color_block(RED, BLUE, [0; 4]));

        let pixels = decode(&bytes, PixelFormat::DXT5);
        assert!((pixels[0].a - 6.0 / 7.0).abs() < 1e-6);
        assert_eq!(pixels[1].a, 1.0);
        // this index straddles the first two bytes
        assert!((pixels[2].a - 1.0 / 7.0).abs() < 1e-6);
        assert_eq!(pixels[3].a, 1.0);
    }

    #[test]
    fn test_interpolated_alpha_six_values() {
        // indices 2, 6 and 7 for the first three texels
        let mut bytes = vec![0, 255, 0b1111_0010, 0b0000_0001, 0, 0, 0, 0];
        bytes.extend(color_block(RED, BLUE, [0; 4]));

        let pixels = decode(&bytes, PixelFormat::DXT5);
        assert!((pixels[0].a - 0.2).abs() < 1e-6);
        assert_eq!(pixels[1].a, 0.0);
        assert_eq!(pixels[2].a, 1.0);
        assert_eq!(pixels[3].a, 0.0);
    }

    #[test]
    fn test_reader_position() {
        let mut bytes = vec![0u8; 16];
        bytes.extend(color_block(RED, BLUE, [0; 4]));
        let mut cursor = Cursor::new(&bytes);
        decode_dxt_block(&mut cursor, PixelFormat::DXT5, Endian::Little).unwrap();
        assert_eq!(cursor.position(), 16);
        decode_dxt_block(&mut cursor, PixelFormat::DXT1, Endian::Little).unwrap();
        assert_eq!(cursor.position(), 24);
    }

    #[test]
    fn test_big_endian_blocks() {
        let mut little = 0x3210u16.to_le_bytes().repeat(4);
        little.extend(color_block(RED, BLUE, [0xE4; 4]));

        let mut big = 0x3210u16.to_be_bytes().repeat(4);
        big.extend_from_slice(&RED.to_be_bytes());
        big.extend_from_slice(&BLUE.to_be_bytes());
        big.extend_from_slice(&[0xE4; 4]);

        let expected = decode(&little, PixelFormat::DXT3);
        let actual =
            decode_dxt_block(&mut Cursor::new(&big), PixelFormat::DXT3, Endian::Big).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_truncated_block() {
        let result =
            decode_dxt_block(&mut Cursor::new(&[0u8; 7]), PixelFormat::DXT1, Endian::Little);
        assert!(matches!(result, Err(Error::BlockRead(_))));

        let result = decode_dxt_block(&mut Cursor::new(&[0u8; 8]), PixelFormat::L8, Endian::Little);
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_decompressed_format() {
        let mut data = color_block(RED, BLUE, [0; 4]);
        assert_eq!(
            decompressed_format(&data, PixelFormat::DXT1, Endian::Little).unwrap(),
            PixelFormat::BYTE_RGB
        );

        // a transparent second block switches the whole surface
        data.extend(color_block(BLUE, RED, [0; 4]));
        assert_eq!(
            decompressed_format(&data, PixelFormat::DXT1, Endian::Little).unwrap(),
            PixelFormat::BYTE_RGBA
        );

        assert_eq!(
            decompressed_format(&[], PixelFormat::DXT3, Endian::Little).unwrap(),
            PixelFormat::BYTE_RGBA
        );
        assert!(decompressed_format(&data, PixelFormat::R5G6B5, Endian::Little).is_err());
    }

    #[test]
    fn test_surface_clipping() {
        // a 5x5 surface is made of 2x2 blocks: red, blue, blue, red
        let mut data = color_block(RED, BLUE, [0; 4]);
        data.extend(color_block(RED, BLUE, [0x55; 4]));
        data.extend(color_block(RED, BLUE, [0x55; 4]));
        data.extend(color_block(RED, BLUE, [0; 4]));

        let surface =
            decompress_surface(&data, 5, 5, 1, PixelFormat::DXT1, Endian::Little).unwrap();
        assert_eq!(surface.format, PixelFormat::BYTE_RGB);
        assert_eq!(surface.data.len(), 5 * 5 * 3);

        let pixel = |x: usize, y: usize| {
            let at = (x + y * 5) * 3;
            unpack_color_bytes(surface.format, &surface.data[at..at + 3]).unwrap()
        };
        assert_eq!(pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(4, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(0, 4), [0, 0, 255, 255]);
        assert_eq!(pixel(4, 4), [255, 0, 0, 255]);
    }

    #[test]
    fn test_surface_errors() {
        let data = vec![0u8; 24];
        assert!(matches!(
            decompress_surface(&data, 5, 5, 1, PixelFormat::DXT1, Endian::Little),
            Err(Error::BufferTooSmall { needed: 32, actual: 24 })
        ));
        let into_dxt5 = decompress_surface_to(
            &data,
            4,
            4,
            1,
            PixelFormat::DXT1,
            Endian::Little,
            PixelFormat::DXT5,
        );
        assert!(matches!(
            into_dxt5,
            Err(Error::UnsupportedFormat { operation: "pack", .. })
        ));
        assert!(matches!(
            decompress_surface(&data, 4, 4, 1, PixelFormat::A8R8G8B8, Endian::Little),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_decompress_to_float() {
        let data = color_block(RED, BLUE, [0; 4]);
        let surface = decompress_surface_to(
            &data,
            4,
            4,
            1,
            PixelFormat::DXT1,
            Endian::Little,
            PixelFormat::Float32Rgba,
        )
        .unwrap();
        assert_eq!(surface.data.len(), 16 * 16);
        assert_eq!(
            unpack_color(PixelFormat::Float32Rgba, &surface.data[..16]).unwrap(),
            ColorValue::new(1.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(surface.pixel_box().size(), (4, 4, 1));
    }
}
