// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Format independent conversion between [`ColorValue`] and pixel memory. Slow, but it handles
//! every accessible format and is what the fast paths are checked against.

use crate::bitwise::{
    fixed_to_fixed, fixed_to_float, float_to_fixed, float_to_half, half_to_float, int_read,
    int_write,
};
use crate::color::ColorValue;
use crate::descriptor::{get_descriptor, FormatDescriptor};
use crate::error::{Error, Result};
use crate::format::PixelFormat;

fn check_len(desc: &FormatDescriptor, len: usize) -> Result<()> {
    let needed = desc.elem_size();
    if len < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(())
}

fn read_f32(src: &[u8], index: usize) -> f32 {
    let at = index * 4;
    f32::from_ne_bytes([src[at], src[at + 1], src[at + 2], src[at + 3]])
}

fn write_f32(dest: &mut [u8], index: usize, value: f32) {
    let at = index * 4;
    dest[at..at + 4].copy_from_slice(&value.to_ne_bytes());
}

fn read_u16(src: &[u8], index: usize) -> u16 {
    let at = index * 2;
    u16::from_ne_bytes([src[at], src[at + 1]])
}

fn write_u16(dest: &mut [u8], index: usize, value: u16) {
    let at = index * 2;
    dest[at..at + 2].copy_from_slice(&value.to_ne_bytes());
}

/// Writes `color` to the start of `dest` in the given format.
pub fn pack_color(color: ColorValue, format: PixelFormat, dest: &mut [u8]) -> Result<()> {
    pack_with(get_descriptor(format), color, dest)
}

/// Reads a color from the start of `src` in the given format.
pub fn unpack_color(format: PixelFormat, src: &[u8]) -> Result<ColorValue> {
    unpack_with(get_descriptor(format), src)
}

/// Writes an 8-bit per channel `[r, g, b, a]` color to the start of `dest`.
pub fn pack_color_bytes(rgba: [u8; 4], format: PixelFormat, dest: &mut [u8]) -> Result<()> {
    let desc = get_descriptor(format);
    if desc.is_native_endian() {
        check_len(desc, dest.len())?;

        let mut value = 0;
        for channel in 0..4 {
            let bits = u32::from(desc.bits[channel]);
            value |= (fixed_to_fixed(u32::from(rgba[channel]), 8, bits)
                << desc.shifts[channel])
                & desc.masks[channel];
        }
        int_write(dest, desc.elem_size(), value);
        Ok(())
    } else {
        let [r, g, b, a] = rgba.map(|c| f32::from(c) / 255.0);
        pack_with(desc, ColorValue::new(r, g, b, a), dest)
    }
}

/// Reads an 8-bit per channel `[r, g, b, a]` color from the start of `src`.
pub fn unpack_color_bytes(format: PixelFormat, src: &[u8]) -> Result<[u8; 4]> {
    let desc = get_descriptor(format);
    if desc.is_native_endian() {
        check_len(desc, src.len())?;

        let value = int_read(src, desc.elem_size());
        let channel = |i: usize| {
            let bits = u32::from(desc.bits[i]);
            fixed_to_fixed((value & desc.masks[i]) >> desc.shifts[i], bits, 8) as u8
        };

        let (r, g, b) = if desc.is_luminance() {
            let l = channel(0);
            (l, l, l)
        } else {
            (channel(0), channel(1), channel(2))
        };
        let a = if desc.has_alpha() { channel(3) } else { 255 };
        Ok([r, g, b, a])
    } else {
        let color = unpack_with(desc, src)?;
        Ok(color.to_array().map(|c| float_to_fixed(c, 8) as u8))
    }
}

pub(crate) fn pack_with(desc: &FormatDescriptor, color: ColorValue, dest: &mut [u8]) -> Result<()> {
    if desc.is_compressed() || desc.elem_bytes == 0 {
        return Err(Error::UnsupportedFormat {
            format: desc.format,
            operation: "pack",
        });
    }
    check_len(desc, dest.len())?;

    if desc.is_native_endian() {
        let channels = color.to_array();
        let mut value = 0;
        for channel in 0..4 {
            let bits = u32::from(desc.bits[channel]);
            value |= (float_to_fixed(channels[channel], bits) << desc.shifts[channel])
                & desc.masks[channel];
        }
        int_write(dest, desc.elem_size(), value);
        return Ok(());
    }

    let ColorValue { r, g, b, a } = color;
    match desc.format {
        PixelFormat::Float32R => write_f32(dest, 0, r),
        PixelFormat::Float32Gr => {
            write_f32(dest, 0, g);
            write_f32(dest, 1, r);
        }
        PixelFormat::Float32Rgb => {
            for (i, c) in [r, g, b].into_iter().enumerate() {
                write_f32(dest, i, c);
            }
        }
        PixelFormat::Float32Rgba => {
            for (i, c) in [r, g, b, a].into_iter().enumerate() {
                write_f32(dest, i, c);
            }
        }
        PixelFormat::Float16R => write_u16(dest, 0, float_to_half(r)),
        PixelFormat::Float16Gr => {
            write_u16(dest, 0, float_to_half(g));
            write_u16(dest, 1, float_to_half(r));
        }
        PixelFormat::Float16Rgb => {
            for (i, c) in [r, g, b].into_iter().enumerate() {
                write_u16(dest, i, float_to_half(c));
            }
        }
        PixelFormat::Float16Rgba => {
            for (i, c) in [r, g, b, a].into_iter().enumerate() {
                write_u16(dest, i, float_to_half(c));
            }
        }
        PixelFormat::ShortRgb => {
            for (i, c) in [r, g, b].into_iter().enumerate() {
                write_u16(dest, i, float_to_fixed(c, 16) as u16);
            }
        }
        PixelFormat::ShortRgba => {
            for (i, c) in [r, g, b, a].into_iter().enumerate() {
                write_u16(dest, i, float_to_fixed(c, 16) as u16);
            }
        }
        PixelFormat::ByteLa => {
            dest[0] = float_to_fixed(r, 8) as u8;
            dest[1] = float_to_fixed(a, 8) as u8;
        }
        format => {
            return Err(Error::UnsupportedFormat {
                format,
                operation: "pack",
            });
        }
    }
    Ok(())
}

pub(crate) fn unpack_with(desc: &FormatDescriptor, src: &[u8]) -> Result<ColorValue> {
    if desc.is_compressed() || desc.elem_bytes == 0 {
        return Err(Error::UnsupportedFormat {
            format: desc.format,
            operation: "unpack",
        });
    }
    check_len(desc, src.len())?;

    if desc.is_native_endian() {
        let value = int_read(src, desc.elem_size());
        let channel = |i: usize| {
            fixed_to_float((value & desc.masks[i]) >> desc.shifts[i], u32::from(desc.bits[i]))
        };

        let (r, g, b) = if desc.is_luminance() {
            let l = channel(0);
            (l, l, l)
        } else {
            (channel(0), channel(1), channel(2))
        };
        let a = if desc.has_alpha() { channel(3) } else { 1.0 };
        return Ok(ColorValue::new(r, g, b, a));
    }

    let short = |i: usize| fixed_to_float(u32::from(read_u16(src, i)), 16);
    let half = |i: usize| half_to_float(read_u16(src, i));

    let color = match desc.format {
        PixelFormat::Float32R => {
            let r = read_f32(src, 0);
            ColorValue::new(r, r, r, 1.0)
        }
        PixelFormat::Float32Gr => {
            let r = read_f32(src, 1);
            ColorValue::new(r, read_f32(src, 0), r, 1.0)
        }
        PixelFormat::Float32Rgb => {
            ColorValue::new(read_f32(src, 0), read_f32(src, 1), read_f32(src, 2), 1.0)
        }
        PixelFormat::Float32Rgba => ColorValue::new(
            read_f32(src, 0),
            read_f32(src, 1),
            read_f32(src, 2),
            read_f32(src, 3),
        ),
        PixelFormat::Float16R => {
            let r = half(0);
            ColorValue::new(r, r, r, 1.0)
        }
        PixelFormat::Float16Gr => {
            let r = half(1);
            ColorValue::new(r, half(0), r, 1.0)
        }
        PixelFormat::Float16Rgb => ColorValue::new(half(0), half(1), half(2), 1.0),
        PixelFormat::Float16Rgba => ColorValue::new(half(0), half(1), half(2), half(3)),
        PixelFormat::ShortRgb => ColorValue::new(short(0), short(1), short(2), 1.0),
        PixelFormat::ShortRgba => ColorValue::new(short(0), short(1), short(2), short(3)),
        PixelFormat::ByteLa => {
            let l = fixed_to_float(u32::from(src[0]), 8);
            ColorValue::new(l, l, l, fixed_to_float(u32::from(src[1]), 8))
        }
        format => {
            return Err(Error::UnsupportedFormat {
                format,
                operation: "unpack",
            });
        }
    };
    Ok(color)
}
