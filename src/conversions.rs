// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Direct conversions between common format pairs, skipping the float round trip.
//!
//! Every converter maps one source element, read as a native-endian integer, to one
//! destination element. They must produce exactly what unpacking and repacking would.

use crate::format::PixelFormat;
use crate::macros::define_pixel_conversions;

/// A fast path between two formats.
#[derive(Debug, Clone, Copy)]
pub struct PixelConversion {
    pub src: PixelFormat,
    pub dst: PixelFormat,
    pub convert: fn(u32) -> u32,
}

const OPAQUE: u32 = 0xFF00_0000;

/// Swaps the first and last byte of a 24-bit value.
#[inline]
fn swap24(v: u32) -> u32 {
    ((v & 0xFF) << 16) | (v & 0xFF00) | ((v >> 16) & 0xFF)
}

/// Swaps the red and blue bytes of a 32-bit value with alpha on top.
#[inline]
fn swap_red_blue(v: u32) -> u32 {
    (v & 0xFF00_FF00) | ((v & 0xFF) << 16) | ((v >> 16) & 0xFF)
}

/// Swaps the top byte and the second lowest byte.
#[inline]
fn swap_outer_red_blue(v: u32) -> u32 {
    (v & 0x00FF_00FF) | ((v & 0xFF00_0000) >> 16) | ((v & 0x0000_FF00) << 16)
}

#[inline]
fn luminance_to_argb(l: u32) -> u32 {
    OPAQUE | l | (l << 8) | (l << 16)
}

define_pixel_conversions! {
    A8R8G8B8 => A8B8G8R8: |v| swap_red_blue(v);
    A8R8G8B8 => B8G8R8A8: |v| v.swap_bytes();
    A8R8G8B8 => R8G8B8A8: |v| v.rotate_left(8);
    A8B8G8R8 => A8R8G8B8: |v| swap_red_blue(v);
    A8B8G8R8 => B8G8R8A8: |v| v.rotate_left(8);
    A8B8G8R8 => R8G8B8A8: |v| v.swap_bytes();
    B8G8R8A8 => A8R8G8B8: |v| v.swap_bytes();
    B8G8R8A8 => A8B8G8R8: |v| v.rotate_right(8);
    B8G8R8A8 => R8G8B8A8: |v| swap_outer_red_blue(v);
    R8G8B8A8 => A8R8G8B8: |v| v.rotate_right(8);
    R8G8B8A8 => A8B8G8R8: |v| v.swap_bytes();
    R8G8B8A8 => B8G8R8A8: |v| swap_outer_red_blue(v);

    A8R8G8B8 => L8: |v| (v >> 16) & 0xFF;
    A8B8G8R8 => L8: |v| v & 0xFF;
    B8G8R8A8 => L8: |v| (v >> 8) & 0xFF;
    L8 => A8R8G8B8: |l| luminance_to_argb(l);
    L8 => A8B8G8R8: |l| luminance_to_argb(l);
    L8 => B8G8R8A8: |l| 0xFF | (l << 8) | (l << 16) | (l << 24);

    L8 => L16: |l| (l << 8) | l;
    L16 => L8: |l| l >> 8;

    R8G8B8 => B8G8R8: |v| swap24(v);
    B8G8R8 => R8G8B8: |v| swap24(v);

    R8G8B8 => A8R8G8B8: |v| OPAQUE | v;
    R8G8B8 => A8B8G8R8: |v| OPAQUE | swap24(v);
    R8G8B8 => B8G8R8A8: |v| v.swap_bytes() | 0xFF;
    B8G8R8 => A8R8G8B8: |v| OPAQUE | swap24(v);
    B8G8R8 => A8B8G8R8: |v| OPAQUE | v;
    B8G8R8 => B8G8R8A8: |v| (v << 8) | 0xFF;

    A8R8G8B8 => R8G8B8: |v| v & 0x00FF_FFFF;
    A8R8G8B8 => B8G8R8: |v| swap24(v & 0x00FF_FFFF);

    X8R8G8B8 => A8R8G8B8: |v| OPAQUE | v;
    X8R8G8B8 => A8B8G8R8: |v| a8r8g8b8_to_a8b8g8r8(OPAQUE | v);
    X8R8G8B8 => B8G8R8A8: |v| a8r8g8b8_to_b8g8r8a8(OPAQUE | v);
    X8R8G8B8 => R8G8B8A8: |v| a8r8g8b8_to_r8g8b8a8(OPAQUE | v);
    X8B8G8R8 => A8R8G8B8: |v| a8b8g8r8_to_a8r8g8b8(OPAQUE | v);
    X8B8G8R8 => A8B8G8R8: |v| OPAQUE | v;
    X8B8G8R8 => B8G8R8A8: |v| a8b8g8r8_to_b8g8r8a8(OPAQUE | v);
    X8B8G8R8 => R8G8B8A8: |v| a8b8g8r8_to_r8g8b8a8(OPAQUE | v);
}

/// Looks up fast paths by format pair.
///
/// The table is fixed at compile time, so this is only a handle to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConverterRegistry;

impl ConverterRegistry {
    pub const fn global() -> ConverterRegistry {
        ConverterRegistry
    }

    /// Returns the fast path from `src` to `dst`, if there is one.
    #[inline]
    pub fn find(&self, src: PixelFormat, dst: PixelFormat) -> Option<PixelConversion> {
        find_conversion(src, dst)
    }

    /// Every registered fast path.
    pub fn conversions(&self) -> &'static [PixelConversion] {
        PIXEL_CONVERSIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitwise::{int_read, int_write};
    use crate::{pack_color, unpack_color};

    fn samples(format: PixelFormat) -> Vec<Vec<u8>> {
        let size = format.elem_bytes();
        let mut samples: Vec<Vec<u8>> = [0x00u8, 0x7F, 0x80, 0xFF]
            .into_iter()
            .map(|byte| vec![byte; size])
            .collect();
        // and one where every byte differs, so swizzles are visible
        samples.push([0x00u8, 0x7F, 0x80, 0xFF][..size].to_vec());
        samples.push([0x12u8, 0x34, 0x56, 0x78][..size].to_vec());
        samples
    }

    #[test]
    fn test_fast_paths_match_generic() {
        let registry = ConverterRegistry::global();
        for conversion in registry.conversions() {
            let src_size = conversion.src.elem_bytes();
            let dst_size = conversion.dst.elem_bytes();

            for src in samples(conversion.src) {
                let mut fast = vec![0u8; dst_size];
                let value = (conversion.convert)(int_read(&src, src_size));
                int_write(&mut fast, dst_size, value);

                let mut generic = vec![0u8; dst_size];
                let color = unpack_color(conversion.src, &src).unwrap();
                pack_color(color, conversion.dst, &mut generic).unwrap();

                assert_eq!(
                    fast, generic,
                    "{} => {} disagrees for {:02x?}",
                    conversion.src, conversion.dst, src
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        let registry = ConverterRegistry::global();
        for conversion in registry.conversions() {
            let found = registry.find(conversion.src, conversion.dst).unwrap();
            assert_eq!(found.src, conversion.src);
            assert_eq!(found.dst, conversion.dst);
        }
        assert!(registry.find(PixelFormat::R5G6B5, PixelFormat::A8R8G8B8).is_none());
        assert!(registry.find(PixelFormat::L16, PixelFormat::A8R8G8B8).is_none());
    }

    #[test]
    fn test_registered_pairs_are_unique() {
        let conversions = ConverterRegistry::global().conversions();
        assert_eq!(conversions.len(), 38);
        for a in conversions {
            let count = conversions
                .iter()
                .filter(|b| a.src == b.src && a.dst == b.dst)
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_known_values() {
        let registry = ConverterRegistry::global();
        let convert = |src, dst, value| (registry.find(src, dst).unwrap().convert)(value);

        assert_eq!(
            convert(PixelFormat::A8R8G8B8, PixelFormat::A8B8G8R8, 0x11223344),
            0x11443322
        );
        assert_eq!(
            convert(PixelFormat::A8R8G8B8, PixelFormat::R8G8B8A8, 0x11223344),
            0x22334411
        );
        assert_eq!(
            convert(PixelFormat::B8G8R8A8, PixelFormat::R8G8B8A8, 0x11223344),
            0x33221144
        );
        assert_eq!(convert(PixelFormat::L8, PixelFormat::L16, 0x80), 0x8080);
        assert_eq!(
            convert(PixelFormat::X8R8G8B8, PixelFormat::R8G8B8A8, 0x00112233),
            0x112233FF
        );
    }
}
