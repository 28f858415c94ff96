// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::descriptor::get_descriptor;
use crate::macros::define_pixel_formats;
use thiserror::Error;

define_pixel_formats! {
    /// Identifies how the bytes of a pixel are laid out.
    ///
    /// The codes are stable and match the numbering used by format tags in existing files, so
    /// they must never be reassigned. Formats with a bit layout (such as `A8R8G8B8`) describe a
    /// native-endian integer, listing channels from the most to the least significant bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    #[repr(u32)]
    pub enum PixelFormat {
        /// Unknown pixel format.
        #[default]
        Unknown = 0,
        /// 8-bit luminance.
        L8 = 1,
        /// 16-bit luminance.
        L16 = 2,
        /// 8-bit alpha.
        A8 = 3,
        /// 4-bit alpha and 4-bit luminance.
        A4L4 = 4,
        /// A byte of luminance followed by a byte of alpha.
        ByteLa = 5,
        /// 16-bit, 5 bits red, 6 bits green, 5 bits blue.
        R5G6B5 = 6,
        /// 16-bit, 5 bits blue, 6 bits green, 5 bits red.
        B5G6R5 = 7,
        /// 16-bit, 4 bits for alpha, red, green and blue.
        A4R4G4B4 = 8,
        /// 16-bit, 1 bit alpha, 5 bits for red, green and blue.
        A1R5G5B5 = 9,
        /// 24-bit, 8 bits for red, green and blue.
        R8G8B8 = 10,
        /// 24-bit, 8 bits for blue, green and red.
        B8G8R8 = 11,
        /// 32-bit, 8 bits for alpha, red, green and blue.
        A8R8G8B8 = 12,
        /// 32-bit, 8 bits for alpha, blue, green and red.
        A8B8G8R8 = 13,
        /// 32-bit, 8 bits for blue, green, red and alpha.
        B8G8R8A8 = 14,
        /// 32-bit, 2 bits alpha, 10 bits for red, green and blue.
        A2R10G10B10 = 15,
        /// 32-bit, 2 bits alpha, 10 bits for blue, green and red.
        A2B10G10R10 = 16,
        /// DXT1/BC1, 4x4 blocks of 565 color with optional 1-bit alpha.
        DXT1 = 17,
        /// DXT2, premultiplied color with explicit 4-bit alpha.
        DXT2 = 18,
        /// DXT3/BC2, color with explicit 4-bit alpha.
        DXT3 = 19,
        /// DXT4, premultiplied color with interpolated alpha.
        DXT4 = 20,
        /// DXT5/BC3, color with interpolated alpha.
        DXT5 = 21,
        /// 48-bit, three 16-bit floats for red, green and blue.
        Float16Rgb = 22,
        /// 64-bit, four 16-bit floats for red, green, blue and alpha.
        Float16Rgba = 23,
        /// 96-bit, three 32-bit floats for red, green and blue.
        Float32Rgb = 24,
        /// 128-bit, four 32-bit floats for red, green, blue and alpha.
        Float32Rgba = 25,
        /// 32-bit, 8 bits of padding followed by red, green and blue.
        X8R8G8B8 = 26,
        /// 32-bit, 8 bits of padding followed by blue, green and red.
        X8B8G8R8 = 27,
        /// 32-bit, 8 bits for red, green, blue and alpha.
        R8G8B8A8 = 28,
        /// Depth texture.
        Depth = 29,
        /// 64-bit, four 16-bit unsigned integers for red, green, blue and alpha.
        ShortRgba = 30,
        /// 8-bit, 3 bits red, 3 bits green, 2 bits blue.
        R3G3B2 = 31,
        /// 16-bit float, red only.
        Float16R = 32,
        /// 32-bit float, red only.
        Float32R = 33,
        /// 32-bit, two 16-bit unsigned integers for green and red.
        ShortGr = 34,
        /// 32-bit, two 16-bit floats for green and red.
        Float16Gr = 35,
        /// 64-bit, two 32-bit floats for green and red.
        Float32Gr = 36,
        /// 48-bit, three 16-bit unsigned integers for red, green and blue.
        ShortRgb = 37,
    }
}

impl PixelFormat {
    /// Bytes in red, green, blue order in memory.
    #[cfg(target_endian = "little")]
    pub const BYTE_RGB: PixelFormat = PixelFormat::B8G8R8;
    /// Bytes in blue, green, red order in memory.
    #[cfg(target_endian = "little")]
    pub const BYTE_BGR: PixelFormat = PixelFormat::R8G8B8;
    /// Bytes in blue, green, red, alpha order in memory.
    #[cfg(target_endian = "little")]
    pub const BYTE_BGRA: PixelFormat = PixelFormat::A8R8G8B8;
    /// Bytes in red, green, blue, alpha order in memory.
    #[cfg(target_endian = "little")]
    pub const BYTE_RGBA: PixelFormat = PixelFormat::A8B8G8R8;

    /// Bytes in red, green, blue order in memory.
    #[cfg(target_endian = "big")]
    pub const BYTE_RGB: PixelFormat = PixelFormat::R8G8B8;
    /// Bytes in blue, green, red order in memory.
    #[cfg(target_endian = "big")]
    pub const BYTE_BGR: PixelFormat = PixelFormat::B8G8R8;
    /// Bytes in blue, green, red, alpha order in memory.
    #[cfg(target_endian = "big")]
    pub const BYTE_BGRA: PixelFormat = PixelFormat::B8G8R8A8;
    /// Bytes in red, green, blue, alpha order in memory.
    #[cfg(target_endian = "big")]
    pub const BYTE_RGBA: PixelFormat = PixelFormat::R8G8B8A8;

    /// The numeric code of this format.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Returns the canonical name of this format, for example `PF_A8R8G8B8`.
    pub fn name(self) -> &'static str {
        get_descriptor(self).name
    }

    /// Looks up a format by name. The `PF_` prefix is optional.
    ///
    /// `Unknown` is never returned, even when asked for by name.
    pub fn from_name(name: &str, case_sensitive: bool) -> Option<PixelFormat> {
        PixelFormat::ALL
            .iter()
            .copied()
            .filter(|format| *format != PixelFormat::Unknown)
            .find(|format| {
                let full = format.name();
                let short = full.strip_prefix("PF_").unwrap_or(full);
                if case_sensitive {
                    name == full || name == short
                } else {
                    name.eq_ignore_ascii_case(full) || name.eq_ignore_ascii_case(short)
                }
            })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a format name fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pixel format name: {0}")]
pub struct ParsePixelFormatError(pub String);

impl FromStr for PixelFormat {
    type Err = ParsePixelFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::from_name(s, false).ok_or_else(|| ParsePixelFormatError(s.to_string()))
    }
}

impl From<PixelFormat> for u32 {
    fn from(format: PixelFormat) -> Self {
        format.code()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PixelFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PixelFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

bitflags! {
    /// Properties of a pixel format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags : u32 {
        /// The format has an alpha channel.
        const HAS_ALPHA = 0x01;
        /// The format is block compressed, so individual pixels are not addressable.
        const COMPRESSED = 0x02;
        /// The channels are floating point.
        const FLOAT = 0x04;
        /// The format is a depth format.
        const DEPTH = 0x08;
        /// The pixel is a single native-endian integer, addressable with masks and shifts.
        const NATIVE_ENDIAN = 0x10;
        /// The format stores luminance instead of red, green and blue.
        const LUMINANCE = 0x20;
    }
}

/// Type of a single channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Byte per component (8-bit fixed point, 0.0..1.0).
    Byte,
    /// Short per component (16-bit fixed point, 0.0..1.0).
    Short,
    /// 16-bit float per component.
    Float16,
    /// 32-bit float per component.
    Float32,
}
