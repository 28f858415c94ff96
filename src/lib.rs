// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pixel format conversion and DXT texture decoding.
//!
//! Every [`PixelFormat`] is described by a static table, which drives a generic conversion
//! between pixel memory and [`ColorValue`]. Common format pairs have direct conversions on
//! top of that, and [`convert_bulk`] picks the fastest way to move a whole [`PixelBox`].

/// A continuous block of bytes.
pub type ByteSpan<'a> = &'a [u8];

/// An owned, growable block of bytes.
pub type ByteBuffer = Vec<u8>;

#[macro_use]
mod macros;

/// Bit twiddling, fixed point and half float helpers.
pub mod bitwise;

/// The error type shared by every module.
pub mod error;

/// Pixel format identifiers and their flags.
pub mod format;

/// The static table describing the memory layout of each format.
pub mod descriptor;

/// Four channel float colors.
pub mod color;

/// Converting single pixels between memory and colors.
pub mod pack;

/// Regions and boxes of pixels inside a buffer.
pub mod pixel_box;

/// Fast paths for common format pairs.
pub mod conversions;

/// Converting whole boxes of pixels.
pub mod bulk;

/// Decoding DXT1 to DXT5 compressed blocks and surfaces.
pub mod dxt;

/// Nearest and linear scaling.
pub mod resample;

pub use binrw::Endian;

pub use bulk::{convert_bulk, convert_in_place, ConversionOptions, PixelConverter};
pub use color::ColorValue;
pub use conversions::{ConverterRegistry, PixelConversion};
pub use descriptor::{get_descriptor, get_memory_size, FormatDescriptor, FormatTable};
pub use dxt::{
    decode_dxt_block, decompress_surface, decompress_surface_to, decompressed_format,
    DecodedSurface,
};
pub use error::{Error, Result};
pub use format::{ComponentType, FormatFlags, ParsePixelFormatError, PixelFormat};
pub use pack::{pack_color, pack_color_bytes, unpack_color, unpack_color_bytes};
pub use pixel_box::{PixelBox, Region};
pub use resample::{scale, Filter};
