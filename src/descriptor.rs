// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The format description table: the one place that knows how each [`PixelFormat`] is laid out.

use crate::format::{ComponentType, FormatFlags, PixelFormat};

/// Describes the memory layout of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// The format this describes.
    pub format: PixelFormat,
    /// Canonical name, used for config and script files.
    pub name: &'static str,
    /// Bytes per element, or 0 for compressed formats.
    pub elem_bytes: u8,
    pub flags: FormatFlags,
    pub component_type: ComponentType,
    pub component_count: u8,
    /// Bits per channel, in red, green, blue, alpha order.
    pub bits: [u8; 4],
    /// Channel masks for native-endian formats, in red, green, blue, alpha order.
    pub masks: [u32; 4],
    /// Channel shifts, in red, green, blue, alpha order.
    pub shifts: [u8; 4],
}

impl FormatDescriptor {
    pub const fn has_flag(&self, flag: FormatFlags) -> bool {
        self.flags.bits() & flag.bits() == flag.bits()
    }

    pub const fn has_alpha(&self) -> bool {
        self.has_flag(FormatFlags::HAS_ALPHA)
    }

    pub const fn is_compressed(&self) -> bool {
        self.has_flag(FormatFlags::COMPRESSED)
    }

    pub const fn is_floating_point(&self) -> bool {
        self.has_flag(FormatFlags::FLOAT)
    }

    pub const fn is_depth(&self) -> bool {
        self.has_flag(FormatFlags::DEPTH)
    }

    pub const fn is_native_endian(&self) -> bool {
        self.has_flag(FormatFlags::NATIVE_ENDIAN)
    }

    pub const fn is_luminance(&self) -> bool {
        self.has_flag(FormatFlags::LUMINANCE)
    }

    /// Bytes per element as a `usize`, for indexing.
    pub const fn elem_size(&self) -> usize {
        self.elem_bytes as usize
    }

    /// Bits per element. Compressed formats report 0.
    pub const fn elem_bits(&self) -> u32 {
        self.elem_bytes as u32 * 8
    }
}

const fn flags(list: &[FormatFlags]) -> FormatFlags {
    let mut bits = 0;
    let mut i = 0;
    while i < list.len() {
        bits |= list[i].bits();
        i += 1;
    }
    FormatFlags::from_bits_truncate(bits)
}

#[allow(clippy::too_many_arguments)]
const fn describe(
    format: PixelFormat,
    name: &'static str,
    elem_bytes: u8,
    flags: FormatFlags,
    component_type: ComponentType,
    component_count: u8,
    bits: [u8; 4],
    masks: [u32; 4],
    shifts: [u8; 4],
) -> FormatDescriptor {
    FormatDescriptor {
        format,
        name,
        elem_bytes,
        flags,
        component_type,
        component_count,
        bits,
        masks,
        shifts,
    }
}

const NO_MASKS: [u32; 4] = [0; 4];

use ComponentType::{Byte, Float16, Float32, Short};
use FormatFlags as F;
use PixelFormat as P;

/// Every format, indexed by its code.
#[rustfmt::skip]
const DESCRIPTIONS: [FormatDescriptor; PixelFormat::COUNT] = [
    describe(P::Unknown, "PF_UNKNOWN", 0, flags(&[]), Byte, 0, [0; 4], NO_MASKS, [0; 4]),
    describe(
        P::L8,
        "PF_L8",
        1,
        flags(&[F::LUMINANCE, F::NATIVE_ENDIAN]),
        Byte,
        1,
        [8, 0, 0, 0],
        [0xFF, 0, 0, 0],
        [0, 0, 0, 0],
    ),
    describe(
        P::L16,
        "PF_L16",
        2,
        flags(&[F::LUMINANCE, F::NATIVE_ENDIAN]),
        Short,
        1,
        [16, 0, 0, 0],
        [0xFFFF, 0, 0, 0],
        [0, 0, 0, 0],
    ),
    describe(
        P::A8,
        "PF_A8",
        1,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        1,
        [0, 0, 0, 8],
        [0, 0, 0, 0xFF],
        [0, 0, 0, 0],
    ),
    describe(
        P::A4L4,
        "PF_A4L4",
        1,
        flags(&[F::HAS_ALPHA, F::LUMINANCE, F::NATIVE_ENDIAN]),
        Byte,
        2,
        [4, 0, 0, 4],
        [0x0F, 0, 0, 0xF0],
        [0, 0, 0, 4],
    ),
    describe(
        P::ByteLa,
        "PF_BYTE_LA",
        2,
        flags(&[F::HAS_ALPHA, F::LUMINANCE]),
        Byte,
        2,
        [8, 0, 0, 8],
        NO_MASKS,
        [0, 0, 0, 8],
    ),
    describe(
        P::R5G6B5,
        "PF_R5G6B5",
        2,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [5, 6, 5, 0],
        [0xF800, 0x07E0, 0x001F, 0],
        [11, 5, 0, 0],
    ),
    describe(
        P::B5G6R5,
        "PF_B5G6R5",
        2,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [5, 6, 5, 0],
        [0x001F, 0x07E0, 0xF800, 0],
        [0, 5, 11, 0],
    ),
    describe(
        P::A4R4G4B4,
        "PF_A4R4G4B4",
        2,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [4, 4, 4, 4],
        [0x0F00, 0x00F0, 0x000F, 0xF000],
        [8, 4, 0, 12],
    ),
    describe(
        P::A1R5G5B5,
        "PF_A1R5G5B5",
        2,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [5, 5, 5, 1],
        [0x7C00, 0x03E0, 0x001F, 0x8000],
        [10, 5, 0, 15],
    ),
    describe(
        P::R8G8B8,
        "PF_R8G8B8",
        3,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [8, 8, 8, 0],
        [0xFF0000, 0x00FF00, 0x0000FF, 0],
        [16, 8, 0, 0],
    ),
    describe(
        P::B8G8R8,
        "PF_B8G8R8",
        3,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [8, 8, 8, 0],
        [0x0000FF, 0x00FF00, 0xFF0000, 0],
        [0, 8, 16, 0],
    ),
    describe(
        P::A8R8G8B8,
        "PF_A8R8G8B8",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [8, 8, 8, 8],
        [0x00FF0000, 0x0000FF00, 0x000000FF, 0xFF000000],
        [16, 8, 0, 24],
    ),
    describe(
        P::A8B8G8R8,
        "PF_A8B8G8R8",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [8, 8, 8, 8],
        [0x000000FF, 0x0000FF00, 0x00FF0000, 0xFF000000],
        [0, 8, 16, 24],
    ),
    describe(
        P::B8G8R8A8,
        "PF_B8G8R8A8",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [8, 8, 8, 8],
        [0x0000FF00, 0x00FF0000, 0xFF000000, 0x000000FF],
        [8, 16, 24, 0],
    ),
    describe(
        P::A2R10G10B10,
        "PF_A2R10G10B10",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [10, 10, 10, 2],
        [0x3FF00000, 0x000FFC00, 0x000003FF, 0xC0000000],
        [20, 10, 0, 30],
    ),
    describe(
        P::A2B10G10R10,
        "PF_A2B10G10R10",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [10, 10, 10, 2],
        [0x000003FF, 0x000FFC00, 0x3FF00000, 0xC0000000],
        [0, 10, 20, 30],
    ),
    describe(P::DXT1, "PF_DXT1", 0, flags(&[F::COMPRESSED, F::HAS_ALPHA]), Byte, 3, [0; 4], NO_MASKS, [0; 4]),
    describe(P::DXT2, "PF_DXT2", 0, flags(&[F::COMPRESSED, F::HAS_ALPHA]), Byte, 4, [0; 4], NO_MASKS, [0; 4]),
    describe(P::DXT3, "PF_DXT3", 0, flags(&[F::COMPRESSED, F::HAS_ALPHA]), Byte, 4, [0; 4], NO_MASKS, [0; 4]),
    describe(P::DXT4, "PF_DXT4", 0, flags(&[F::COMPRESSED, F::HAS_ALPHA]), Byte, 4, [0; 4], NO_MASKS, [0; 4]),
    describe(P::DXT5, "PF_DXT5", 0, flags(&[F::COMPRESSED, F::HAS_ALPHA]), Byte, 4, [0; 4], NO_MASKS, [0; 4]),
    describe(
        P::Float16Rgb,
        "PF_FLOAT16_RGB",
        6,
        flags(&[F::FLOAT]),
        Float16,
        3,
        [16, 16, 16, 0],
        NO_MASKS,
        [0, 16, 32, 0],
    ),
    describe(
        P::Float16Rgba,
        "PF_FLOAT16_RGBA",
        8,
        flags(&[F::FLOAT, F::HAS_ALPHA]),
        Float16,
        4,
        [16, 16, 16, 16],
        NO_MASKS,
        [0, 16, 32, 48],
    ),
    describe(
        P::Float32Rgb,
        "PF_FLOAT32_RGB",
        12,
        flags(&[F::FLOAT]),
        Float32,
        3,
        [32, 32, 32, 0],
        NO_MASKS,
        [0, 32, 64, 0],
    ),
    describe(
        P::Float32Rgba,
        "PF_FLOAT32_RGBA",
        16,
        flags(&[F::FLOAT, F::HAS_ALPHA]),
        Float32,
        4,
        [32, 32, 32, 32],
        NO_MASKS,
        [0, 32, 64, 96],
    ),
    describe(
        P::X8R8G8B8,
        "PF_X8R8G8B8",
        4,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [8, 8, 8, 0],
        [0x00FF0000, 0x0000FF00, 0x000000FF, 0xFF000000],
        [16, 8, 0, 24],
    ),
    describe(
        P::X8B8G8R8,
        "PF_X8B8G8R8",
        4,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [8, 8, 8, 0],
        [0x000000FF, 0x0000FF00, 0x00FF0000, 0xFF000000],
        [0, 8, 16, 24],
    ),
    describe(
        P::R8G8B8A8,
        "PF_R8G8B8A8",
        4,
        flags(&[F::HAS_ALPHA, F::NATIVE_ENDIAN]),
        Byte,
        4,
        [8, 8, 8, 8],
        [0xFF000000, 0x00FF0000, 0x0000FF00, 0x000000FF],
        [24, 16, 8, 0],
    ),
    describe(P::Depth, "PF_DEPTH", 4, flags(&[F::DEPTH]), Float32, 1, [0; 4], NO_MASKS, [0; 4]),
    describe(
        P::ShortRgba,
        "PF_SHORT_RGBA",
        8,
        flags(&[F::HAS_ALPHA]),
        Short,
        4,
        [16, 16, 16, 16],
        NO_MASKS,
        [0, 16, 32, 48],
    ),
    describe(
        P::R3G3B2,
        "PF_R3G3B2",
        1,
        flags(&[F::NATIVE_ENDIAN]),
        Byte,
        3,
        [3, 3, 2, 0],
        [0xE0, 0x1C, 0x03, 0],
        [5, 2, 0, 0],
    ),
    describe(P::Float16R, "PF_FLOAT16_R", 2, flags(&[F::FLOAT]), Float16, 1, [16, 0, 0, 0], NO_MASKS, [0; 4]),
    describe(P::Float32R, "PF_FLOAT32_R", 4, flags(&[F::FLOAT]), Float32, 1, [32, 0, 0, 0], NO_MASKS, [0; 4]),
    describe(
        P::ShortGr,
        "PF_SHORT_GR",
        4,
        flags(&[F::NATIVE_ENDIAN]),
        Short,
        2,
        [16, 16, 0, 0],
        [0x0000FFFF, 0xFFFF0000, 0, 0],
        [0, 16, 0, 0],
    ),
    describe(
        P::Float16Gr,
        "PF_FLOAT16_GR",
        4,
        flags(&[F::FLOAT]),
        Float16,
        2,
        [16, 16, 0, 0],
        NO_MASKS,
        [0, 16, 0, 0],
    ),
    describe(
        P::Float32Gr,
        "PF_FLOAT32_GR",
        8,
        flags(&[F::FLOAT]),
        Float32,
        2,
        [32, 32, 0, 0],
        NO_MASKS,
        [0, 32, 0, 0],
    ),
    describe(
        P::ShortRgb,
        "PF_SHORT_RGB",
        6,
        flags(&[]),
        Short,
        3,
        [16, 16, 16, 0],
        NO_MASKS,
        [0, 16, 32, 0],
    ),
];

/// Checks the table for internal consistency. Evaluated at compile time, so a bad entry
/// fails the build instead of corrupting pixels at runtime.
const fn validate_descriptions(table: &[FormatDescriptor]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let desc = &table[i];
        if desc.format as usize != i {
            return false;
        }
        if desc.is_compressed() != (desc.elem_bytes == 0) && desc.format as u32 != 0 {
            return false;
        }
        if desc.component_count > 4 {
            return false;
        }

        if desc.is_native_endian() {
            if desc.elem_bytes > 4 {
                return false;
            }
            let mut channel = 0;
            while channel < 4 {
                let bits = desc.bits[channel] as u32;
                let shift = desc.shifts[channel] as u32;
                if bits > 0 {
                    if shift + bits > desc.elem_bits() {
                        return false;
                    }
                    let expected = (((1u64 << bits) - 1) << shift) as u32;
                    if desc.masks[channel] != expected {
                        return false;
                    }
                }
                channel += 1;
            }
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    validate_descriptions(&DESCRIPTIONS),
    "pixel format table is inconsistent"
);

static FORMAT_DESCRIPTIONS: [FormatDescriptor; PixelFormat::COUNT] = DESCRIPTIONS;

/// Read-only handle to the format description table.
///
/// The table is built at compile time, so there is nothing to initialize and it can be shared
/// between threads freely.
#[derive(Debug, Clone, Copy)]
pub struct FormatTable {
    descriptors: &'static [FormatDescriptor; PixelFormat::COUNT],
}

impl FormatTable {
    /// The process-wide table.
    pub const fn global() -> FormatTable {
        FormatTable {
            descriptors: &FORMAT_DESCRIPTIONS,
        }
    }

    /// Returns the description of `format`.
    #[inline]
    pub fn get(&self, format: PixelFormat) -> &'static FormatDescriptor {
        &self.descriptors[format as usize]
    }

    /// Returns the description of the format with the raw `code`.
    pub fn lookup(&self, code: u32) -> crate::Result<&'static FormatDescriptor> {
        let format = PixelFormat::try_from(code)?;
        Ok(self.get(format))
    }

    /// Iterates over every description, in code order.
    pub fn iter(&self) -> impl Iterator<Item = &'static FormatDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        FormatTable::global()
    }
}

/// Returns the description of `format`.
#[inline]
pub fn get_descriptor(format: PixelFormat) -> &'static FormatDescriptor {
    FormatTable::global().get(format)
}

/// Returns the number of bytes needed to store an image of the given size.
///
/// Compressed formats round the width and height up to whole 4x4 blocks.
pub fn get_memory_size(width: usize, height: usize, depth: usize, format: PixelFormat) -> usize {
    match format {
        PixelFormat::DXT1 => width.div_ceil(4) * height.div_ceil(4) * 8 * depth,
        PixelFormat::DXT2 | PixelFormat::DXT3 | PixelFormat::DXT4 | PixelFormat::DXT5 => {
            width.div_ceil(4) * height.div_ceil(4) * 16 * depth
        }
        _ => width * height * depth * get_descriptor(format).elem_size(),
    }
}

impl PixelFormat {
    pub fn descriptor(self) -> &'static FormatDescriptor {
        get_descriptor(self)
    }

    /// Bytes per element, or 0 for compressed formats.
    pub fn elem_bytes(self) -> usize {
        get_descriptor(self).elem_size()
    }

    pub fn elem_bits(self) -> u32 {
        get_descriptor(self).elem_bits()
    }

    pub fn flags(self) -> FormatFlags {
        get_descriptor(self).flags
    }

    pub fn has_alpha(self) -> bool {
        get_descriptor(self).has_alpha()
    }

    pub fn is_floating_point(self) -> bool {
        get_descriptor(self).is_floating_point()
    }

    pub fn is_compressed(self) -> bool {
        get_descriptor(self).is_compressed()
    }

    pub fn is_depth(self) -> bool {
        get_descriptor(self).is_depth()
    }

    pub fn is_native_endian(self) -> bool {
        get_descriptor(self).is_native_endian()
    }

    pub fn is_luminance(self) -> bool {
        get_descriptor(self).is_luminance()
    }

    /// Whether individual pixels of this format can be read and written directly.
    pub fn is_accessible(self) -> bool {
        self != PixelFormat::Unknown && !self.is_compressed()
    }

    pub fn component_type(self) -> ComponentType {
        get_descriptor(self).component_type
    }

    pub fn component_count(self) -> usize {
        get_descriptor(self).component_count as usize
    }

    /// Bits per channel, in red, green, blue, alpha order.
    pub fn bit_depths(self) -> [u8; 4] {
        get_descriptor(self).bits
    }

    pub fn bit_masks(self) -> [u32; 4] {
        get_descriptor(self).masks
    }

    pub fn bit_shifts(self) -> [u8; 4] {
        get_descriptor(self).shifts
    }

    pub fn memory_size(self, width: usize, height: usize, depth: usize) -> usize {
        get_memory_size(width, height, depth, self)
    }

    /// Finds the closest format with the requested integer or float bit depth.
    ///
    /// `integer_bits` of 16 or 32 trades between the 16 and 32-bit integer layouts, and
    /// `float_bits` of 16 or 32 between half and full float layouts. Anything else, or a
    /// format without a counterpart, returns the format unchanged.
    pub fn format_for_bit_depths(self, integer_bits: u16, float_bits: u16) -> PixelFormat {
        use PixelFormat::*;

        let integer = match (integer_bits, self) {
            (16, R8G8B8 | X8R8G8B8) => Some(R5G6B5),
            (16, B8G8R8 | X8B8G8R8) => Some(B5G6R5),
            (16, A8R8G8B8 | R8G8B8A8 | A8B8G8R8 | B8G8R8A8) => Some(A4R4G4B4),
            (16, A2R10G10B10 | A2B10G10R10) => Some(A1R5G5B5),
            (32, R5G6B5) => Some(X8R8G8B8),
            (32, B5G6R5) => Some(X8B8G8R8),
            (32, A4R4G4B4) => Some(A8R8G8B8),
            (32, A1R5G5B5) => Some(A2R10G10B10),
            _ => None,
        };
        if let Some(format) = integer {
            return format;
        }

        match (float_bits, self) {
            (16, Float32R) => Float16R,
            (16, Float32Rgb) => Float16Rgb,
            (16, Float32Rgba) => Float16Rgba,
            (32, Float16R) => Float32R,
            (32, Float16Rgb) => Float32Rgb,
            (32, Float16Rgba) => Float32Rgba,
            _ => self,
        }
    }
}
