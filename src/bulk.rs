// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{debug, trace};

use crate::bitwise::{int_read, int_write};
use crate::conversions::{ConverterRegistry, PixelConversion};
use crate::descriptor::FormatTable;
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::pack::{pack_with, unpack_with};
use crate::pixel_box::PixelBox;

/// Tunables for [`PixelConverter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionOptions {
    /// Use the direct format-pair conversions when one exists. Turning this off forces every
    /// conversion through the float path, which is useful for checking the fast paths.
    pub optimized_paths: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            optimized_paths: true,
        }
    }
}

/// Converts boxes of pixels between formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelConverter {
    table: FormatTable,
    registry: ConverterRegistry,
    options: ConversionOptions,
}

impl PixelConverter {
    pub fn new(options: ConversionOptions) -> PixelConverter {
        PixelConverter {
            table: FormatTable::global(),
            registry: ConverterRegistry::global(),
            options,
        }
    }

    pub fn options(&self) -> ConversionOptions {
        self.options
    }

    pub fn table(&self) -> FormatTable {
        self.table
    }

    pub fn registry(&self) -> ConverterRegistry {
        self.registry
    }

    /// Converts the pixels described by `src` in `src_data` into the pixels described by `dst`
    /// in `dst_data`. Both boxes must have the same extents.
    pub fn convert(
        &self,
        src: &PixelBox,
        src_data: &[u8],
        dst: &PixelBox,
        dst_data: &mut [u8],
    ) -> Result<()> {
        for format in [src.format, dst.format] {
            if format == PixelFormat::Unknown {
                return Err(Error::UnsupportedFormat {
                    format,
                    operation: "convert",
                });
            }
        }
        if src.size() != dst.size() {
            return Err(Error::DimensionMismatch {
                src: src.size(),
                dst: dst.size(),
            });
        }
        src.validate()?;
        dst.validate()?;
        src.check_buffer(src_data.len())?;
        dst.check_buffer(dst_data.len())?;

        self.convert_checked(src, src_data, dst, dst_data)
    }

    fn convert_checked(
        &self,
        src: &PixelBox,
        src_data: &[u8],
        dst: &PixelBox,
        dst_data: &mut [u8],
    ) -> Result<()> {
        let src_desc = self.table.get(src.format);
        let dst_desc = self.table.get(dst.format);

        if src_desc.is_compressed() || dst_desc.is_compressed() {
            if src.format != dst.format {
                return Err(Error::UnsupportedConversion {
                    src: src.format,
                    dst: dst.format,
                });
            }
            if !src.is_whole_surface() || !dst.is_whole_surface() {
                return Err(Error::InvalidRegion(
                    "compressed boxes must cover the whole surface",
                ));
            }

            let size = src.consecutive_size();
            debug!(format = %src.format, size, "Copying compressed surface");
            dst_data[dst.offset..dst.offset + size]
                .copy_from_slice(&src_data[src.offset..src.offset + size]);
            return Ok(());
        }

        if src.region.is_empty() {
            return Ok(());
        }

        if src.format == dst.format {
            copy_same_format(src, src_data, dst, dst_data);
            return Ok(());
        }

        // The padding byte is free to hold anything, so write it as opaque alpha.
        let retagged = match dst.format {
            PixelFormat::X8R8G8B8 => Some(PixelFormat::A8R8G8B8),
            PixelFormat::X8B8G8R8 => Some(PixelFormat::A8B8G8R8),
            _ => None,
        };
        if let Some(format) = retagged {
            trace!(from = %dst.format, to = %format, "Retagging destination");
            let dst = PixelBox { format, ..*dst };
            return self.convert_checked(src, src_data, &dst, dst_data);
        }

        // The padding byte is ignored anyway when the destination has no alpha.
        let retagged = match src.format {
            PixelFormat::X8R8G8B8 => Some(PixelFormat::A8R8G8B8),
            PixelFormat::X8B8G8R8 => Some(PixelFormat::A8B8G8R8),
            _ => None,
        };
        if let Some(format) = retagged {
            if !dst_desc.has_alpha() {
                trace!(from = %src.format, to = %format, "Retagging source");
                let src = PixelBox { format, ..*src };
                return self.convert_checked(&src, src_data, dst, dst_data);
            }
        }

        if self.options.optimized_paths {
            if let Some(conversion) = self.registry.find(src.format, dst.format) {
                debug!(src = %src.format, dst = %dst.format, "Using optimized conversion");
                return convert_fast(conversion, src, src_data, dst, dst_data);
            }
        }

        debug!(src = %src.format, dst = %dst.format, "Using generic conversion");
        let src_size = src_desc.elem_size();
        let dst_size = dst_desc.elem_size();
        for_each_pixel(src, dst, |src_at, dst_at| {
            let color = unpack_with(src_desc, &src_data[src_at..src_at + src_size])?;
            pack_with(dst_desc, color, &mut dst_data[dst_at..dst_at + dst_size])
        })
    }

    /// Copies pixels between two boxes of the same format that share one buffer.
    ///
    /// Rows are copied in an order that keeps overlapping boxes with the same pitches intact.
    pub fn convert_in_place(&self, src: &PixelBox, dst: &PixelBox, data: &mut [u8]) -> Result<()> {
        if src.format != dst.format {
            return Err(Error::UnsupportedConversion {
                src: src.format,
                dst: dst.format,
            });
        }
        if src.format == PixelFormat::Unknown {
            return Err(Error::UnsupportedFormat {
                format: src.format,
                operation: "convert",
            });
        }
        if src.size() != dst.size() {
            return Err(Error::DimensionMismatch {
                src: src.size(),
                dst: dst.size(),
            });
        }
        src.validate()?;
        dst.validate()?;
        src.check_buffer(data.len())?;
        dst.check_buffer(data.len())?;

        if src.format.is_compressed() {
            if !src.is_whole_surface() || !dst.is_whole_surface() {
                return Err(Error::InvalidRegion(
                    "compressed boxes must cover the whole surface",
                ));
            }
            let size = src.consecutive_size();
            data.copy_within(src.offset..src.offset + size, dst.offset);
            return Ok(());
        }
        if src.region.is_empty() {
            return Ok(());
        }

        let row_bytes = src.width() * src.format.elem_bytes();
        let rows: Vec<(usize, usize)> = (0..src.depth())
            .flat_map(|z| (0..src.height()).map(move |y| (y, z)))
            .collect();

        let moves_forward = dst.pixel_offset(dst.left(), dst.top(), dst.front())
            > src.pixel_offset(src.left(), src.top(), src.front());
        trace!(rows = rows.len(), moves_forward, "Copying rows in place");

        let mut copy_row = |(y, z): (usize, usize)| {
            let from = src.pixel_offset(src.left(), src.top() + y, src.front() + z);
            let to = dst.pixel_offset(dst.left(), dst.top() + y, dst.front() + z);
            data.copy_within(from..from + row_bytes, to);
        };
        if moves_forward {
            rows.into_iter().rev().for_each(&mut copy_row);
        } else {
            rows.into_iter().for_each(&mut copy_row);
        }
        Ok(())
    }
}

/// Visits every pixel of two equally sized boxes, slices first, then rows, then columns,
/// handing over the byte offset of the pixel in each buffer.
fn for_each_pixel(
    src: &PixelBox,
    dst: &PixelBox,
    mut f: impl FnMut(usize, usize) -> Result<()>,
) -> Result<()> {
    let (width, height, depth) = src.size();
    for z in 0..depth {
        for y in 0..height {
            let mut src_at = src.pixel_offset(src.left(), src.top() + y, src.front() + z);
            let mut dst_at = dst.pixel_offset(dst.left(), dst.top() + y, dst.front() + z);
            for _ in 0..width {
                f(src_at, dst_at)?;
                src_at += src.format.elem_bytes();
                dst_at += dst.format.elem_bytes();
            }
        }
    }
    Ok(())
}

fn copy_same_format(src: &PixelBox, src_data: &[u8], dst: &PixelBox, dst_data: &mut [u8]) {
    let src_start = src.pixel_offset(src.left(), src.top(), src.front());
    let dst_start = dst.pixel_offset(dst.left(), dst.top(), dst.front());

    if src.is_consecutive() && dst.is_consecutive() {
        let size = src.consecutive_size();
        debug!(format = %src.format, size, "Copying consecutive pixels");
        dst_data[dst_start..dst_start + size]
            .copy_from_slice(&src_data[src_start..src_start + size]);
        return;
    }

    debug!(format = %src.format, "Copying pixels row by row");
    let row_bytes = src.width() * src.format.elem_bytes();
    for z in 0..src.depth() {
        for y in 0..src.height() {
            let from = src.pixel_offset(src.left(), src.top() + y, src.front() + z);
            let to = dst.pixel_offset(dst.left(), dst.top() + y, dst.front() + z);
            dst_data[to..to + row_bytes].copy_from_slice(&src_data[from..from + row_bytes]);
        }
    }
}

fn convert_fast(
    conversion: PixelConversion,
    src: &PixelBox,
    src_data: &[u8],
    dst: &PixelBox,
    dst_data: &mut [u8],
) -> Result<()> {
    let src_size = src.format.elem_bytes();
    let dst_size = dst.format.elem_bytes();
    for_each_pixel(src, dst, |src_at, dst_at| {
        let value = (conversion.convert)(int_read(&src_data[src_at..], src_size));
        int_write(&mut dst_data[dst_at..], dst_size, value);
        Ok(())
    })
}

/// Converts between two pixel boxes with the default converter.
pub fn convert_bulk(
    src: &PixelBox,
    src_data: &[u8],
    dst: &PixelBox,
    dst_data: &mut [u8],
) -> Result<()> {
    PixelConverter::default().convert(src, src_data, dst, dst_data)
}

/// Copies between two boxes of the same format inside one buffer.
pub fn convert_in_place(src: &PixelBox, dst: &PixelBox, data: &mut [u8]) -> Result<()> {
    PixelConverter::default().convert_in_place(src, dst, data)
}
