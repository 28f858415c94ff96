// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scaling pixel boxes to a different size.
//!
//! Source positions are stepped in 16.48 fixed point, so each dimension is limited to 65535
//! pixels.

use tracing::debug;

use crate::bulk::convert_bulk;
use crate::color::ColorValue;
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::pack::{pack_with, unpack_with};
use crate::pixel_box::PixelBox;

const MAX_DIMENSION: usize = 0xFFFF;

/// How source pixels are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Filter {
    /// Takes the closest source pixel.
    #[default]
    Nearest,
    /// Blends the eight surrounding source pixels.
    Linear,
    /// Same as [`Filter::Linear`], for 2D images.
    Bilinear,
}

/// Scales the pixels of `src` to fill `dst`.
///
/// The formats may differ. Compressed formats cannot be scaled.
pub fn scale(
    src: &PixelBox,
    src_data: &[u8],
    dst: &PixelBox,
    dst_data: &mut [u8],
    filter: Filter,
) -> Result<()> {
    if src.format.is_compressed() || dst.format.is_compressed() {
        return Err(Error::UnsupportedConversion {
            src: src.format,
            dst: dst.format,
        });
    }
    for format in [src.format, dst.format] {
        if format == PixelFormat::Unknown {
            return Err(Error::UnsupportedFormat {
                format,
                operation: "scale",
            });
        }
    }
    src.validate()?;
    dst.validate()?;
    src.check_buffer(src_data.len())?;
    dst.check_buffer(dst_data.len())?;

    if dst.region.is_empty() {
        return Ok(());
    }
    if src.region.is_empty() {
        return Err(Error::InvalidRegion("cannot scale an empty box"));
    }
    let (width, height, depth) = src.size();
    let (dst_width, dst_height, dst_depth) = dst.size();
    if width.max(height).max(depth) > MAX_DIMENSION
        || dst_width.max(dst_height).max(dst_depth) > MAX_DIMENSION
    {
        return Err(Error::InvalidRegion("box is too large to scale"));
    }

    debug!(
        ?filter,
        src = ?src.size(),
        dst = ?dst.size(),
        "Scaling {} to {}",
        src.format,
        dst.format
    );

    match filter {
        Filter::Nearest => {
            if src.format == dst.format {
                scale_nearest(src, src_data, dst, dst_data);
                Ok(())
            } else {
                // scale in the source format, then convert
                let temp_box = PixelBox::new(dst_width, dst_height, dst_depth, src.format);
                let mut temp = vec![0u8; temp_box.required_len()];
                scale_nearest(src, src_data, &temp_box, &mut temp);
                convert_bulk(&temp_box, &temp, dst, dst_data)
            }
        }
        Filter::Linear | Filter::Bilinear => scale_linear(src, src_data, dst, dst_data),
    }
}

/// Fixed point step between source samples for each destination pixel.
fn step(src_len: usize, dst_len: usize) -> u64 {
    ((src_len as u64) << 48) / dst_len as u64
}

fn scale_nearest(src: &PixelBox, src_data: &[u8], dst: &PixelBox, dst_data: &mut [u8]) {
    let elem = src.format.elem_bytes();
    let step_x = step(src.width(), dst.width());
    let step_y = step(src.height(), dst.height());
    let step_z = step(src.depth(), dst.depth());

    // start at the middle of the first step, so samples land on pixel centres
    let start = |origin: usize, step: u64| ((origin as u64) << 48) + (step >> 1).saturating_sub(1);

    let mut cur_z = start(src.front(), step_z);
    for z in dst.region.front..dst.region.back {
        let src_z = (cur_z >> 48) as usize;

        let mut cur_y = start(src.top(), step_y);
        for y in dst.region.top..dst.region.bottom {
            let src_y = (cur_y >> 48) as usize;

            let mut cur_x = start(src.left(), step_x);
            for x in dst.region.left..dst.region.right {
                let src_x = (cur_x >> 48) as usize;

                let from = src.pixel_offset(src_x, src_y, src_z);
                let to = dst.pixel_offset(x, y, z);
                dst_data[to..to + elem].copy_from_slice(&src_data[from..from + elem]);

                cur_x += step_x;
            }
            cur_y += step_y;
        }
        cur_z += step_z;
    }
}

/// The two source coordinates around a fixed point position, and the weight of the second.
fn linear_samples(position: u64, lowest: usize, last: usize) -> (usize, usize, f32) {
    // back up half a pixel to sample between pixel centres, never before the box origin
    let relative = position.saturating_sub((lowest as u64) << 48);
    let temp = (relative >> 32).saturating_sub(0x8000);
    let first = (lowest + (temp >> 16) as usize).min(last);
    let second = (first + 1).min(last);
    let weight = (temp & 0xFFFF) as f32 / 65536.0;
    (first, second, weight)
}

fn scale_linear(
    src: &PixelBox,
    src_data: &[u8],
    dst: &PixelBox,
    dst_data: &mut [u8],
) -> Result<()> {
    let src_desc = src.format.descriptor();
    let dst_desc = dst.format.descriptor();
    let src_elem = src_desc.elem_size();
    let dst_elem = dst_desc.elem_size();

    let step_x = step(src.width(), dst.width());
    let step_y = step(src.height(), dst.height());
    let step_z = step(src.depth(), dst.depth());

    let sample = |x: usize, y: usize, z: usize| {
        let at = src.pixel_offset(x, y, z);
        unpack_with(src_desc, &src_data[at..at + src_elem])
    };

    let mut cur_z = ((src.front() as u64) << 48) + (step_z >> 1);
    for z in dst.region.front..dst.region.back {
        let (z1, z2, zf) = linear_samples(cur_z, src.front(), src.region.back - 1);

        let mut cur_y = ((src.top() as u64) << 48) + (step_y >> 1);
        for y in dst.region.top..dst.region.bottom {
            let (y1, y2, yf) = linear_samples(cur_y, src.top(), src.region.bottom - 1);

            let mut cur_x = ((src.left() as u64) << 48) + (step_x >> 1);
            for x in dst.region.left..dst.region.right {
                let (x1, x2, xf) = linear_samples(cur_x, src.left(), src.region.right - 1);

                let corners: [(usize, usize, usize, f32); 8] = [
                    (x1, y1, z1, (1.0 - xf) * (1.0 - yf) * (1.0 - zf)),
                    (x2, y1, z1, xf * (1.0 - yf) * (1.0 - zf)),
                    (x1, y2, z1, (1.0 - xf) * yf * (1.0 - zf)),
                    (x2, y2, z1, xf * yf * (1.0 - zf)),
                    (x1, y1, z2, (1.0 - xf) * (1.0 - yf) * zf),
                    (x2, y1, z2, xf * (1.0 - yf) * zf),
                    (x1, y2, z2, (1.0 - xf) * yf * zf),
                    (x2, y2, z2, xf * yf * zf),
                ];

                let mut accum = ColorValue::ZERO;
                for (sx, sy, sz, weight) in corners {
                    accum += sample(sx, sy, sz)? * weight;
                }

                let to = dst.pixel_offset(x, y, z);
                pack_with(dst_desc, accum, &mut dst_data[to..to + dst_elem])?;

                cur_x += step_x;
            }
            cur_y += step_y;
        }
        cur_z += step_z;
    }
    Ok(())
}
