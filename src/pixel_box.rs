// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::descriptor::get_memory_size;
use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// A 3D box of pixels. Upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub front: usize,
    pub right: usize,
    pub bottom: usize,
    pub back: usize,
}

impl Region {
    pub const fn new(
        left: usize,
        top: usize,
        front: usize,
        right: usize,
        bottom: usize,
        back: usize,
    ) -> Region {
        Region {
            left,
            top,
            front,
            right,
            bottom,
            back,
        }
    }

    /// A single slice deep region.
    pub const fn new_2d(left: usize, top: usize, right: usize, bottom: usize) -> Region {
        Region::new(left, top, 0, right, bottom, 1)
    }

    /// A region anchored at the origin.
    pub const fn from_size(width: usize, height: usize, depth: usize) -> Region {
        Region::new(0, 0, 0, width, height, depth)
    }

    pub const fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    pub const fn depth(&self) -> usize {
        self.back.saturating_sub(self.front)
    }

    pub const fn size(&self) -> (usize, usize, usize) {
        (self.width(), self.height(), self.depth())
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0 || self.depth() == 0
    }

    /// Whether the bounds are ordered (each lower bound at most its upper bound).
    pub const fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom && self.front <= self.back
    }

    /// Whether `other` lies entirely within this region.
    pub const fn contains(&self, other: &Region) -> bool {
        other.is_valid()
            && other.left >= self.left
            && other.top >= self.top
            && other.front >= self.front
            && other.right <= self.right
            && other.bottom <= self.bottom
            && other.back <= self.back
    }
}

/// Describes where a box of pixels lives inside a caller supplied byte buffer.
///
/// Coordinates are absolute: the pixel at `(x, y, z)` starts at byte
/// `offset + (x + y * row_pitch + z * slice_pitch) * elem_bytes`, so a sub-volume shares
/// the offset and pitches of the box it was taken from. Pitches are counted in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub region: Region,
    pub format: PixelFormat,
    /// Byte offset of pixel `(0, 0, 0)` in the buffer.
    pub offset: usize,
    /// Elements between the start of one row and the next.
    pub row_pitch: usize,
    /// Elements between the start of one slice and the next.
    pub slice_pitch: usize,
}

impl PixelBox {
    /// A tightly packed box of the given size, starting at the beginning of the buffer.
    pub fn new(width: usize, height: usize, depth: usize, format: PixelFormat) -> PixelBox {
        PixelBox {
            region: Region::from_size(width, height, depth),
            format,
            offset: 0,
            row_pitch: width,
            slice_pitch: width * height,
        }
    }

    /// Places the box at `offset` bytes into the buffer.
    pub fn with_offset(mut self, offset: usize) -> PixelBox {
        self.offset = offset;
        self
    }

    /// Creates a box with explicit pitches.
    pub fn from_region(
        region: Region,
        format: PixelFormat,
        offset: usize,
        row_pitch: usize,
        slice_pitch: usize,
    ) -> Result<PixelBox> {
        let pixel_box = PixelBox {
            region,
            format,
            offset,
            row_pitch,
            slice_pitch,
        };
        pixel_box.validate()?;
        Ok(pixel_box)
    }

    /// Fails with [`Error::InvalidRegion`] if the bounds are reversed, or if rows or slices
    /// would overlap each other.
    pub fn validate(&self) -> Result<()> {
        if !self.region.is_valid() {
            return Err(Error::InvalidRegion("region bounds are reversed"));
        }
        if self.row_pitch < self.width() {
            return Err(Error::InvalidRegion("row pitch is smaller than the width"));
        }
        if self.slice_pitch < self.row_pitch * self.height() {
            return Err(Error::InvalidRegion(
                "slice pitch is smaller than a slice of rows",
            ));
        }
        Ok(())
    }

    pub const fn left(&self) -> usize {
        self.region.left
    }

    pub const fn top(&self) -> usize {
        self.region.top
    }

    pub const fn front(&self) -> usize {
        self.region.front
    }

    pub const fn width(&self) -> usize {
        self.region.width()
    }

    pub const fn height(&self) -> usize {
        self.region.height()
    }

    pub const fn depth(&self) -> usize {
        self.region.depth()
    }

    pub const fn size(&self) -> (usize, usize, usize) {
        self.region.size()
    }

    /// Whether rows and slices follow each other without gaps.
    pub const fn is_consecutive(&self) -> bool {
        self.row_pitch == self.width() && self.slice_pitch == self.width() * self.height()
    }

    /// Whether the box covers a whole surface from the origin with no gaps, which is the only
    /// shape a compressed box can have.
    pub const fn is_whole_surface(&self) -> bool {
        self.region.left == 0
            && self.region.top == 0
            && self.region.front == 0
            && self.is_consecutive()
    }

    /// Bytes the box would take if it were consecutive.
    pub fn consecutive_size(&self) -> usize {
        get_memory_size(self.width(), self.height(), self.depth(), self.format)
    }

    /// Elements between the end of one row and the start of the next.
    pub const fn row_skip(&self) -> usize {
        self.row_pitch.saturating_sub(self.width())
    }

    /// Elements between the end of one slice and the start of the next.
    pub const fn slice_skip(&self) -> usize {
        self.slice_pitch.saturating_sub(self.height() * self.row_pitch)
    }

    /// Byte offset of the pixel at absolute coordinates `(x, y, z)`.
    pub fn pixel_offset(&self, x: usize, y: usize, z: usize) -> usize {
        self.offset + (x + y * self.row_pitch + z * self.slice_pitch) * self.format.elem_bytes()
    }

    /// Smallest buffer length that holds every pixel of the box.
    pub fn required_len(&self) -> usize {
        if self.format.is_compressed() {
            return self.offset + self.consecutive_size();
        }
        if self.region.is_empty() {
            return self.offset;
        }

        let last = self.pixel_offset(
            self.region.right - 1,
            self.region.bottom - 1,
            self.region.back - 1,
        );
        last + self.format.elem_bytes()
    }

    /// Fails with [`Error::BufferTooSmall`] if `len` bytes cannot hold the box.
    pub fn check_buffer(&self, len: usize) -> Result<()> {
        let needed = self.required_len();
        if len < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: len,
            });
        }
        Ok(())
    }

    /// Returns a box covering `region`, which must lie within this box.
    ///
    /// Compressed boxes cannot be subdivided, so they only accept their own region.
    pub fn sub_volume(&self, region: Region) -> Result<PixelBox> {
        if self.format.is_compressed() {
            if region == self.region {
                return Ok(*self);
            }
            return Err(Error::InvalidRegion(
                "cannot take a sub-volume of a compressed box",
            ));
        }
        if !self.region.contains(&region) {
            return Err(Error::InvalidRegion("sub-volume is out of range"));
        }

        Ok(PixelBox { region, ..*self })
    }
}
