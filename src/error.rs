// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

use crate::format::PixelFormat;

/// Errors reported by the conversion and decoding routines.
#[derive(Debug, Error)]
pub enum Error {
    /// The format has no defined channel or byte handling for this operation.
    #[error("{operation} is not implemented for {format}")]
    UnsupportedFormat {
        /// The format that was requested.
        format: PixelFormat,
        /// What was attempted, such as "pack" or "unpack".
        operation: &'static str,
    },
    /// A conversion was requested across a compression boundary.
    #[error("cannot convert {src} to {dst}: compressed data can only be copied verbatim")]
    UnsupportedConversion {
        /// Source format.
        src: PixelFormat,
        /// Destination format.
        dst: PixelFormat,
    },
    /// The source and destination boxes do not have the same extents.
    #[error("box extents differ: source is {src:?}, destination is {dst:?}")]
    DimensionMismatch {
        /// Source width, height and depth.
        src: (usize, usize, usize),
        /// Destination width, height and depth.
        dst: (usize, usize, usize),
    },
    /// A raw format code does not name any pixel format.
    #[error("no pixel format has the code {code}")]
    InvalidDescriptorLookup {
        /// The offending code.
        code: u32,
    },
    /// Reserved for codec layers that validate compressed streams.
    #[error("compressed block data is corrupt")]
    CorruptBlockData,
    /// A buffer is too short for the region it is supposed to hold.
    #[error("buffer too small: need {needed} bytes, but only {actual} bytes available")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        actual: usize,
    },
    /// A pixel box or region violates its layout invariants.
    #[error("invalid region: {0}")]
    InvalidRegion(&'static str),
    /// Reading a compressed block from the stream failed.
    #[error("failed to read block: {0}")]
    BlockRead(#[from] binrw::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
