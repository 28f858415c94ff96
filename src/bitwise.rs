// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integer and float bit manipulation shared by the converters.

use half::f16;

/// Returns the index of the highest set bit.
///
/// There is no set bit in `0`, so it yields `u32::MAX` (the counting loop
/// ends at zero and then steps back once). Callers that can see a zero must
/// check for it themselves.
pub fn most_significant_bit(value: u32) -> u32 {
    let mut value = value;
    let mut result = 0u32;
    while value != 0 {
        result += 1;
        value >>= 1;
    }
    result.wrapping_sub(1)
}

/// Returns the smallest power of two that is greater than or equal to `n`.
///
/// `0` and `1` map to themselves, anything above `2^31` wraps to `0`.
pub fn first_power_of_two_from(n: u32) -> u32 {
    let mut n = n.wrapping_sub(1);
    n |= n >> 16;
    n |= n >> 8;
    n |= n >> 4;
    n |= n >> 2;
    n |= n >> 1;
    n.wrapping_add(1)
}

/// Whether `n` has at most one bit set. Note that `0` counts as a power of two here.
pub fn is_power_of_two(n: i32) -> bool {
    (n & n.wrapping_sub(1)) == 0
}

/// Number of bits `mask` has to be shifted right to land its lowest set bit on bit 0.
pub fn bit_shift_of_mask(mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    mask.trailing_zeros()
}

/// Rescales the channel selected by `src_mask` into the range and position of `dst_mask`.
///
/// Returns `None` if `src_mask` is empty, since there is no source range to scale from.
pub fn convert_bit_pattern(value: u32, src_mask: u32, dst_mask: u32) -> Option<u32> {
    let src_shift = bit_shift_of_mask(src_mask);
    let src_value = u64::from((value & src_mask) >> src_shift);
    let src_max = u64::from(src_mask >> src_shift);
    if src_max == 0 {
        return None;
    }

    let dst_shift = bit_shift_of_mask(dst_mask);
    let dst_max = u64::from(dst_mask >> dst_shift);

    let dst_value = (src_value * dst_max) / src_max;
    Some((dst_value as u32) << dst_shift)
}

#[inline]
fn max_for_bits(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Converts an `n` bit fixed point value to `p` bits.
///
/// Growing keeps both ends of the range exact (`0 -> 0`, `max -> max`), so
/// repeated conversions do not drift towards the middle.
pub fn fixed_to_fixed(value: u32, n: u32, p: u32) -> u32 {
    if n > p {
        // Shifting by 32 or more would overflow, and means nothing is left.
        value.checked_shr(n - p).unwrap_or(0)
    } else if n < p {
        if value == 0 {
            0
        } else if u64::from(value) == max_for_bits(n) {
            max_for_bits(p) as u32
        } else {
            ((u64::from(value) << p) / max_for_bits(n)) as u32
        }
    } else {
        value
    }
}

/// Converts a float in `[0, 1]` to a `bits` wide fixed point value.
///
/// Values in between are scaled by `2^bits` and truncated, which is why `1.0`
/// needs its own branch: it is clamped to `2^bits - 1` instead of overflowing.
pub fn float_to_fixed(value: f32, bits: u32) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        max_for_bits(bits) as u32
    } else {
        (value * (1u64 << bits) as f32) as u32
    }
}

/// Converts a `bits` wide fixed point value to a float in `[0, 1]`.
pub fn fixed_to_float(value: u32, bits: u32) -> f32 {
    if bits == 0 {
        return 0.0;
    }
    value as f32 / max_for_bits(bits) as f32
}

/// Reads an unsigned integer of `n` bytes (1 to 4) in native byte order.
///
/// Any other width reads as zero.
pub fn int_read(src: &[u8], n: usize) -> u32 {
    match n {
        1 => u32::from(src[0]),
        2 => u32::from(u16::from_ne_bytes([src[0], src[1]])),
        3 => {
            if cfg!(target_endian = "big") {
                (u32::from(src[0]) << 16) | (u32::from(src[1]) << 8) | u32::from(src[2])
            } else {
                u32::from(src[0]) | (u32::from(src[1]) << 8) | (u32::from(src[2]) << 16)
            }
        }
        4 => u32::from_ne_bytes([src[0], src[1], src[2], src[3]]),
        _ => 0,
    }
}

/// Writes the low `n` bytes (1 to 4) of `value` in native byte order.
///
/// Any other width writes nothing.
pub fn int_write(dest: &mut [u8], n: usize, value: u32) {
    match n {
        1 => dest[0] = value as u8,
        2 => dest[..2].copy_from_slice(&(value as u16).to_ne_bytes()),
        3 => {
            if cfg!(target_endian = "big") {
                dest[0] = (value >> 16) as u8;
                dest[1] = (value >> 8) as u8;
                dest[2] = value as u8;
            } else {
                dest[0] = value as u8;
                dest[1] = (value >> 8) as u8;
                dest[2] = (value >> 16) as u8;
            }
        }
        4 => dest[..4].copy_from_slice(&value.to_ne_bytes()),
        _ => {}
    }
}

/// Converts a float to the bits of an IEEE half float.
///
/// The mantissa is truncated, values too large for a half become infinity,
/// and values too small become (positive) zero. Unlike `half::f16::from_f32`,
/// nothing is rounded to nearest.
pub fn float_to_half(value: f32) -> u16 {
    float_to_half_bits(value.to_bits())
}

fn float_to_half_bits(i: u32) -> u16 {
    let s = ((i >> 16) & 0x0000_8000) as i32;
    let e = ((i >> 23) & 0x0000_00ff) as i32 - (127 - 15);
    let mut m = (i & 0x007f_ffff) as i32;

    if e <= 0 {
        if e < -10 {
            return 0;
        }
        m = (m | 0x0080_0000) >> (1 - e);
        (s | (m >> 13)) as u16
    } else if e == 0xff - (127 - 15) {
        if m == 0 {
            // infinity
            (s | 0x7c00) as u16
        } else {
            // NaN, keep at least one mantissa bit so it stays a NaN
            m >>= 13;
            (s | 0x7c00 | m | i32::from(m == 0)) as u16
        }
    } else {
        if e > 30 {
            // overflow
            return (s | 0x7c00) as u16;
        }
        (s | (e << 10) | (m >> 13)) as u16
    }
}

/// Converts the bits of an IEEE half float to a float.
pub fn half_to_float(value: u16) -> f32 {
    f16::from_bits(value).to_f32()
}
