// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A color with four float channels.
///
/// Values are nominally in the range 0.0..=1.0, but float formats can carry anything.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorValue {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorValue {
    /// Transparent black.
    pub const ZERO: ColorValue = ColorValue::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: ColorValue = ColorValue::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: ColorValue = ColorValue::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> ColorValue {
        ColorValue { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> ColorValue {
        ColorValue::new(r, g, b, 1.0)
    }

    /// Clamps every channel to 0.0..=1.0.
    pub fn saturate(self) -> ColorValue {
        ColorValue::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for ColorValue {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        ColorValue::new(r, g, b, a)
    }
}

impl From<ColorValue> for [f32; 4] {
    fn from(color: ColorValue) -> Self {
        color.to_array()
    }
}

impl Add for ColorValue {
    type Output = ColorValue;

    fn add(self, rhs: ColorValue) -> ColorValue {
        ColorValue::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl AddAssign for ColorValue {
    fn add_assign(&mut self, rhs: ColorValue) {
        *self = *self + rhs;
    }
}

impl Sub for ColorValue {
    type Output = ColorValue;

    fn sub(self, rhs: ColorValue) -> ColorValue {
        ColorValue::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul<f32> for ColorValue {
    type Output = ColorValue;

    fn mul(self, rhs: f32) -> ColorValue {
        ColorValue::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

impl Mul<ColorValue> for f32 {
    type Output = ColorValue;

    fn mul(self, rhs: ColorValue) -> ColorValue {
        rhs * self
    }
}

/// Channel-wise modulation.
impl Mul for ColorValue {
    type Output = ColorValue;

    fn mul(self, rhs: ColorValue) -> ColorValue {
        ColorValue::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl Div<f32> for ColorValue {
    type Output = ColorValue;

    fn div(self, rhs: f32) -> ColorValue {
        ColorValue::new(self.r / rhs, self.g / rhs, self.b / rhs, self.a / rhs)
    }
}
