//! Packed ARGB color as exposed by view-model color properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-bit color packed as `0xAARRGGBB`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    #[inline]
    pub fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color from RGB components.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }

    #[inline]
    pub fn argb(self) -> u32 {
        self.0
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same RGB with the RGB channels replaced, alpha kept.
    pub fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, self.alpha())
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.red(), self.green(), self.blue(), a)
    }

    /// Alpha from a 0..=1 opacity; out-of-range input is clamped.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let o = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self.with_alpha((o * 255.0).round() as u8)
    }

    pub fn opacity(self) -> f32 {
        self.alpha() as f32 / 255.0
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Color(argb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_packing() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.argb(), 0x7812_3456);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0x12, 0x34, 0x56, 0x78));
        assert_eq!(c.to_string(), "#78123456");
    }

    #[test]
    fn opacity_maps_to_alpha() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(c.alpha(), 0xFF);
        assert_eq!(c.with_opacity(0.0).alpha(), 0);
        assert_eq!(c.with_opacity(0.5).alpha(), 128);
        assert_eq!(c.with_opacity(7.0).alpha(), 0xFF);
        assert_eq!(c.with_opacity(f32::NAN).alpha(), 0);
        assert_eq!(c.with_rgb(1, 2, 3).with_alpha(9), Color::rgba(1, 2, 3, 9));
    }
}
