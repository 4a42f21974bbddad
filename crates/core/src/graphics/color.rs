//! Flat RGB colour used by the background fill and the triangle rasterizer
//!
//! Channels are plain 8-bit values; how they land in memory is decided by the
//! target's layout, not by this type.

use serde::{Deserialize, Serialize};

/// 24-bit RGB colour
///
/// Serialized as a `[r, g, b]` array. Deserialization also accepts the
/// `{ "r": .., "g": .., "b": .. }` object form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RgbRepr", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Array([u8; 3]),
    Object { r: u8, g: u8, b: u8 },
}

impl From<RgbRepr> for Rgb {
    fn from(repr: RgbRepr) -> Self {
        match repr {
            RgbRepr::Array([r, g, b]) => Rgb { r, g, b },
            RgbRepr::Object { r, g, b } => Rgb { r, g, b },
        }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const PURPLE: Rgb = Rgb::new(255, 0, 255);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` value; bits above 24 are ignored
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Pack as `0xRRGGBB`
    #[inline]
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Complementary colour (`255 - c` per channel)
    #[inline]
    pub const fn invert(self) -> Self {
        Self {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
        }
    }

    /// Scale every channel by `factor`, clamped to [0, 255]
    ///
    /// Frame drivers use this to bake a flat light intensity into a face colour
    /// before submitting the triangle.
    ///
    /// # Example
    ///
    /// ```
    /// use raster_core::graphics::Rgb;
    ///
    /// let lit = Rgb::new(200, 100, 50).darken(0.5);
    /// assert_eq!(lit, Rgb::new(100, 50, 25));
    /// ```
    #[inline]
    pub fn darken(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Linear interpolation towards `other` (0.0 = self, 1.0 = other)
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let mix = |a: u8, b: u8| {
            let a = a as f32;
            (a + (b as f32 - a) * t).clamp(0.0, 255.0).round() as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}
