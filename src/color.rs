//! RGB color value type and the per-run palette.
//!
//! Hue rotation goes through an HSL round-trip; lighting adjustment is a
//! saturating additive shift per channel, matching the renderer's
//! darken/lighten convention.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shift every channel by `delta`, saturating at the channel bounds.
    pub fn adjust_lighting(&self, delta: i16) -> Self {
        let shift = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
        }
    }

    /// Rotate the hue by `degrees`, keeping saturation and lightness.
    pub fn rotate_hue(&self, degrees: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        let h = (h + degrees).rem_euclid(360.0);
        Self::from_hsl(h, s, l)
    }

    /// Hue in degrees; a green/blue hue band marks "cool" palettes, which
    /// the decoration pass turns into shorelines.
    pub fn hue(&self) -> f32 {
        self.to_hsl().0
    }

    fn to_hsl(&self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if (max - min).abs() < f32::EPSILON {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            60.0 * (((g - b) / d).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / d + 2.0)
        } else {
            60.0 * ((r - g) / d + 4.0)
        };
        (h, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_u8(r1),
            g: to_u8(g1),
            b: to_u8(b1),
        }
    }
}

/// Colors derived once per run and consumed by the renderer: the building
/// body, the accent band at `line_height`, the ground plane, and the two
/// terrain themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub base: Color,
    pub line: Color,
    pub ground: Color,
    pub grass: Color,
    pub sand: Color,
    pub water: Color,
}

impl Palette {
    /// Sample a palette. Channel ranges follow the original generator:
    /// red 125..200, green 170..210, blue 180..210 keeps the base in a
    /// washed pastel band.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        let base = Color::new(
            125 + rng.draw(75) as u8,
            170 + rng.draw(40) as u8,
            180 + rng.draw(30) as u8,
        );
        let line = base.rotate_hue(110.0).adjust_lighting(25);
        let ground = Color::new(0xdd, 0xbb, 0xcc);
        Self {
            base,
            line,
            ground,
            grass: Color::new(0x7b, 0xb3, 0x6b),
            sand: Color::new(0xd9, 0xc9, 0x8a),
            water: Color::new(0x5d, 0x9c, 0xc9),
        }
    }

    /// Cool base hues (green through blue) suggest a waterside building.
    pub fn is_cool(&self) -> bool {
        let hue = self.base.hue();
        (90.0..=260.0).contains(&hue)
    }
}
