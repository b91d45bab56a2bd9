//! 8-bit RGB color.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from 0.0 to 255.0 channel values, rounding and clamping each.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// Parse `#rrggbb` (leading `#` optional).
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

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Component-wise linear interpolation, `t` in [0, 1].
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| a as f64 + (b as f64 - a as f64) * t;
        Rgb::from_channels(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Rec. 709 luma over the encoded channels, in 0..=255.
    pub fn luma(&self) -> f64 {
        0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64
    }
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Rgb::from_hex("#E0E0E0").unwrap();
        assert_eq!(c, Rgb::new(224, 224, 224));
        assert_eq!(c.to_hex(), "#e0e0e0");
        assert_eq!(Rgb::from_hex("440154"), Some(Rgb::new(0x44, 0x01, 0x54)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_from_channels_clamps() {
        assert_eq!(Rgb::from_channels(-4.5, 300.0, 127.6), Rgb::new(0, 255, 128));
        assert_eq!(Rgb::from_channels(f64::NAN, 1.0, 2.0), Rgb::new(0, 1, 2));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rgb::new(100, 50, 25));
    }
}
