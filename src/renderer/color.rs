//! sRGB colors as they appear in style tables (`"#e7a15d"`)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::OverlayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Channels as `[0, 1]` floats
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build from `[0, 1]` float channels (clamped)
    pub fn from_f32(rgb: [f32; 3]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(rgb[0]), q(rgb[1]), q(rgb[2]))
    }

    /// Premultiplied float RGBA with the given alpha
    pub fn premultiplied(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_f32();
        let a = alpha.clamp(0.0, 1.0);
        [r * a, g * a, b * a, a]
    }
}

impl FromStr for Color {
    type Err = OverlayError;

    /// Accepts `#rgb`, `#rrggbb` and the named colors used by style tables
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OverlayError::validation(format!("invalid color '{s}'"));
        match s.to_ascii_lowercase().as_str() {
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            _ => {}
        }
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Color::hex(value)),
            3 => {
                let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
                Ok(Color::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#e7a15d".parse::<Color>().unwrap(), Color::hex(0xe7a15d));
        assert_eq!("#FFFC79".parse::<Color>().unwrap(), Color::rgb(0xff, 0xfc, 0x79));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
        assert!("e7a15d".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::hex(0xff751f)).unwrap();
        assert_eq!(json, "\"#ff751f\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::hex(0xff751f));
    }

    #[test]
    fn test_premultiplied() {
        let p = Color::WHITE.premultiplied(0.25);
        assert_eq!(p, [0.25, 0.25, 0.25, 0.25]);
    }
}
