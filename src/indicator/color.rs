// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, str::FromStr};

use serde::Deserialize;

/// An RGB color for the indicator strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 150, 0);
    pub const ORANGE: Color = Color::new(255, 40, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const TEAL: Color = Color::new(0, 255, 120);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const PURPLE: Color = Color::new(180, 0, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 20);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Parses a color in the #rrggbb form.
    pub fn from_hex(hex: &str) -> Result<Color, String> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("invalid hex color '{}'", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| format!("invalid hex color '{}': {}", hex, e))
        };

        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Looks up one of the named palette colors.
    pub fn from_name(name: &str) -> Result<Color, String> {
        match name.to_lowercase().as_str() {
            "red" => Ok(Color::RED),
            "yellow" => Ok(Color::YELLOW),
            "orange" => Ok(Color::ORANGE),
            "green" => Ok(Color::GREEN),
            "teal" => Ok(Color::TEAL),
            "cyan" => Ok(Color::CYAN),
            "blue" => Ok(Color::BLUE),
            "purple" => Ok(Color::PURPLE),
            "magenta" => Ok(Color::MAGENTA),
            "white" => Ok(Color::WHITE),
            "black" | "off" => Ok(Color::BLACK),
            _ => Err(format!("unknown color name '{}'", name)),
        }
    }

    /// Scales each channel by the given brightness, clamped to [0, 1].
    pub fn scale(&self, brightness: f32) -> Color {
        let brightness = brightness.clamp(0.0, 1.0);
        let scale = |channel: u8| (f32::from(channel) * brightness).round() as u8;
        Color {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            Color::from_hex(s)
        } else {
            Color::from_name(s)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The forms a color may take in a kit file: a name, a hex string, or an [r, g, b] list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Text(String),
    Rgb([u8; 3]),
}

impl TryFrom<ColorValue> for Color {
    type Error = String;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Text(text) => text.parse(),
            ColorValue::Rgb([r, g, b]) => Ok(Color::new(r, g, b)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Color;

    #[test]
    fn test_named_colors() {
        assert_eq!(Ok(Color::RED), Color::from_name("red"));
        assert_eq!(Ok(Color::TEAL), Color::from_name("Teal"));
        assert_eq!(Ok(Color::BLACK), Color::from_name("off"));
        assert!(Color::from_name("chartreuse").is_err());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Ok(Color::new(0x12, 0xab, 0xff)), "#12abff".parse());
        assert_eq!("#12abff", Color::new(0x12, 0xab, 0xff).to_string());
        assert!("#12ab".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn test_scale() {
        assert_eq!(Color::new(128, 75, 0), Color::YELLOW.scale(0.5));
        assert_eq!(Color::WHITE, Color::WHITE.scale(3.0));
        assert_eq!(Color::BLACK, Color::WHITE.scale(-1.0));
    }
}
