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
use std::{error::Error, fmt, sync::Arc};

use crate::config;

mod color;
mod log;
mod mock;

pub use color::Color;

/// A status light that shows which pad was hit last. Only whole-strip fills are supported.
pub trait Indicator: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Fills every pixel with the given color.
    fn set_all(&self, color: Color) -> Result<(), Box<dyn Error>>;
}

/// A strip of identical pixels behind a global brightness.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pixels: usize,
    brightness: f32,
}

impl Strip {
    pub fn new(pixels: usize, brightness: f32) -> Strip {
        Strip {
            pixels,
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    /// Returns the number of pixels in the strip.
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// Returns the brightness applied to every fill.
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Produces the pixel values that a fill with the given color results in.
    pub fn fill(&self, color: Color) -> Vec<Color> {
        vec![color.scale(self.brightness); self.pixels]
    }
}

/// Gets the indicator described by the given configuration.
pub fn get_indicator(config: &config::Indicator) -> Arc<dyn Indicator> {
    let strip = Strip::new(config.pixels(), config.brightness());
    match config.kind() {
        config::IndicatorKind::Log => Arc::new(log::Indicator::new(strip)),
        config::IndicatorKind::Mock => Arc::new(mock::Indicator::new(strip)),
    }
}

#[cfg(test)]
pub mod test {
    pub use super::mock::Indicator;
}

#[cfg(test)]
mod strip_test {
    use super::{Color, Strip};

    #[test]
    fn test_fill() {
        let strip = Strip::new(3, 0.5);
        assert_eq!(vec![Color::new(128, 0, 128); 3], strip.fill(Color::new(255, 0, 255)));
        assert!(Strip::new(0, 1.0).fill(Color::RED).is_empty());
    }

    #[test]
    fn test_brightness_is_clamped() {
        assert_eq!(1.0, Strip::new(1, 4.0).brightness());
        assert_eq!(0.0, Strip::new(1, -1.0).brightness());
    }
}
