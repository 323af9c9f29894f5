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
use serde::Deserialize;

use crate::indicator::Color;

const DEFAULT_PIXELS: usize = 7;
const DEFAULT_BRIGHTNESS: f32 = 0.5;
const DEFAULT_IDLE_COLOR: Color = Color::WHITE;

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    #[default]
    Log,
    Mock,
}

/// A YAML representation of the status indicator.
#[derive(Deserialize, Clone, Default)]
pub struct Indicator {
    #[serde(default)]
    kind: IndicatorKind,

    /// The number of pixels on the strip (default: 7).
    pixels: Option<usize>,

    /// The strip brightness, from 0 to 1 (default: 0.5).
    brightness: Option<f32>,

    /// The color shown after a note stops, unless the pad overrides it (default: white).
    idle_color: Option<Color>,
}

impl Indicator {
    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub fn pixels(&self) -> usize {
        self.pixels.unwrap_or(DEFAULT_PIXELS)
    }

    pub fn brightness(&self) -> f32 {
        self.brightness.unwrap_or(DEFAULT_BRIGHTNESS)
    }

    pub fn idle_color(&self) -> Color {
        self.idle_color.unwrap_or(DEFAULT_IDLE_COLOR)
    }
}
