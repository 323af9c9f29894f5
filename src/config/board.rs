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

use crate::sensor::DEFAULT_PINS;

/// The kinds of sensor boards.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    /// Scripted sensors that stay untouched unless told otherwise.
    #[default]
    Mock,
    /// Sensors tapped by typing pin names into the terminal.
    Keyboard,
}

/// A YAML representation of the sensor board.
#[derive(Deserialize, Clone, Default)]
pub struct Board {
    #[serde(default)]
    kind: BoardKind,

    /// The pin names sensors may be bound to.
    pins: Option<Vec<String>>,
}

impl Board {
    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    /// Returns the pins, falling back to the default pin set.
    pub fn pins(&self) -> Vec<String> {
        match &self.pins {
            Some(pins) => pins.clone(),
            None => DEFAULT_PINS.iter().map(|pin| pin.to_string()).collect(),
        }
    }
}
