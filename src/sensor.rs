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
use std::{collections::HashSet, fmt, sync::Arc};

use parking_lot::Mutex;

use crate::{
    config,
    pad::{Reading, Trigger},
};

mod keyboard;
mod mock;

/// The touch-capable pins of the board the kit was first built on.
pub const DEFAULT_PINS: &[&str] = &["A0", "A1", "A2", "A3", "A4", "A5", "D9"];

/// A touch sensor bound to a single pad.
pub trait Sensor: std::marker::Send {
    /// Takes a reading. None means no usable reading was available, which callers
    /// treat as untouched.
    fn read(&self) -> Option<Reading>;
}

/// A board hands out sensors by pin name.
pub trait Board: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Binds the sensor on the given pin. The trigger tells the board which kind of
    /// reading the pad will interpret.
    fn sensor(&self, id: &str, trigger: Trigger) -> Result<Box<dyn Sensor>, BoardError>;
}

/// Errors binding sensors. These are only raised at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("unknown sensor '{id}', available sensors are: {available}")]
    UnknownSensor { id: String, available: String },
    #[error("sensor '{0}' is already bound to another pad")]
    SensorInUse(String),
}

/// Tracks which pins exist on a board and which have been bound.
pub(crate) struct Pins {
    available: Vec<String>,
    bound: Mutex<HashSet<String>>,
}

impl Pins {
    pub fn new(available: Vec<String>) -> Pins {
        Pins {
            available,
            bound: Mutex::new(HashSet::new()),
        }
    }

    /// Gets the pin names.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Resolves a pin name, ignoring case.
    pub fn find(&self, id: &str) -> Option<&str> {
        self.available
            .iter()
            .find(|pin| pin.eq_ignore_ascii_case(id.trim()))
            .map(|pin| pin.as_str())
    }

    /// Marks the pin as bound. Each pin may only be bound once.
    pub fn claim(&self, id: &str) -> Result<String, BoardError> {
        let pin = match self.find(id) {
            Some(pin) => pin.to_string(),
            None => {
                return Err(BoardError::UnknownSensor {
                    id: id.to_string(),
                    available: self.available.join(", "),
                })
            }
        };

        if !self.bound.lock().insert(pin.clone()) {
            return Err(BoardError::SensorInUse(pin));
        }

        Ok(pin)
    }
}

/// Gets the board described by the given configuration.
pub fn get_board(config: &config::Board) -> Arc<dyn Board> {
    match config.kind() {
        config::BoardKind::Mock => Arc::new(mock::Board::new(config.pins())),
        config::BoardKind::Keyboard => Arc::new(keyboard::Board::new(config.pins())),
    }
}

#[cfg(test)]
pub mod test {
    pub use super::mock::Board;
}
