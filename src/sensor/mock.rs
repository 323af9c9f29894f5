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
use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::Arc,
};

use parking_lot::Mutex;

use crate::pad::{Reading, Trigger};

use super::{BoardError, Pins};

type Scripts = Arc<Mutex<HashMap<String, VecDeque<Option<Reading>>>>>;

/// A mock board. Sensors replay scripted readings and report an untouched reading once
/// their script runs out.
pub struct Board {
    pins: Pins,
    scripts: Scripts,
}

impl Board {
    pub fn new(pins: Vec<String>) -> Board {
        Board {
            pins: Pins::new(pins),
            scripts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    /// Queues readings for the given pin. None simulates a failed read.
    pub fn script<I>(&self, id: &str, readings: I)
    where
        I: IntoIterator<Item = Option<Reading>>,
    {
        self.scripts
            .lock()
            .entry(id.to_string())
            .or_default()
            .extend(readings);
    }

    #[cfg(test)]
    /// Queues raw readings for the given pin.
    pub fn script_raw(&self, id: &str, readings: &[u16]) {
        self.script(id, readings.iter().map(|value| Some(Reading::Raw(*value))));
    }
}

impl super::Board for Board {
    fn sensor(&self, id: &str, trigger: Trigger) -> Result<Box<dyn super::Sensor>, BoardError> {
        let pin = self.pins.claim(id)?;
        Ok(Box::new(Sensor {
            pin,
            idle: trigger.idle_reading(),
            scripts: self.scripts.clone(),
        }))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock ({})", self.pins.available().join(", "))
    }
}

struct Sensor {
    pin: String,
    idle: Reading,
    scripts: Scripts,
}

impl super::Sensor for Sensor {
    fn read(&self) -> Option<Reading> {
        match self
            .scripts
            .lock()
            .get_mut(&self.pin)
            .and_then(|script| script.pop_front())
        {
            Some(reading) => reading,
            None => Some(self.idle),
        }
    }
}
