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

use parking_lot::Mutex;

use super::{Color, Strip};

/// A mock indicator. Remembers every fill it was asked to do.
#[derive(Clone)]
pub struct Indicator {
    strip: Strip,
    fills: Arc<Mutex<Vec<Color>>>,
}

impl Indicator {
    pub fn new(strip: Strip) -> Indicator {
        Indicator {
            strip,
            fills: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    /// Gets every color the strip was filled with, oldest first.
    pub fn fills(&self) -> Vec<Color> {
        self.fills.lock().clone()
    }

    #[cfg(test)]
    /// Gets the color currently shown, if any fill happened.
    pub fn current(&self) -> Option<Color> {
        self.fills.lock().last().copied()
    }
}

impl super::Indicator for Indicator {
    fn set_all(&self, color: Color) -> Result<(), Box<dyn Error>> {
        self.fills.lock().push(color);
        Ok(())
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock ({} pixels)", self.strip.pixels())
    }
}
