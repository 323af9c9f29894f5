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
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use midly::{live::LiveEvent, num::u4};
use parking_lot::Mutex;
use tracing::debug;

/// A mock device. Doesn't actually send anything, but remembers what it was asked to send.
#[derive(Clone)]
pub struct Device {
    name: String,
    channel: u4,
    emitted: Arc<Mutex<Vec<LiveEvent<'static>>>>,
    failing: Arc<AtomicBool>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str, channel: u4) -> Device {
        Device {
            name: name.to_string(),
            channel,
            emitted: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    /// Gets every event emitted so far, oldest first.
    pub fn emitted(&self) -> Vec<LiveEvent<'static>> {
        self.emitted.lock().clone()
    }

    #[cfg(test)]
    /// Makes every subsequent emit fail.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl super::Device for Device {
    fn emit(&self, event: LiveEvent<'static>) -> Result<(), Box<dyn Error>> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(format!("mock device {} is failing", self.name).into());
        }

        debug!(
            device = self.name,
            event = format!("{:?}", event),
            "Emitting event (mock)."
        );
        self.emitted.lock().push(event);
        Ok(())
    }

    fn channel(&self) -> u4 {
        self.channel
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
