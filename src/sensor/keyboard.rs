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
    collections::HashSet,
    fmt, io,
    sync::{Arc, Once},
    thread,
};

use parking_lot::Mutex;
use tracing::{error, info, span, warn, Level};

use crate::pad::{Reading, Trigger};

use super::{BoardError, Pins};

type Taps = Arc<Mutex<HashSet<String>>>;

/// A board driven from the terminal. Entering a pin name taps that pin: its sensor reports
/// a single touched reading on the next poll.
pub struct Board {
    pins: Arc<Pins>,
    taps: Taps,
    monitor: Once,
}

impl Board {
    pub fn new(pins: Vec<String>) -> Board {
        Board {
            pins: Arc::new(Pins::new(pins)),
            taps: Arc::new(Mutex::new(HashSet::new())),
            monitor: Once::new(),
        }
    }

    /// Starts reading taps from stdin. The thread is detached: a blocking read on stdin
    /// cannot be interrupted, so it ends with the process.
    fn start_monitor(&self) {
        let pins = self.pins.clone();
        let taps = self.taps.clone();
        let spawned = thread::Builder::new()
            .name("keyboard board".to_string())
            .spawn(move || {
                let span = span!(Level::INFO, "keyboard board");
                let _enter = span.enter();

                info!("Keyboard board started.");
                loop {
                    match Self::monitor_io(&pins, &taps, io::stdin().lock(), io::stdout()) {
                        Ok(true) => {}
                        Ok(false) => {
                            info!("Keyboard input closed.");
                            return;
                        }
                        Err(e) => {
                            error!(err = e.to_string(), "Error reading keyboard input.");
                            return;
                        }
                    }
                }
            });

        if let Err(e) = spawned {
            error!(err = e.to_string(), "Unable to start keyboard board.");
        }
    }

    /// Reads one line of input and records the tap. Returns false once the input is closed.
    fn monitor_io<R, W>(pins: &Pins, taps: &Taps, mut reader: R, mut writer: W) -> io::Result<bool>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(writer, "Tap ({}): ", pins.available().join(", "))?;
        writer.flush()?;

        let mut input = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        let input = input.trim();
        if input.is_empty() {
            return Ok(true);
        }

        match pins.find(input) {
            Some(pin) => {
                taps.lock().insert(pin.to_string());
            }
            None => warn!(input = input, "Unrecognized pin"),
        }
        Ok(true)
    }
}

impl super::Board for Board {
    fn sensor(&self, id: &str, trigger: Trigger) -> Result<Box<dyn super::Sensor>, BoardError> {
        let pin = self.pins.claim(id)?;
        self.monitor.call_once(|| self.start_monitor());

        Ok(Box::new(Sensor {
            pin,
            trigger,
            taps: self.taps.clone(),
        }))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keyboard ({})", self.pins.available().join(", "))
    }
}

struct Sensor {
    pin: String,
    trigger: Trigger,
    taps: Taps,
}

impl super::Sensor for Sensor {
    fn read(&self) -> Option<Reading> {
        if self.taps.lock().remove(&self.pin) {
            Some(self.trigger.touched_reading())
        } else {
            Some(self.trigger.idle_reading())
        }
    }
}
