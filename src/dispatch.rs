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
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, error, info, span, warn, Level};

use crate::{
    indicator::Indicator,
    midi,
    pad::{Action, Pad, Reading},
    sensor::Sensor,
    shutdown::ShutdownHandle,
};

/// A pad together with the sensor it reads.
pub struct BoundPad {
    pad: Pad,
    sensor: Box<dyn Sensor>,
    last_reading: Option<Reading>,
}

impl BoundPad {
    pub fn new(pad: Pad, sensor: Box<dyn Sensor>) -> BoundPad {
        BoundPad {
            pad,
            sensor,
            last_reading: None,
        }
    }
}

/// What happened during a single cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub fired: usize,
    pub stopped: usize,
}

/// Periodically writes the raw readings of every pad. Purely diagnostic.
struct Diagnostics {
    interval: Duration,
    writer: Box<dyn io::Write + Send>,
    last_report: Option<Instant>,
}

/// Polls every pad in a fixed order and turns their actions into notes and indicator fills.
/// The loop owns its collaborators and is the only thing that touches them.
pub struct DispatchLoop {
    pads: Vec<BoundPad>,
    device: Arc<dyn midi::Device>,
    indicator: Arc<dyn Indicator>,
    poll_interval: Duration,
    diagnostics: Option<Diagnostics>,
}

impl DispatchLoop {
    pub fn new(
        pads: Vec<BoundPad>,
        device: Arc<dyn midi::Device>,
        indicator: Arc<dyn Indicator>,
    ) -> DispatchLoop {
        DispatchLoop {
            pads,
            device,
            indicator,
            poll_interval: Duration::ZERO,
            diagnostics: None,
        }
    }

    /// Sets the pause between cycles in `run`.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> DispatchLoop {
        self.poll_interval = poll_interval;
        self
    }

    /// Writes raw readings to the given writer no more often than the given interval.
    pub fn with_diagnostics(
        mut self,
        interval: Duration,
        writer: Box<dyn io::Write + Send>,
    ) -> DispatchLoop {
        self.diagnostics = Some(Diagnostics {
            interval,
            writer,
            last_report: None,
        });
        self
    }

    /// Gets the pads in polling order.
    pub fn pads(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter().map(|bound| &bound.pad)
    }

    /// Runs a single cycle at the given time. Every pad is checked for hits before any pad is
    /// checked for expiry, so a note never stops in the cycle that started it.
    pub fn tick(&mut self, now: Instant) -> Cycle {
        let mut cycle = Cycle::default();

        for bound in self.pads.iter_mut() {
            let reading = bound.sensor.read();
            bound.last_reading = reading;

            let action = bound.pad.evaluate(reading, now);
            if let Action::Fire { .. } = action {
                info!(pad = bound.pad.name(), reading = ?reading, "Hit.");
                perform(self.device.as_ref(), self.indicator.as_ref(), &bound.pad, action);
                cycle.fired += 1;
            }
        }

        for bound in self.pads.iter_mut() {
            loop {
                let action = bound.pad.check_expiry(now);
                if action == Action::NoAction {
                    break;
                }
                debug!(pad = bound.pad.name(), "Note expired.");
                perform(self.device.as_ref(), self.indicator.as_ref(), &bound.pad, action);
                cycle.stopped += 1;
            }
        }

        self.report(now);
        cycle
    }

    /// Runs cycles until shutdown is requested, then releases any notes still sounding.
    pub fn run(&mut self, shutdown: &ShutdownHandle) {
        let span = span!(Level::INFO, "dispatch loop");
        let _enter = span.enter();

        info!(
            pads = self.pads.len(),
            device = self.device.to_string(),
            indicator = self.indicator.to_string(),
            poll_interval = format!("{:?}", self.poll_interval),
            "Dispatch loop started."
        );

        while !shutdown.is_requested() {
            self.tick(Instant::now());
            if !self.poll_interval.is_zero() {
                spin_sleep::sleep(self.poll_interval);
            }
        }

        let released = self.flush();
        info!(released, "Dispatch loop stopped.");
    }

    /// Stops every note that is still owed a note off, regardless of its deadline. Returns the
    /// number of notes stopped.
    pub fn flush(&mut self) -> usize {
        let mut released = 0;
        for bound in self.pads.iter_mut() {
            loop {
                let action = bound.pad.release();
                if action == Action::NoAction {
                    break;
                }
                perform(self.device.as_ref(), self.indicator.as_ref(), &bound.pad, action);
                released += 1;
            }
        }
        released
    }

    fn report(&mut self, now: Instant) {
        let diagnostics = match self.diagnostics.as_mut() {
            Some(diagnostics) => diagnostics,
            None => return,
        };

        if let Some(last_report) = diagnostics.last_report {
            if now < last_report + diagnostics.interval {
                return;
            }
        }
        diagnostics.last_report = Some(now);

        if let Err(e) = write_readings(&mut diagnostics.writer, &self.pads) {
            warn!(err = e.to_string(), "Unable to write sensor readings.");
        }
    }
}

/// Carries out a pad's action. Sends are fire and forget: failures are logged and the loop
/// moves on.
fn perform(device: &dyn midi::Device, indicator: &dyn Indicator, pad: &Pad, action: Action) {
    let (result, color) = match action {
        Action::NoAction => return,
        Action::Fire {
            key,
            velocity,
            color,
        } => (device.note_on(key, velocity), color),
        Action::Stop {
            key,
            velocity,
            color,
        } => (device.note_off(key, velocity), color),
    };

    if let Err(e) = result {
        error!(pad = pad.name(), err = e.to_string(), "Error sending note.");
    }
    if let Err(e) = indicator.set_all(color) {
        error!(pad = pad.name(), err = e.to_string(), "Error setting indicator.");
    }
}

fn write_readings<W>(writer: &mut W, pads: &[BoundPad]) -> io::Result<()>
where
    W: io::Write + ?Sized,
{
    for bound in pads.iter() {
        match bound.last_reading {
            Some(reading) => writeln!(writer, "{} - {}", bound.pad.name(), reading)?,
            None => writeln!(writer, "{} - no reading", bound.pad.name())?,
        }
    }
    writeln!(writer)?;
    writer.flush()
}
