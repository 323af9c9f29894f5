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

use midly::{
    live::LiveEvent,
    num::{u4, u7},
    MidiMessage,
};

use crate::config;

mod midir;
mod mock;

/// A MIDI output that pad notes are sent through. Sends are fire and forget.
pub trait Device: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Emits an event.
    fn emit(&self, event: LiveEvent<'static>) -> Result<(), Box<dyn Error>>;

    /// Returns the channel notes are sent on.
    fn channel(&self) -> u4;

    /// Sends a note on for the given key.
    fn note_on(&self, key: u7, velocity: u7) -> Result<(), Box<dyn Error>> {
        self.emit(note_on(self.channel(), key, velocity))
    }

    /// Sends a note off for the given key.
    fn note_off(&self, key: u7, velocity: u7) -> Result<(), Box<dyn Error>> {
        self.emit(note_off(self.channel(), key, velocity))
    }
}

/// Creates a note on event.
pub fn note_on(channel: u4, key: u7, velocity: u7) -> LiveEvent<'static> {
    LiveEvent::Midi {
        channel,
        message: MidiMessage::NoteOn { key, vel: velocity },
    }
}

/// Creates a note off event.
pub fn note_off(channel: u4, key: u7, velocity: u7) -> LiveEvent<'static> {
    LiveEvent::Midi {
        channel,
        message: MidiMessage::NoteOff { key, vel: velocity },
    }
}

/// Lists the MIDI output ports known to midir.
pub fn list_devices() -> Result<Vec<String>, Box<dyn Error>> {
    midir::list()
}

/// Gets the device described by the given configuration.
pub fn get_device(config: &config::Midi) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    let channel = config.channel()?;
    let device = config.device();
    if device.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(device, channel)));
    };

    Ok(Arc::new(midir::Device::get(device, channel)?))
}

#[cfg(test)]
pub mod test {
    pub use super::mock::Device;
}
