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
use std::{error::Error, fmt};

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use midly::{live::LiveEvent, num::u4};
use parking_lot::Mutex;
use tracing::{debug, info};

/// A MIDI output port. The connection is opened once and kept for the life of the device
/// so that a hit costs a single write.
pub struct Device {
    name: String,
    channel: u4,
    connection: Mutex<MidiOutputConnection>,
}

impl Device {
    /// Connects to the single output port whose name contains the given name.
    pub fn get(name: &str, channel: u4) -> Result<Device, Box<dyn Error>> {
        let output = MidiOutput::new("touchdrum output")?;
        let mut matches = output
            .ports()
            .into_iter()
            .filter_map(|port| match output.port_name(&port) {
                Ok(port_name) if port_name.contains(name) => Some((port_name, port)),
                _ => None,
            })
            .collect::<Vec<(String, MidiOutputPort)>>();

        if matches.is_empty() {
            return Err(format!("no device found with name {}", name).into());
        }
        if matches.len() > 1 {
            return Err(format!(
                "found too many devices that match ({}), use a less ambiguous device name",
                matches
                    .iter()
                    .map(|(port_name, _)| port_name.clone())
                    .collect::<Vec<String>>()
                    .join(", ")
            )
            .into());
        }

        // We've verified that there's only one element in the vector, so this should be safe.
        let (port_name, port) = matches.swap_remove(0);
        let connection = output.connect(&port, "touchdrum")?;

        info!(device = port_name, channel = channel.as_int() + 1, "Connected to MIDI output.");

        Ok(Device {
            name: port_name,
            channel,
            connection: Mutex::new(connection),
        })
    }
}

impl super::Device for Device {
    fn emit(&self, event: LiveEvent<'static>) -> Result<(), Box<dyn Error>> {
        debug!(
            device = self.name,
            event = format!("{:?}", event),
            "Emitting event."
        );

        // Note messages are three bytes.
        let mut buf: Vec<u8> = Vec::with_capacity(8);
        event.write(&mut buf)?;
        self.connection.lock().send(&buf)?;

        Ok(())
    }

    fn channel(&self) -> u4 {
        self.channel
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Output, channel {})", self.name, self.channel.as_int() + 1)
    }
}

/// Lists the names of the available output ports.
pub fn list() -> Result<Vec<String>, Box<dyn Error>> {
    let output = MidiOutput::new("touchdrum output listing")?;
    let mut names = output
        .ports()
        .iter()
        .map(|port| output.port_name(port))
        .collect::<Result<Vec<String>, _>>()?;
    names.sort();
    Ok(names)
}
