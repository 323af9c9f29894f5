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
use midly::num::u4;
use serde::Deserialize;

use super::error::ConfigError;

const DEFAULT_MIDI_CHANNEL: u8 = 1;

/// A YAML representation of the MIDI output configuration.
#[derive(Deserialize, Clone)]
pub struct Midi {
    /// The MIDI output device. Names starting with "mock" select a mock device.
    device: String,

    /// The MIDI channel notes are sent on, from 1 to 16.
    channel: Option<u8>,
}

impl Midi {
    #[cfg(test)]
    /// New will create a new MIDI configuration.
    pub fn new(device: &str, channel: Option<u8>) -> Midi {
        Midi {
            device: device.to_string(),
            channel,
        }
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the zero based channel from the configuration.
    pub fn channel(&self) -> Result<u4, ConfigError> {
        let channel = self.channel.unwrap_or(DEFAULT_MIDI_CHANNEL);
        if !(1..=16).contains(&channel) {
            return Err(ConfigError::Invalid(format!(
                "MIDI channel {} must be between 1 and 16",
                channel
            )));
        }
        Ok(u4::new(channel - 1))
    }
}

#[cfg(test)]
mod test {
    use midly::num::u4;

    use super::Midi;

    #[test]
    fn test_channel() {
        assert_eq!(u4::new(0), Midi::new("mock", None).channel().unwrap());
        assert_eq!(u4::new(9), Midi::new("mock", Some(10)).channel().unwrap());
        assert_eq!(u4::new(15), Midi::new("mock", Some(16)).channel().unwrap());
        assert!(Midi::new("mock", Some(0)).channel().is_err());
        assert!(Midi::new("mock", Some(17)).channel().is_err());
    }
}
