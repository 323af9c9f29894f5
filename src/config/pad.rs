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
use std::time::Duration;

use midly::num::u7;
use serde::Deserialize;

use crate::{indicator::Color, pad::Trigger};

use super::{error::ConfigError, parse_duration};

const DEFAULT_VELOCITY: u8 = 120;
const DEFAULT_HOLD: Duration = Duration::from_secs(1);
const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// A YAML representation of a single pad.
#[derive(Deserialize, Clone)]
pub struct Pad {
    /// The name of the pad, used in logs.
    name: String,

    /// The pin the pad's sensor is wired to.
    sensor: String,

    /// The MIDI note the pad plays.
    note: u8,

    /// The velocity of the note (default: 120).
    velocity: Option<u8>,

    /// The threshold test that decides whether the pad was hit.
    trigger: Trigger,

    /// How long the note sounds before its note off is sent (default: 1s).
    hold: Option<String>,

    /// How long the pad ignores its sensor after firing (default: 100ms).
    settle: Option<String>,

    /// The indicator color shown when the pad is hit.
    hit_color: Color,

    /// The indicator color shown when the pad's note stops. Falls back to the indicator's idle color.
    idle_color: Option<Color>,
}

impl Pad {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor(&self) -> &str {
        &self.sensor
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn note(&self) -> Result<u7, ConfigError> {
        u7::try_from(self.note).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "note {} for pad '{}' must be between 0 and 127",
                self.note, self.name
            ))
        })
    }

    pub fn velocity(&self) -> Result<u7, ConfigError> {
        let velocity = self.velocity.unwrap_or(DEFAULT_VELOCITY);
        u7::try_from(velocity).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "velocity {} for pad '{}' must be between 0 and 127",
                velocity, self.name
            ))
        })
    }

    pub fn hold(&self) -> Result<Duration, ConfigError> {
        parse_duration(&format!("{} hold", self.name), &self.hold, DEFAULT_HOLD)
    }

    pub fn settle(&self) -> Result<Duration, ConfigError> {
        parse_duration(&format!("{} settle", self.name), &self.settle, DEFAULT_SETTLE)
    }

    /// Builds the runtime pad. The idle color is used unless the pad sets its own.
    pub fn to_pad(&self, idle_color: Color) -> Result<crate::pad::Pad, ConfigError> {
        Ok(crate::pad::Pad::new(
            &self.name,
            &self.sensor,
            self.note()?,
            self.velocity()?,
            self.trigger,
            self.hold()?,
            self.settle()?,
            self.hit_color,
            self.idle_color.unwrap_or(idle_color),
        ))
    }
}
