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
use std::{collections::HashSet, path::Path, time::Duration};

use config::{Config, File};
use serde::Deserialize;

use super::{
    board::Board, duration_from_str, error::ConfigError, indicator::Indicator, midi::Midi, pad::Pad,
    parse_duration,
};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The configuration for a drum kit: where notes go, where touches come from, and the pads.
#[derive(Deserialize, Clone)]
pub struct Kit {
    /// The MIDI output configuration.
    midi: Midi,

    /// The sensor board configuration.
    board: Option<Board>,

    /// The status indicator configuration.
    indicator: Option<Indicator>,

    /// The pause between polling cycles (default: 1ms).
    poll_interval: Option<String>,

    /// When set, raw sensor readings are printed at this interval.
    debug_interval: Option<String>,

    /// The pads, in polling order.
    pads: Vec<Pad>,
}

impl Kit {
    /// Loads and validates a kit from a YAML file.
    pub fn load(path: &Path) -> Result<Kit, ConfigError> {
        let kit = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Kit>()?;
        kit.validate()?;
        Ok(kit)
    }

    pub fn midi(&self) -> &Midi {
        &self.midi
    }

    pub fn board(&self) -> Board {
        self.board.clone().unwrap_or_default()
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator.clone().unwrap_or_default()
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration("poll_interval", &self.poll_interval, DEFAULT_POLL_INTERVAL)
    }

    pub fn debug_interval(&self) -> Result<Option<Duration>, ConfigError> {
        self.debug_interval
            .as_deref()
            .map(|value| duration_from_str("debug_interval", value))
            .transpose()
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Builds the runtime pads in polling order.
    pub fn to_pads(&self) -> Result<Vec<crate::pad::Pad>, ConfigError> {
        let idle_color = self.indicator().idle_color();
        self.pads.iter().map(|pad| pad.to_pad(idle_color)).collect()
    }

    /// Checks everything that can be checked without touching hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pads.is_empty() {
            return Err(ConfigError::Invalid("no pads are configured".to_string()));
        }

        let mut names = HashSet::new();
        for pad in self.pads.iter() {
            if !names.insert(pad.name()) {
                return Err(ConfigError::Invalid(format!(
                    "pad name '{}' is used more than once",
                    pad.name()
                )));
            }
        }

        self.midi.channel()?;
        self.poll_interval()?;
        self.debug_interval()?;
        self.to_pads()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, io::Write, path::PathBuf, time::Duration};

    use midly::num::u7;

    use crate::{config::BoardKind, config::IndicatorKind, indicator::Color, pad::Trigger};

    use super::Kit;

    fn write_kit(yaml: &str) -> Result<tempfile::NamedTempFile, Box<dyn Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(yaml.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_bundled_kit() -> Result<(), Box<dyn Error>> {
        let kit = Kit::load(&PathBuf::from("assets/kit.yaml"))?;

        assert_eq!("mock-midi", kit.midi().device());
        assert_eq!(BoardKind::Mock, kit.board().kind());
        assert_eq!(IndicatorKind::Log, kit.indicator().kind());
        assert_eq!(7, kit.indicator().pixels());
        assert_eq!(Duration::from_millis(1), kit.poll_interval()?);
        assert_eq!(None, kit.debug_interval()?);

        let pads = kit.to_pads()?;
        let summary = pads
            .iter()
            .map(|pad| (pad.name(), pad.sensor(), pad.key().as_int(), pad.trigger()))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                ("snare", "A0", 38, Trigger::Below(4060)),
                ("tom 0", "A1", 48, Trigger::Above(3800)),
                ("tom 1", "A3", 47, Trigger::Below(3800)),
                ("floor tom", "A4", 41, Trigger::Below(4000)),
                ("crash cymbal", "A5", 57, Trigger::Above(1800)),
                ("high hat", "D9", 42, Trigger::Touched),
                ("bass", "A2", 36, Trigger::Below(4000)),
            ],
            summary
        );

        for pad in pads.iter() {
            assert_eq!(u7::new(120), pad.velocity());
            assert_eq!(Duration::from_secs(1), pad.hold());
            assert_eq!(Duration::from_millis(100), pad.settle());
        }

        // The bass pad keeps its own color once its note stops.
        let bass = pads.iter().find(|pad| pad.name() == "bass").unwrap();
        assert_eq!(Color::TEAL, bass.hit_color());
        assert_eq!(Color::TEAL, bass.idle_color());
        let snare = pads.iter().find(|pad| pad.name() == "snare").unwrap();
        assert_eq!(Color::WHITE, snare.idle_color());
        Ok(())
    }

    #[test]
    fn test_load_overrides() -> Result<(), Box<dyn Error>> {
        let file = write_kit(
            r#"
            midi:
              device: mock-midi
              channel: 10
            board:
              kind: keyboard
              pins: [T1, T2]
            indicator:
              kind: mock
              pixels: 3
              brightness: 0.25
              idle_color: black
            poll_interval: 5ms
            debug_interval: 100ms
            pads:
              - name: kick
                sensor: T1
                note: 36
                trigger: touched
                hit_color: blue
        "#,
        )?;

        let kit = Kit::load(file.path())?;
        assert_eq!(BoardKind::Keyboard, kit.board().kind());
        assert_eq!(vec!["T1".to_string(), "T2".to_string()], kit.board().pins());
        assert_eq!(IndicatorKind::Mock, kit.indicator().kind());
        assert_eq!(3, kit.indicator().pixels());
        assert_eq!(0.25, kit.indicator().brightness());
        assert_eq!(Duration::from_millis(5), kit.poll_interval()?);
        assert_eq!(Some(Duration::from_millis(100)), kit.debug_interval()?);
        assert_eq!(Color::BLACK, kit.to_pads()?[0].idle_color());
        Ok(())
    }

    #[test]
    fn test_invalid_kits() -> Result<(), Box<dyn Error>> {
        let no_pads = write_kit(
            r#"
            midi:
              device: mock-midi
            pads: []
        "#,
        )?;
        assert!(Kit::load(no_pads.path()).is_err());

        let duplicate_names = write_kit(
            r#"
            midi:
              device: mock-midi
            pads:
              - name: snare
                sensor: A0
                note: 38
                trigger: touched
                hit_color: red
              - name: snare
                sensor: A1
                note: 40
                trigger: touched
                hit_color: red
        "#,
        )?;
        let err = Kit::load(duplicate_names.path()).err().unwrap();
        assert!(err.to_string().contains("'snare' is used more than once"));

        let bad_channel = write_kit(
            r#"
            midi:
              device: mock-midi
              channel: 17
            pads:
              - name: snare
                sensor: A0
                note: 38
                trigger: touched
                hit_color: red
        "#,
        )?;
        assert!(Kit::load(bad_channel.path()).is_err());

        let bad_color = write_kit(
            r#"
            midi:
              device: mock-midi
            pads:
              - name: snare
                sensor: A0
                note: 38
                trigger: touched
                hit_color: chartreuse
        "#,
        )?;
        assert!(Kit::load(bad_color.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_huge_durations_are_rejected_at_load() -> Result<(), Box<dyn Error>> {
        let huge_hold = write_kit(
            r#"
            midi:
              device: mock-midi
            pads:
              - name: snare
                sensor: A0
                note: 38
                trigger:
                  below: 4060
                hold: 500000000000y
                hit_color: red
        "#,
        )?;
        let err = Kit::load(huge_hold.path()).err().unwrap();
        assert!(err.to_string().contains("snare hold"));

        let huge_debug_interval = write_kit(
            r#"
            midi:
              device: mock-midi
            debug_interval: 500000000000y
            pads:
              - name: snare
                sensor: A0
                note: 38
                trigger: touched
                hit_color: red
        "#,
        )?;
        assert!(Kit::load(huge_debug_interval.path()).is_err());
        Ok(())
    }
}
