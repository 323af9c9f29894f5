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
use std::{error::Error, time::Duration};

use duration_string::DurationString;
use tracing::info;

use crate::{
    dispatch::{BoundPad, DispatchLoop},
    sensor::{self, Board as _},
};

mod board;
pub mod error;
mod indicator;
mod kit;
mod midi;
mod pad;

pub use self::board::{Board, BoardKind};
pub use self::error::ConfigError;
pub use self::indicator::{Indicator, IndicatorKind};
pub use self::kit::Kit;
pub use self::midi::Midi;
pub use self::pad::Pad;

/// Parses an optional duration string, falling back to the default when unset.
fn parse_duration(
    field: &str,
    value: &Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => duration_from_str(field, value),
        None => Ok(default),
    }
}

/// The longest duration a kit may configure. Deadlines are computed by adding durations to
/// the current instant, which must not overflow.
const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Parses a duration string such as "1s" or "100ms".
fn duration_from_str(field: &str, value: &str) -> Result<Duration, ConfigError> {
    let duration: Duration = DurationString::from_string(value.to_string())
        .map_err(|e| ConfigError::Duration {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })?
        .into();

    if duration > MAX_DURATION {
        return Err(ConfigError::Duration {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("must be at most {:?}", MAX_DURATION),
        });
    }
    Ok(duration)
}

/// Binds every pad in the kit to its sensor on the given board, keeping the kit's order.
pub fn bind_pads(kit: &Kit, board: &dyn sensor::Board) -> Result<Vec<BoundPad>, Box<dyn Error>> {
    let mut bound = Vec::with_capacity(kit.pads().len());
    for pad in kit.to_pads()? {
        let sensor = board.sensor(pad.sensor(), pad.trigger())?;
        bound.push(BoundPad::new(pad, sensor));
    }
    Ok(bound)
}

/// Builds the dispatch loop for the given kit. Any misconfiguration, including a pad bound to
/// a sensor the board doesn't have, fails here before a single poll happens.
pub fn init_dispatch(kit: &Kit) -> Result<DispatchLoop, Box<dyn Error>> {
    let board = sensor::get_board(&kit.board());
    let pads = bind_pads(kit, board.as_ref())?;
    let device = crate::midi::get_device(kit.midi())?;
    let indicator = crate::indicator::get_indicator(&kit.indicator());

    info!(
        board = board.to_string(),
        device = device.to_string(),
        indicator = indicator.to_string(),
        pads = pads.len(),
        "Kit initialized."
    );

    let mut dispatch =
        DispatchLoop::new(pads, device, indicator).with_poll_interval(kit.poll_interval()?);
    if let Some(interval) = kit.debug_interval()? {
        dispatch = dispatch.with_diagnostics(interval, Box::new(std::io::stdout()));
    }
    Ok(dispatch)
}

#[cfg(test)]
mod test {
    use std::{error::Error, path::PathBuf, time::Duration};

    use crate::{
        pad::Trigger,
        sensor::{self, Board as _},
    };

    use super::{bind_pads, duration_from_str, init_dispatch, Kit, MAX_DURATION};

    #[test]
    fn test_init_bundled_kit() -> Result<(), Box<dyn Error>> {
        let kit = Kit::load(&PathBuf::from("assets/kit.yaml"))?;
        let dispatch = init_dispatch(&kit)?;
        assert_eq!(7, dispatch.pads().count());
        Ok(())
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(
            Duration::from_millis(100),
            duration_from_str("hold", "100ms").unwrap()
        );
        assert_eq!(MAX_DURATION, duration_from_str("hold", "24h").unwrap());
        assert!(duration_from_str("hold", "25h").is_err());

        let err = duration_from_str("snare hold", "500000000000y").err().unwrap();
        assert!(err
            .to_string()
            .starts_with("invalid duration '500000000000y' for snare hold"));
    }

    #[test]
    fn test_bind_pads_unknown_sensor() -> Result<(), Box<dyn Error>> {
        let kit = Kit::load(&PathBuf::from("assets/kit.yaml"))?;
        let board = sensor::test::Board::new(vec!["A0".to_string()]);

        let err = bind_pads(&kit, &board).err().unwrap();
        assert!(err.to_string().starts_with("unknown sensor 'A1'"));
        Ok(())
    }

    #[test]
    fn test_bind_pads_shared_sensor() -> Result<(), Box<dyn Error>> {
        let kit = Kit::load(&PathBuf::from("assets/kit.yaml"))?;
        let board = sensor::test::Board::new(vec!["A0".to_string()]);
        board.sensor("A0", Trigger::Touched)?;

        let err = bind_pads(&kit, &board).err().unwrap();
        assert_eq!("sensor 'A0' is already bound to another pad", err.to_string());
        Ok(())
    }
}
