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

use parking_lot::Mutex;
use tracing::info;

use super::{Color, Strip};

/// An indicator that reports fills through the log. Useful when running on a host
/// without an LED strip attached.
pub struct Indicator {
    strip: Strip,
    current: Mutex<Option<Color>>,
}

impl Indicator {
    pub fn new(strip: Strip) -> Indicator {
        Indicator {
            strip,
            current: Mutex::new(None),
        }
    }
}

impl super::Indicator for Indicator {
    fn set_all(&self, color: Color) -> Result<(), Box<dyn Error>> {
        let pixels = self.strip.fill(color);
        let mut current = self.current.lock();

        // Repeated fills with the same color are common when several pads expire together.
        if *current == Some(color) {
            return Ok(());
        }
        *current = Some(color);

        info!(
            color = color.to_string(),
            shown = pixels.first().copied().unwrap_or(Color::BLACK).to_string(),
            pixels = pixels.len(),
            "Indicator filled."
        );
        Ok(())
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "log ({} pixels, brightness {})",
            self.strip.pixels(),
            self.strip.brightness()
        )
    }
}

#[cfg(test)]
mod test {
    use crate::indicator::{Color, Indicator as _, Strip};

    use super::Indicator;

    #[test]
    fn test_set_all_tracks_current_color() {
        let indicator = Indicator::new(Strip::new(7, 0.5));
        assert!(indicator.set_all(Color::RED).is_ok());
        assert_eq!(Some(Color::RED), *indicator.current.lock());
        assert!(indicator.set_all(Color::WHITE).is_ok());
        assert_eq!(Some(Color::WHITE), *indicator.current.lock());
        assert_eq!("log (7 pixels, brightness 0.5)", indicator.to_string());
    }
}
