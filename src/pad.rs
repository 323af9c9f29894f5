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
    collections::VecDeque,
    fmt,
    time::{Duration, Instant},
};

use midly::num::u7;
use serde::Deserialize;

use crate::indicator::Color;

/// A single sample from a touch sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// The raw capacitance count reported by the sensor.
    Raw(u16),
    /// The sensor's own touched/not touched decision.
    Touched(bool),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Raw(value) => write!(f, "{}", value),
            Reading::Touched(touched) => write!(f, "{}", touched),
        }
    }
}

/// Decides whether a reading counts as a hit. The polarity is a per-pad calibration choice:
/// some sensors drop below their cutoff when touched, others rise above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Hit when the raw reading is strictly below the cutoff.
    Below(u16),
    /// Hit when the raw reading is strictly above the cutoff.
    Above(u16),
    /// Hit when the sensor itself reports a touch.
    Touched,
}

impl Trigger {
    /// Applies the trigger to a reading. A reading of the wrong kind never counts as a hit.
    pub fn is_hit(&self, reading: Reading) -> bool {
        match (self, reading) {
            (Trigger::Below(cutoff), Reading::Raw(value)) => value < *cutoff,
            (Trigger::Above(cutoff), Reading::Raw(value)) => value > *cutoff,
            (Trigger::Touched, Reading::Touched(touched)) => touched,
            _ => false,
        }
    }

    /// A reading that this trigger treats as a hit, for simulated sensors.
    pub fn touched_reading(&self) -> Reading {
        match self {
            Trigger::Below(cutoff) => Reading::Raw(cutoff.saturating_sub(1)),
            Trigger::Above(cutoff) => Reading::Raw(cutoff.saturating_add(1)),
            Trigger::Touched => Reading::Touched(true),
        }
    }

    /// A reading that this trigger treats as untouched, for simulated sensors.
    pub fn idle_reading(&self) -> Reading {
        match self {
            Trigger::Below(cutoff) => Reading::Raw(*cutoff),
            Trigger::Above(cutoff) => Reading::Raw(*cutoff),
            Trigger::Touched => Reading::Touched(false),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Below(cutoff) => write!(f, "< {}", cutoff),
            Trigger::Above(cutoff) => write!(f, "> {}", cutoff),
            Trigger::Touched => write!(f, "touched"),
        }
    }
}

/// What the dispatch loop should do on behalf of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NoAction,
    /// Send a note on and fill the indicator with the hit color.
    Fire { key: u7, velocity: u7, color: Color },
    /// Send a note off and fill the indicator with the idle color.
    Stop { key: u7, velocity: u7, color: Color },
}

/// One physical drum trigger: a sensor binding, a fixed note, and the state machine that turns
/// touches into note on/note off pairs.
#[derive(Debug, Clone)]
pub struct Pad {
    name: String,
    sensor: String,
    key: u7,
    velocity: u7,
    trigger: Trigger,
    hold: Duration,
    settle: Duration,
    hit_color: Color,
    idle_color: Color,

    /// True when the pad may fire on the current evaluation.
    armed: bool,
    /// When the pad last fired. Blocks new hits until the settle interval passes.
    last_fire: Option<Instant>,
    /// Note off deadlines, one per outstanding hit, oldest first.
    deadlines: VecDeque<Instant>,
}

impl Pad {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        sensor: &str,
        key: u7,
        velocity: u7,
        trigger: Trigger,
        hold: Duration,
        settle: Duration,
        hit_color: Color,
        idle_color: Color,
    ) -> Pad {
        Pad {
            name: name.to_string(),
            sensor: sensor.to_string(),
            key,
            velocity,
            trigger,
            hold,
            settle,
            hit_color,
            idle_color,
            armed: true,
            last_fire: None,
            deadlines: VecDeque::new(),
        }
    }

    /// Gets the name of the pad.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the id of the sensor the pad reads from.
    pub fn sensor(&self) -> &str {
        &self.sensor
    }

    pub fn key(&self) -> u7 {
        self.key
    }

    pub fn velocity(&self) -> u7 {
        self.velocity
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn hit_color(&self) -> Color {
        self.hit_color
    }

    pub fn idle_color(&self) -> Color {
        self.idle_color
    }

    /// Returns true if the pad will consider its next reading.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns true if a note off is still owed.
    pub fn is_active(&self) -> bool {
        !self.deadlines.is_empty()
    }

    /// Returns the earliest pending note off deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadlines.front().copied()
    }

    /// Checks the reading against the trigger. On a hit, records the note off deadline and tells
    /// the caller to fire.
    pub fn evaluate(&mut self, reading: Option<Reading>, now: Instant) -> Action {
        if !self.armed || self.settling(now) {
            return Action::NoAction;
        }

        let hit = reading.is_some_and(|reading| self.trigger.is_hit(reading));
        if !hit {
            return Action::NoAction;
        }

        self.armed = false;
        self.last_fire = Some(now);
        self.deadlines.push_back(now + self.hold);
        self.armed = true;

        Action::Fire {
            key: self.key,
            velocity: self.velocity,
            color: self.hit_color,
        }
    }

    /// Releases the oldest note once its deadline has strictly passed.
    pub fn check_expiry(&mut self, now: Instant) -> Action {
        match self.deadlines.front() {
            Some(deadline) if now > *deadline => {
                self.deadlines.pop_front();
                Action::Stop {
                    key: self.key,
                    velocity: self.velocity,
                    color: self.idle_color,
                }
            }
            _ => Action::NoAction,
        }
    }

    /// Releases the oldest note regardless of its deadline. Used when shutting down.
    pub fn release(&mut self) -> Action {
        match self.deadlines.pop_front() {
            Some(_) => Action::Stop {
                key: self.key,
                velocity: self.velocity,
                color: self.idle_color,
            },
            None => Action::NoAction,
        }
    }

    fn settling(&self, now: Instant) -> bool {
        self.last_fire
            .is_some_and(|last_fire| now < last_fire + self.settle)
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (sensor: {}, note: {}, velocity: {}, trigger: {}, hold: {:?}, colors: {}/{})",
            self.name,
            self.sensor,
            self.key.as_int(),
            self.velocity.as_int(),
            self.trigger,
            self.hold,
            self.hit_color,
            self.idle_color,
        )
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use midly::num::u7;

    use crate::indicator::Color;

    use super::{Action, Pad, Reading, Trigger};

    fn snare(settle: Duration) -> Pad {
        Pad::new(
            "snare",
            "A0",
            u7::new(38),
            u7::new(120),
            Trigger::Below(4060),
            Duration::from_secs(1),
            settle,
            Color::RED,
            Color::WHITE,
        )
    }

    fn fire() -> Action {
        Action::Fire {
            key: u7::new(38),
            velocity: u7::new(120),
            color: Color::RED,
        }
    }

    fn stop() -> Action {
        Action::Stop {
            key: u7::new(38),
            velocity: u7::new(120),
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_trigger_polarity() {
        assert!(Trigger::Below(4060).is_hit(Reading::Raw(4000)));
        assert!(!Trigger::Below(4060).is_hit(Reading::Raw(4060)));
        assert!(Trigger::Above(1800).is_hit(Reading::Raw(1801)));
        assert!(!Trigger::Above(1800).is_hit(Reading::Raw(1800)));
        assert!(Trigger::Touched.is_hit(Reading::Touched(true)));
        assert!(!Trigger::Touched.is_hit(Reading::Touched(false)));

        // Readings of the wrong kind are never hits.
        assert!(!Trigger::Touched.is_hit(Reading::Raw(0)));
        assert!(!Trigger::Below(4060).is_hit(Reading::Touched(true)));
    }

    #[test]
    fn test_simulated_readings() {
        for trigger in [
            Trigger::Below(4060),
            Trigger::Above(3800),
            Trigger::Touched,
        ] {
            assert!(trigger.is_hit(trigger.touched_reading()), "{}", trigger);
            assert!(!trigger.is_hit(trigger.idle_reading()), "{}", trigger);
        }
    }

    #[test]
    fn test_scenario_fire_then_expire() {
        let start = Instant::now();
        let mut pad = snare(Duration::ZERO);
        let readings = [4100, 4100, 4000, 4100];

        let mut fired_at = None;
        for (second, reading) in readings.into_iter().enumerate() {
            let now = start + Duration::from_secs(second as u64);
            let action = pad.evaluate(Some(Reading::Raw(reading)), now);
            if action == fire() {
                fired_at = Some(second);
            }
            // Checking expiry at t=3 must not stop the note: the deadline is t=3 and the
            // comparison is strict.
            assert_eq!(Action::NoAction, pad.check_expiry(now));
        }

        assert_eq!(Some(2), fired_at);
        assert!(pad.is_active());
        assert_eq!(Some(start + Duration::from_secs(3)), pad.deadline());

        let after = start + Duration::from_millis(3001);
        assert_eq!(stop(), pad.check_expiry(after));
        assert!(!pad.is_active());
        assert_eq!(None, pad.deadline());
        assert_eq!(Action::NoAction, pad.check_expiry(after));
    }

    #[test]
    fn test_no_reading_is_not_a_hit() {
        let mut pad = snare(Duration::ZERO);
        assert_eq!(Action::NoAction, pad.evaluate(None, Instant::now()));
        assert!(!pad.is_active());
        assert!(pad.is_armed());
    }

    #[test]
    fn test_armed_is_restored_after_fire() {
        let mut pad = snare(Duration::ZERO);
        assert_eq!(fire(), pad.evaluate(Some(Reading::Raw(0)), Instant::now()));
        assert!(pad.is_armed());
    }

    #[test]
    fn test_held_touch_refires_each_settle_interval() {
        let start = Instant::now();
        let mut pad = snare(Duration::from_millis(100));

        // Held for 350ms, polled every 10ms.
        let fires = (0..35)
            .map(|cycle| start + Duration::from_millis(cycle * 10))
            .filter(|now| pad.evaluate(Some(Reading::Raw(0)), *now) == fire())
            .count();

        // Fires at 0, 100, 200 and 300ms.
        assert_eq!(4, fires);
    }

    #[test]
    fn test_held_touch_without_settle_fires_every_cycle() {
        let start = Instant::now();
        let mut pad = snare(Duration::ZERO);

        for cycle in 0..5 {
            let now = start + Duration::from_millis(cycle);
            assert_eq!(fire(), pad.evaluate(Some(Reading::Raw(0)), now));
        }
    }

    #[test]
    fn test_each_hit_gets_its_own_note_off() {
        let start = Instant::now();
        let mut pad = snare(Duration::ZERO);

        assert_eq!(fire(), pad.evaluate(Some(Reading::Raw(0)), start));
        let second = start + Duration::from_millis(500);
        assert_eq!(fire(), pad.evaluate(Some(Reading::Raw(0)), second));

        // The first deadline is untouched by the second hit.
        assert_eq!(Some(start + Duration::from_secs(1)), pad.deadline());

        let first_off = start + Duration::from_millis(1001);
        assert_eq!(stop(), pad.check_expiry(first_off));
        assert_eq!(Action::NoAction, pad.check_expiry(first_off));
        assert!(pad.is_active());

        let second_off = start + Duration::from_millis(1501);
        assert_eq!(stop(), pad.check_expiry(second_off));
        assert!(!pad.is_active());
    }

    #[test]
    fn test_boolean_trigger_ignores_untouched_readings() {
        let start = Instant::now();
        let mut pad = Pad::new(
            "high hat",
            "D9",
            u7::new(42),
            u7::new(120),
            Trigger::Touched,
            Duration::from_secs(1),
            Duration::ZERO,
            Color::GREEN,
            Color::WHITE,
        );

        for cycle in 0..10 {
            let now = start + Duration::from_millis(cycle * 10);
            assert_eq!(
                Action::NoAction,
                pad.evaluate(Some(Reading::Touched(false)), now)
            );
        }
        assert!(!pad.is_active());

        let now = start + Duration::from_millis(200);
        assert_eq!(
            Action::Fire {
                key: u7::new(42),
                velocity: u7::new(120),
                color: Color::GREEN,
            },
            pad.evaluate(Some(Reading::Touched(true)), now)
        );
    }

    #[test]
    fn test_release() {
        let mut pad = snare(Duration::ZERO);
        assert_eq!(Action::NoAction, pad.release());
        pad.evaluate(Some(Reading::Raw(0)), Instant::now());
        assert_eq!(stop(), pad.release());
        assert!(!pad.is_active());
    }
}
