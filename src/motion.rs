// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Turning notes into motion.
//!
//! A stepper motor moving at a constant speed emits a tone whose frequency is its step rate.
//! A tone is therefore played by moving the X axis for the duration of the note, with a feed
//! rate chosen so that the step rate matches the frequency of the note. Rests are played by
//! dwelling.
//!
//! The axis goes back and forth between 0 and the axis limit: whenever a move would leave
//! that range, the direction of travel is reversed.

use log::{debug, warn};

use crate::config::Config;
use crate::gcode::Command;
use crate::note;

/// Direction of travel along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the axis limit.
    Forward,
    /// Towards zero.
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Where the axis currently is, and where it is heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub position: f64,
    pub direction: Direction,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState {
            position: 0.0,
            direction: Direction::Forward,
        }
    }
}

/// Translates notes into commands, keeping track of the axis position.
pub struct Translator {
    axis_limit: f64,
    feed_rate_scale: f64,
    state: PlaybackState,
}

impl Translator {
    pub fn new(config: &Config) -> Self {
        Self {
            axis_limit: config.axis_limit,
            feed_rate_scale: config.feed_rate_scale(),
            state: PlaybackState::default(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Feed rate in mm/min at which the motor sings at `frequency`.
    /// Truncated towards zero.
    pub fn feed_rate(&self, frequency: f64) -> u64 {
        (frequency / self.feed_rate_scale) as u64
    }

    /// Translate a note of the given frequency (Hz) and duration, as computed by
    /// [`crate::duration::resolve`]. A frequency of zero is a rest.
    pub fn translate(&mut self, frequency: f64, duration: f64) -> Command {
        if note::is_rest(frequency) {
            return Command::Dwell {
                millis: (duration * 1000.0).round(),
            };
        }

        let feed_rate = self.feed_rate(frequency);
        let mut distance = self.state.direction.sign() * (feed_rate as f64 * duration);
        let mut projected = self.state.position + distance;

        // A single bounce per note: the reversed move is not checked again.
        if projected > self.axis_limit {
            self.state.direction = Direction::Backward;
            distance = -distance;
            projected = self.state.position + distance;
        } else if projected < 0.0 {
            self.state.direction = Direction::Forward;
            distance = -distance;
            projected = self.state.position + distance;
        }

        if projected < 0.0 || projected > self.axis_limit {
            warn!(
                "move of {:.2} mm leaves the axis range (0 - {} mm), ending at {:.2}",
                distance, self.axis_limit, projected
            );
        }
        debug!(
            "{:.2} Hz for {:.4} s: {:.2} mm at F{}, at {:.2} mm",
            frequency, duration, distance, feed_rate, projected
        );

        self.state.position = projected;
        Command::Feed {
            distance,
            feed_rate,
        }
    }

    /// The rapid move returning the axis to where it started.
    pub fn finish(self) -> Command {
        // `0.0 - x` instead of `-x` so that a position of zero doesn't print as `-0.00`.
        Command::Rapid {
            distance: 0.0 - self.state.position,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn translator(steps_per_unit: u32, axis_limit: f64) -> Translator {
        Translator::new(&Config {
            steps_per_unit,
            axis_limit,
            tempo: 1.0,
        })
    }

    fn feed_distance(command: Command) -> f64 {
        match command {
            Command::Feed { distance, .. } => distance,
            other => panic!("expected a feed, got {:?}", other),
        }
    }

    #[test]
    fn middle_c_quarter() {
        let mut t = translator(100, 100.0);
        let duration = 0.25 / 60.0;
        let cmd = t.translate(261.63, duration);
        assert_eq!(cmd.to_string(), "G01 X1.82 F436");
        assert!((t.state().position - 436.0 * duration).abs() < 1e-12);
        assert_eq!(t.state().direction, Direction::Forward);
        assert_eq!(t.finish().to_string(), "G00 X-1.82");
    }

    #[test]
    fn feed_rate_truncates() {
        let t = translator(100, 100.0);
        // 261.63 / 0.6 = 436.05
        assert_eq!(t.feed_rate(261.63), 436);
        // 987.77 / 0.6 = 1646.28
        assert_eq!(t.feed_rate(987.77), 1646);
        assert_eq!(translator(200, 100.0).feed_rate(440.0), 1466);
        // fine resolution drives make for feed rates beyond 32 bits
        assert_eq!(
            translator(1_000_000_000, 100.0).feed_rate(987.77),
            16_462_833_333
        );
    }

    #[test]
    fn rests_dwell() {
        let mut t = translator(100, 100.0);
        assert_eq!(
            t.translate(0.0, 1.0 / 60.0),
            Command::Dwell { millis: 17.0 }
        );
        // rounding half away from zero
        assert_eq!(t.translate(0.0, 0.0125), Command::Dwell { millis: 13.0 });
        assert_eq!(t.state(), PlaybackState::default());
    }

    #[test]
    fn bounce_at_limit() {
        // 440 Hz at 100 steps/mm is F733, a whole note travels 733 / 60 mm.
        let mut t = translator(100, 20.0);
        let whole = 1.0 / 60.0;
        let step = 733.0 / 60.0;

        assert!((feed_distance(t.translate(440.0, whole)) - step).abs() < 1e-9);
        assert_eq!(t.state().direction, Direction::Forward);

        // 2 * step would exceed 20 mm
        assert!((feed_distance(t.translate(440.0, whole)) + step).abs() < 1e-9);
        assert_eq!(t.state().direction, Direction::Backward);
        assert!(t.state().position.abs() < 1e-9);

        // below zero, back up again
        assert!((feed_distance(t.translate(440.0, whole)) - step).abs() < 1e-9);
        assert_eq!(t.state().direction, Direction::Forward);
    }

    #[test]
    fn stays_within_axis() {
        // no single note travels more than half the axis
        let mut t = translator(80, 30.0);
        let notes = [261.63, 293.66, 329.63, 349.23, 392.0, 440.0, 493.88, 523.25];
        let mut direction = t.state().direction;
        for (i, freq) in notes.iter().cycle().take(200).enumerate() {
            let before = t.state();
            let duration = (1 + i % 4) as f64 / 240.0;
            let distance = feed_distance(t.translate(*freq, duration));
            let after = t.state();

            assert!(after.position >= 0.0 && after.position <= 30.0);
            assert!((after.position - before.position - distance).abs() < 1e-9);

            // the direction only changes if going on would have left the axis
            if after.direction != direction {
                let unbounced = before.position + before.direction.sign() * distance.abs();
                assert!(unbounced < 0.0 || unbounced > 30.0);
                direction = after.direction;
            }
        }
    }

    #[test]
    fn single_bounce_can_overshoot() {
        // A single note longer than the whole axis can't be contained. The move is reversed
        // once and the result is accepted even though it lies outside of the axis.
        let mut t = translator(100, 1.0);
        let distance = feed_distance(t.translate(440.0, 1.0));
        assert!(distance < 0.0);
        assert_eq!(t.state().direction, Direction::Backward);
        assert!(t.state().position < 0.0);
    }

    #[test]
    fn return_to_origin() {
        let t = translator(100, 100.0);
        assert_eq!(t.finish().to_string(), "G00 X0.00");

        let mut t = translator(100, 100.0);
        t.translate(440.0, 0.5 / 60.0);
        t.translate(0.0, 0.5 / 60.0);
        t.translate(523.25, 0.25 / 60.0);
        let position = t.state().position;
        assert_eq!(t.finish(), Command::Rapid { distance: -position });
    }
}
