// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Machine and playback parameters.

use crate::error::{Error, Result};

/// Parameters of a single run, fixed for the whole score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// How many motor steps move the X axis by one unit (mm).
    pub steps_per_unit: u32,
    /// The X axis travels between 0 and this value (mm).
    pub axis_limit: f64,
    /// Multiplier applied to the speed of the music.
    pub tempo: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            steps_per_unit: 100,
            axis_limit: 100.0,
            tempo: 1.0,
        }
    }
}

impl Config {
    /// Check that all parameters are positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_unit == 0 {
            return invalid("steps per unit must be positive");
        }
        if !(self.axis_limit.is_finite() && self.axis_limit > 0.0) {
            return invalid(format!("axis limit must be positive, got {}", self.axis_limit));
        }
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return invalid(format!("tempo must be positive, got {}", self.tempo));
        }
        Ok(())
    }

    /// Conversion factor between feed rate (mm/min) and frequency (Hz):
    /// `feed_rate = frequency / feed_rate_scale`.
    pub fn feed_rate_scale(&self) -> f64 {
        60.0 / self.steps_per_unit as f64
    }
}

fn invalid<S: Into<String>>(reason: S) -> Result<()> {
    Err(Error::InvalidConfig {
        reason: reason.into(),
    })
}
