// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The subset of G-code needed for making music.

use std::fmt;
use std::io;

use crate::output::Sink;

/// A single G-code command. Distances are in mm, relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `G91`: interpret all following coordinates as relative.
    Incremental,
    /// `G04`: pause for the given number of milliseconds.
    Dwell { millis: f64 },
    /// `G01`: linear move along X at a feed rate in mm/min.
    Feed { distance: f64, feed_rate: u64 },
    /// `G00`: rapid move along X.
    Rapid { distance: f64 },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Incremental => write!(f, "G91"),
            Command::Dwell { millis } => write!(f, "G04 P{:.2}", millis),
            Command::Feed {
                distance,
                feed_rate,
            } => write!(f, "G01 X{:.2} F{}", distance, feed_rate),
            Command::Rapid { distance } => write!(f, "G00 X{:.2}", distance),
        }
    }
}

/// Formats commands and hands them to the sink.
/// The machine is switched to relative positioning before anything else is written.
pub struct Emitter<S> {
    sink: S,
    emitted: usize,
}

impl<S: Sink> Emitter<S> {
    pub fn new(sink: S) -> io::Result<Self> {
        let mut emitter = Self { sink, emitted: 0 };
        emitter.emit(&Command::Incremental)?;
        Ok(emitter)
    }

    pub fn emit(&mut self, command: &Command) -> io::Result<()> {
        self.sink.write_line(&command.to_string())?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of commands written so far, including the initial `G91`.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Flush the sink and give it back.
    pub fn finish(mut self) -> io::Result<S> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
