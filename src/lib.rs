// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Compiling scores into G-code that makes the stepper motors of a CNC machine sing.

pub mod config;
pub mod duration;
pub mod error;
pub mod gcode;
pub mod motion;
pub mod note;
pub mod output;
pub mod score;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::info;
use snafu::ResultExt;

pub use config::Config;
pub use error::{Error, Result};
pub use output::Sink;

use error::WriteOutput;
use gcode::Emitter;
use motion::Translator;

/// Statistics about a compiled score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Number of notes and rests.
    pub events: usize,
    pub tones: usize,
    pub rests: usize,
    /// Total duration of all notes and rests.
    pub seconds: f64,
    /// Furthest position the axis reached.
    pub max_position: f64,
    /// Number of G-code commands written, including the setup and the return move.
    pub commands: usize,
}

/// Compile a score, read line by line, into G-code written to `sink`.
///
/// Stops at the first error. Commands emitted up to that point remain in the sink,
/// but the final return to the origin is only emitted if the whole score was translated.
pub fn compile<R: BufRead, S: Sink>(score: R, config: &Config, sink: S) -> Result<(S, Summary)> {
    config.validate()?;

    let mut emitter = Emitter::new(sink).context(WriteOutput)?;
    let mut translator = Translator::new(config);
    let mut summary = Summary::default();

    for line in score::Lines::new(score) {
        let line = line?;
        let event = &line.event;
        let frequency = note::lookup(&event.token).map_err(|err| Error::UnknownNote {
            line: line.number,
            text: line.text.clone(),
            token: err.token,
        })?;
        let seconds = duration::resolve(event.value, event.dots, config.tempo);

        let command = translator.translate(frequency, seconds);
        emitter.emit(&command).context(WriteOutput)?;

        summary.events += 1;
        if note::is_rest(frequency) {
            summary.rests += 1;
        } else {
            summary.tones += 1;
        }
        summary.seconds += seconds;
        summary.max_position = summary.max_position.max(translator.state().position);
    }

    emitter
        .emit(&translator.finish())
        .context(WriteOutput)?;
    summary.commands = emitter.emitted();
    let sink = emitter.finish().context(WriteOutput)?;

    info!(
        "{} notes ({} tones, {} rests), {:.3} seconds, furthest position {:.2}",
        summary.events, summary.tones, summary.rests, summary.seconds, summary.max_position
    );
    info!("{} commands written", summary.commands);
    Ok((sink, summary))
}

/// Like [`compile`], but reading the score from a file.
pub fn compile_file<S: Sink>(path: &Path, config: &Config, sink: S) -> Result<(S, Summary)> {
    let file = File::open(path).map_err(|err| open_error(path, err))?;
    info!("compiling {}", path.display());
    compile(BufReader::new(file), config, sink)
}

/// A missing score gets its own error, everything else keeps the I/O error around.
fn open_error(path: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::FileNotFound { path: path.into() }
    } else {
        Error::FileUnreadable {
            path: path.into(),
            source: err,
        }
    }
}

/// Compile a score held in memory, returning the G-code lines.
pub fn compile_str(source: &str, config: &Config) -> Result<Vec<String>> {
    compile(source.as_bytes(), config, Vec::new()).map(|(lines, _)| lines)
}
