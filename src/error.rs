// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Errors aborting the translation of a score.

use std::io;
use std::path::PathBuf;

use snafu::Snafu;

use crate::score::ParseLineError;

/// Everything that can go wrong while turning a score into G-code.
/// None of these are recoverable, the translation stops at the first error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to find the sequence file: {}", path.display()))]
    FileNotFound { path: PathBuf },

    #[snafu(display("Unable to open the sequence file: {}: {}", path.display(), source))]
    FileUnreadable { path: PathBuf, source: io::Error },

    #[snafu(display("Unable to read line {}: {}", line, source))]
    ReadScore { line: usize, source: io::Error },

    #[snafu(display("Unable to parse line {} ({}): {}", line, text, source))]
    Parse {
        line: usize,
        text: String,
        source: ParseLineError,
    },

    #[snafu(display("Unknown note {:?} in line {} ({})", token, line, text))]
    UnknownNote {
        line: usize,
        text: String,
        token: String,
    },

    #[snafu(display("Invalid configuration: {}", reason))]
    InvalidConfig { reason: String },

    #[snafu(display("Unable to create the output file: {}: {}", path.display(), source))]
    CreateOutput { path: PathBuf, source: io::Error },

    #[snafu(display("Unable to write G-code: {}", source))]
    WriteOutput { source: io::Error },
}

impl Error {
    /// The 1-based number of the line that caused the error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::ReadScore { line, .. }
            | Error::Parse { line, .. }
            | Error::UnknownNote { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
