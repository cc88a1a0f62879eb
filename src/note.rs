// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The note table, mapping note names to frequencies.
//!
//! Notes are written as `<letter><octave><offset>`, e.g. `C4`, `C4#` or `D4b`,
//! where the offset is `#` for a sharp and `b` for a flat.
//! The table follows the equal-tempered scale at concert pitch (A4 = 440 Hz)
//! and covers the three octaves from C3 to B5.

use std::fmt;

/// The token designating a rest.
pub const REST: &str = "0";

/// Frequencies in Hz, rounded to two decimals.
/// A sharp and the flat of the next note share their frequency.
const FREQUENCIES: &[(&str, f64)] = &[
    (REST, 0.0),
    ("C3", 130.81),
    ("C3#", 138.59),
    ("D3b", 138.59),
    ("D3", 146.83),
    ("D3#", 155.56),
    ("E3b", 155.56),
    ("E3", 164.81),
    ("F3", 174.61),
    ("F3#", 185.00),
    ("G3b", 185.00),
    ("G3", 196.00),
    ("G3#", 207.65),
    ("A3b", 207.65),
    ("A3", 220.00),
    ("A3#", 233.08),
    ("B3b", 233.08),
    ("B3", 246.94),
    ("C4", 261.63),
    ("C4#", 277.18),
    ("D4b", 277.18),
    ("D4", 293.66),
    ("D4#", 311.13),
    ("E4b", 311.13),
    ("E4", 329.63),
    ("F4", 349.23),
    ("F4#", 369.99),
    ("G4b", 369.99),
    ("G4", 392.00),
    ("G4#", 415.30),
    ("A4b", 415.30),
    ("A4", 440.00),
    ("A4#", 466.16),
    ("B4b", 466.16),
    ("B4", 493.88),
    ("C5", 523.25),
    ("C5#", 554.37),
    ("D5b", 554.37),
    ("D5", 587.33),
    ("D5#", 622.25),
    ("E5b", 622.25),
    ("E5", 659.25),
    ("F5", 698.46),
    ("F5#", 739.99),
    ("G5b", 739.99),
    ("G5", 783.99),
    ("G5#", 830.61),
    ("A5b", 830.61),
    ("A5", 880.00),
    ("A5#", 932.33),
    ("B5b", 932.33),
    ("B5", 987.77),
];

/// The token was not found in the note table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNote {
    pub token: String,
}

impl fmt::Display for UnknownNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown note {:?}", self.token)
    }
}

impl std::error::Error for UnknownNote {}

/// Return the frequency of a note token, or `None` if the note is not part of the table.
///
/// # Examples
///
/// ```
/// use cnc_music::note;
///
/// assert_eq!(note::frequency("A4"), Some(440.0));
/// assert_eq!(note::frequency("C4#"), note::frequency("D4b"));
/// assert_eq!(note::frequency(note::REST), Some(0.0));
/// assert_eq!(note::frequency("H4"), None);
/// ```
pub fn frequency(token: &str) -> Option<f64> {
    FREQUENCIES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, freq)| *freq)
}

/// Like [`frequency`], but failing with an error naming the offending token.
pub fn lookup(token: &str) -> Result<f64, UnknownNote> {
    frequency(token).ok_or_else(|| UnknownNote {
        token: token.to_owned(),
    })
}

/// Whether a frequency designates a rest rather than a tone.
pub fn is_rest(frequency: f64) -> bool {
    frequency == 0.0
}

/// All tokens of the note table together with their frequency, in ascending pitch.
pub fn tokens() -> impl Iterator<Item = (&'static str, f64)> {
    FREQUENCIES.iter().copied()
}
