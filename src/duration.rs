// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Note values (`1/4`, `1/8.`, ...) and their conversion to time.

use snafu::Snafu;

/// Underlying integral type for note values.
type Int = u32;

/// The length of a note as a fraction of a whole note.
/// Both numerator and denominator are always positive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NoteValue {
    num: Int,
    denom: Int,
}

impl NoteValue {
    /// Create a new note value, returning `None` if either part is zero.
    pub fn new(num: Int, denom: Int) -> Option<NoteValue> {
        if num == 0 || denom == 0 {
            None
        } else {
            Some(NoteValue { num, denom })
        }
    }

    /// The fraction as a float, without any rounding beyond the division itself.
    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

/// An error which can be returned when parsing a note value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ParseNoteValueError {
    /// The numerator or denominator is not a (representable) unsigned integer.
    #[snafu(display("not a valid integer"))]
    InvalidInt,
    /// The numerator or denominator was zero.
    #[snafu(display("numerator and denominator must be positive"))]
    Zero,
    /// The value was not of the form `<int>` or `<int>/<int>`.
    #[snafu(display("expected <int> or <int>/<int>"))]
    Malformed,
}

impl std::str::FromStr for NoteValue {
    type Err = ParseNoteValueError;

    /// # Examples
    ///
    /// ```
    /// use cnc_music::duration::*;
    ///
    /// assert_eq!("1/4".parse(), Ok(NoteValue::new(1, 4).unwrap()));
    /// assert_eq!("2".parse(), Ok(NoteValue::new(2, 1).unwrap()));
    /// assert_eq!("1/0".parse::<NoteValue>(), Err(ParseNoteValueError::Zero));
    /// assert_eq!("1/2/3".parse::<NoteValue>(), Err(ParseNoteValueError::Malformed));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let numerator = parse_int(parts.next().unwrap_or(""))?;
        let denominator = match parts.next() {
            Some(denominator_str) => parse_int(denominator_str)?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(ParseNoteValueError::Malformed);
        }
        NoteValue::new(numerator, denominator).ok_or(ParseNoteValueError::Zero)
    }
}

/// Only plain ASCII digits are accepted, no signs.
fn parse_int(s: &str) -> Result<Int, ParseNoteValueError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseNoteValueError::Malformed);
    }
    s.parse().map_err(|_| ParseNoteValueError::InvalidInt)
}

/// The number of dots following a note value, each extending the note
/// by half of the previous extension.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Dots(u8);

impl Dots {
    pub const MAX: u8 = 3;
    pub const NONE: Dots = Dots(0);

    /// Returns `None` for more than [`Dots::MAX`] dots.
    pub fn new(count: usize) -> Option<Dots> {
        if count <= Self::MAX as usize {
            Some(Dots(count as u8))
        } else {
            None
        }
    }

    /// Factor by which the dots lengthen a note.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnc_music::duration::Dots;
    ///
    /// assert_eq!(Dots::NONE.multiplier(), 1.0);
    /// assert_eq!(Dots::new(1).unwrap().multiplier(), 1.5);
    /// assert_eq!(Dots::new(2).unwrap().multiplier(), 1.75);
    /// assert_eq!(Dots::new(3).unwrap().multiplier(), 1.875);
    /// assert_eq!(Dots::new(4), None);
    /// ```
    pub fn multiplier(self) -> f64 {
        match self.0 {
            0 => 1.0,
            1 => 1.5,
            2 => 1.75,
            _ => 1.875,
        }
    }
}

/// Duration of a note in seconds.
///
/// A whole note lasts `1 / (60 * tempo)` seconds, so a higher tempo gives shorter notes.
pub fn resolve(value: NoteValue, dots: Dots, tempo: f64) -> f64 {
    value.as_f64() * dots.multiplier() * (1.0 / (60.0 * tempo))
}
