// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Parsing of score files.
//!
//! A score contains one note per line, written as the note name followed by
//! the note value and optional dots, e.g. `C4 1/4.`. The rest is written as `0`.
//! Lines starting with `#` are comments, blank lines are ignored,
//! and anything following the dots is ignored as well.

use std::io::{self, BufRead};

use snafu::{ResultExt, Snafu};

use crate::duration::{Dots, NoteValue, ParseNoteValueError};
use crate::error::{Error, ReadScore};

/// A single note (or rest) of the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    /// Name of the note, to be looked up in the note table.
    pub token: String,
    pub value: NoteValue,
    pub dots: Dots,
}

/// Classification of a single line of a score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Comment or blank line.
    Skip,
    Note(NoteEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseLineError {
    #[snafu(display("expected a note followed by a note value"))]
    MissingDuration,
    #[snafu(display("invalid note value {:?}: {}", value, source))]
    MalformedDuration {
        value: String,
        source: ParseNoteValueError,
    },
    #[snafu(display("a note can't have more than {} dots, found {}", Dots::MAX, dots))]
    TooManyDots { dots: usize },
}

/// Parse a single line of a score.
pub fn parse_line(raw: &str) -> Result<Line, ParseLineError> {
    if raw.starts_with('#') {
        return Ok(Line::Skip);
    }
    let line = raw.trim();
    if line.is_empty() {
        return Ok(Line::Skip);
    }

    let token_end = line
        .find(char::is_whitespace)
        .ok_or(ParseLineError::MissingDuration)?;
    let (token, rest) = line.split_at(token_end);
    let rest = rest.trim_start();

    let value_str = take_note_value(rest);
    if value_str.is_empty() {
        return Err(ParseLineError::MissingDuration);
    }
    let value = value_str
        .parse()
        .map_err(|source| ParseLineError::MalformedDuration {
            value: value_str.to_owned(),
            source,
        })?;

    let dot_count = rest[value_str.len()..]
        .chars()
        .take_while(|ch| *ch == '.')
        .count();
    let dots = Dots::new(dot_count).ok_or(ParseLineError::TooManyDots { dots: dot_count })?;

    Ok(Line::Note(NoteEvent {
        token: token.to_owned(),
        value,
        dots,
    }))
}

/// The prefix of `s` that makes up a note value: digits, optionally followed
/// by a slash and more digits. Anything after that is left to the caller.
/// A slash without digits after it is kept, so that `1/` is rejected by the
/// note value parser instead of being read as a whole note.
fn take_note_value(s: &str) -> &str {
    let digits = |from: usize| {
        s[from..]
            .find(|ch: char| !ch.is_ascii_digit())
            .map_or(s.len(), |len| from + len)
    };
    let end = digits(0);
    if end == 0 || !s[end..].starts_with('/') {
        return &s[..end];
    }
    let denom_end = digits(end + 1);
    if denom_end == end + 1 {
        &s[..=end]
    } else {
        &s[..denom_end]
    }
}

/// A note event together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    /// Line number, starting at 1.
    pub number: usize,
    /// The line as it appears in the score, without the line terminator.
    pub text: String,
    pub event: NoteEvent,
}

/// Iterator over the note events of a score, reading it line by line.
/// Comments and blank lines are skipped.
pub struct Lines<R> {
    lines: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = Result<ScoreLine, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.number + 1;
            let text = match self.lines.next()?.context(ReadScore { line }) {
                Ok(text) => text,
                Err(err) => return Some(Err(err)),
            };
            self.number = line;
            match parse_line(&text) {
                Ok(Line::Skip) => log::trace!("line {}: skipped", line),
                Ok(Line::Note(event)) => {
                    return Some(Ok(ScoreLine {
                        number: line,
                        text,
                        event,
                    }))
                }
                Err(source) => return Some(Err(Error::Parse { line, text, source })),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn note(token: &str, num: u32, denom: u32, dots: usize) -> Line {
        Line::Note(NoteEvent {
            token: token.to_owned(),
            value: NoteValue::new(num, denom).unwrap(),
            dots: Dots::new(dots).unwrap(),
        })
    }

    #[test]
    fn skipped_lines() {
        assert_eq!(parse_line(""), Ok(Line::Skip));
        assert_eq!(parse_line("   \t "), Ok(Line::Skip));
        assert_eq!(parse_line("# Für Elise"), Ok(Line::Skip));
        assert_eq!(parse_line("#C4 1/4"), Ok(Line::Skip));
    }

    #[test]
    fn notes() {
        assert_eq!(parse_line("C4 1/4"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4# 1/8"), Ok(note("C4#", 1, 8, 0)));
        assert_eq!(parse_line("D3b\t\t2"), Ok(note("D3b", 2, 1, 0)));
        assert_eq!(parse_line("0 1"), Ok(note("0", 1, 1, 0)));
        assert_eq!(parse_line("A4 12/16"), Ok(note("A4", 12, 16, 0)));
    }

    #[test]
    fn dotted_notes() {
        assert_eq!(parse_line("C4 1/4."), Ok(note("C4", 1, 4, 1)));
        assert_eq!(parse_line("C4 1/4.."), Ok(note("C4", 1, 4, 2)));
        assert_eq!(parse_line("C4 1/4..."), Ok(note("C4", 1, 4, 3)));
    }

    #[test]
    fn too_many_dots() {
        assert_eq!(
            parse_line("C3 1/4...."),
            Err(ParseLineError::TooManyDots { dots: 4 })
        );
    }

    #[test]
    fn trailing_content() {
        assert_eq!(parse_line("C4 1/4 # quarter"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 1/4.x"), Ok(note("C4", 1, 4, 1)));
        assert_eq!(parse_line("C4 1/4 ...."), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 1/4\r"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("  C4 1/4"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 1/4/8"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 1/4/"), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 1/4/8."), Ok(note("C4", 1, 4, 0)));
        assert_eq!(parse_line("C4 3/8x"), Ok(note("C4", 3, 8, 0)));
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse_line("C4"), Err(ParseLineError::MissingDuration));
        assert_eq!(parse_line("C4 quarter"), Err(ParseLineError::MissingDuration));
        assert_eq!(parse_line("C4 .1/4"), Err(ParseLineError::MissingDuration));
        assert_eq!(
            parse_line("C4 1/"),
            Err(ParseLineError::MalformedDuration {
                value: "1/".to_owned(),
                source: ParseNoteValueError::Malformed,
            })
        );
        assert_eq!(
            parse_line("C4 1/."),
            Err(ParseLineError::MalformedDuration {
                value: "1/".to_owned(),
                source: ParseNoteValueError::Malformed,
            })
        );
        assert_eq!(parse_line("C4 /4"), Err(ParseLineError::MissingDuration));
        assert_eq!(
            parse_line("C4 0/4"),
            Err(ParseLineError::MalformedDuration {
                value: "0/4".to_owned(),
                source: ParseNoteValueError::Zero,
            })
        );
    }

    #[test]
    fn line_numbers() {
        let score = "# intro\nC4 1/4\n\n0 1/8\nC4 oops\nD4 1/4\n";
        let mut lines = Lines::new(score.as_bytes());

        let first = lines.next().unwrap().unwrap();
        assert_eq!(first.number, 2);
        assert_eq!(first.text, "C4 1/4");

        let second = lines.next().unwrap().unwrap();
        assert_eq!(second.number, 4);
        assert_eq!(second.event.token, "0");

        match lines.next() {
            Some(Err(Error::Parse { line, text, source })) => {
                assert_eq!(line, 5);
                assert_eq!(text, "C4 oops");
                assert_eq!(source, ParseLineError::MissingDuration);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8() {
        let score: &[u8] = b"C4 1/4\n\xff\xfe 1/4\n";
        let mut lines = Lines::new(score);
        assert!(lines.next().unwrap().is_ok());
        match lines.next() {
            Some(Err(Error::ReadScore { line, .. })) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
