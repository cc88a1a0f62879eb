// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Destinations for the generated G-code.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use snafu::ResultExt;

use crate::error::{CreateOutput, Result, WriteOutput};

/// Receives the generated commands, one line at a time, in order.
pub trait Sink {
    /// Write a single line, without line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects the lines in memory.
impl Sink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes newline-terminated lines to any `io::Write`.
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Where the G-code should go.
#[derive(Debug, Clone, Copy)]
pub enum OutputTarget<'a> {
    Stdout,
    File(&'a Path),
}

/// Open the output target, run the callback on it and flush it afterwards.
/// Files are created (or truncated) before the callback runs.
pub fn with_output<R, F: FnOnce(&mut dyn Sink) -> Result<R>>(
    target: OutputTarget,
    callback: F,
) -> Result<R> {
    match target {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            let mut sink = WriteSink::new(stdout.lock());
            let result = callback(&mut sink)?;
            sink.flush().context(WriteOutput)?;
            Ok(result)
        }
        OutputTarget::File(path) => {
            let file = File::create(path).context(CreateOutput { path })?;
            let mut sink = WriteSink::new(BufWriter::new(file));
            let result = callback(&mut sink)?;
            sink.flush().context(WriteOutput)?;
            Ok(result)
        }
    }
}
