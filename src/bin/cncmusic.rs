// cnc-music -- play tunes on the stepper motors of a CNC machine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `cncmusic` turns a music sheet into G-code that plays it on a CNC machine.

use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use cnc_music::output::{self, OutputTarget};
use cnc_music::{note, Config};

#[derive(Debug, StructOpt)]
#[structopt(name = "cncmusic", about = "Playing music on CNC machines")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// The music sheet (a text file containing pairs of notes and note values).
    #[structopt(parse(from_os_str), required_unless = "list-notes")]
    sequence_file: Option<PathBuf>,

    /// How many steps per mm the CNC machine does on the X axis.
    #[structopt(long = "steps-per-mm", default_value = "100")]
    steps_per_mm: u32,

    /// The maximum X in mm that the CNC machine should reach.
    #[structopt(long = "x-limit", default_value = "100")]
    x_limit: f64,

    /// Tempo multiplier, higher is faster.
    #[structopt(long, default_value = "1.0")]
    tempo: f64,

    /// Write the G-code to a file rather than printing it to stdout.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Print all known notes with their frequency and exit.
    #[structopt(long)]
    list_notes: bool,
}

fn main() {
    let opt = Opt::from_args();

    // The logger writes to stdout, so stay quiet by default when the G-code goes there too.
    let level = match (opt.output.is_some(), opt.verbose) {
        (false, 0) => log::Level::Error,
        (false, 1) | (true, 0) => log::Level::Info,
        (_, 1) | (false, 2) => log::Level::Debug,
        _ => log::Level::Trace,
    };
    if let Err(err) = simple_logger::init_with_level(level) {
        eprintln!("Unable to initialize logging: {}", err);
    }

    if let Err(err) = run(&opt) {
        if let Some(line) = err.line() {
            log::info!("the G-code written so far stops before line {}", line);
        }
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(opt: &Opt) -> cnc_music::Result<()> {
    if opt.list_notes {
        for (token, frequency) in note::tokens() {
            println!("{:4} {:7.2} Hz", token, frequency);
        }
        return Ok(());
    }
    let sequence_file = match &opt.sequence_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let config = Config {
        steps_per_unit: opt.steps_per_mm,
        axis_limit: opt.x_limit,
        tempo: opt.tempo,
    };
    log::info!(
        "{} steps/mm, X limit {} mm, tempo {}",
        config.steps_per_unit,
        config.axis_limit,
        config.tempo
    );

    let target = match &opt.output {
        None => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(path.as_path()),
    };
    output::with_output(target, |sink| {
        cnc_music::compile_file(sequence_file, &config, sink).map(|_| ())
    })
}
