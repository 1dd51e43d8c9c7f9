// tonewav -- synthesize periodic waveforms into wav files
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `tonewav` renders a single oscillator into a wav file.

use std::path::PathBuf;

use log::{error, info};
use snafu::ResultExt;
use structopt::StructOpt;

use tonewav::note;
use tonewav::render;
use tonewav::synth::oscillator::{Oscillator, OscillatorParams, Overflow, WaveShape};

const DEFAULT_NOTE: &str = "E2";

#[derive(Debug, StructOpt)]
#[structopt(name = "tonewav", about = "Rendering waveforms into wav files")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Shape of the wave (sine, saw, square or triangle).
    #[structopt(short, long, default_value = "triangle")]
    shape: WaveShape,

    /// Note to play, e.g. E2 or Bb4 [default: E2]
    #[structopt(short, long)]
    note: Option<String>,

    /// Frequency in Hz, instead of a note.
    #[structopt(short, long, conflicts_with = "note")]
    frequency: Option<f64>,

    /// Frequency of A4 in Hz.
    #[structopt(long, default_value = "440")]
    reference_pitch: f64,

    /// Peak amplitude, where 1.0 is full scale.
    #[structopt(short, long, default_value = "0.3")]
    amplitude: f64,

    /// Length of the output in seconds.
    #[structopt(short, long, default_value = "2")]
    duration: f64,

    #[structopt(long, default_value = "44100")]
    sample_rate: u32,

    /// Bits per sample (8, 16, 24 or 32).
    #[structopt(long, default_value = "16")]
    bit_depth: u16,

    /// Clip samples exceeding full scale instead of wrapping them around.
    #[structopt(long)]
    clip: bool,

    /// Output file [default: <shape>.wav]
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).unwrap();

    if let Err(err) = run(opt) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), tonewav::Error> {
    let frequency = match opt.frequency {
        Some(frequency) => frequency,
        None => {
            let id = opt.note.as_deref().unwrap_or(DEFAULT_NOTE);
            let frequency =
                note::resolve(id, Some(opt.reference_pitch)).context(tonewav::ResolveNote)?;
            info!("{} is {:.3} Hz", id, frequency);
            frequency
        }
    };

    let shape = opt.shape;
    let overflow = if opt.clip {
        Overflow::Clip
    } else {
        Overflow::Wrap
    };
    let params = OscillatorParams::new(frequency, opt.amplitude)
        .with_sample_rate(opt.sample_rate)
        .with_bit_depth(opt.bit_depth)
        .with_overflow(overflow);
    let mut osc = Oscillator::new(shape, params).context(tonewav::Synthesis)?;

    let output = opt
        .output
        .unwrap_or_else(|| format!("{}.wav", shape).into());
    render::export_wav(&mut osc, &output, opt.duration, None)?;
    info!("done");
    Ok(())
}
