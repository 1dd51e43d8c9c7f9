// tonewav -- synthesize periodic waveforms into wav files
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use crate::note::*;

/// Defines the tuning of an instrument by assigning a frequency to A4.
/// This defines the frequencies of all other notes at a standard tuning of 12 half-tones per octave.
///
/// # Examples
///
/// ```
/// use tonewav::note::*;
/// use tonewav::synth::tuning::*;
/// assert_eq!(Tuning::default().frequency(&Note::parse("A3").unwrap()), 220.0);
/// assert_eq!(Tuning::default().frequency(&Note::parse("A5").unwrap()), 880.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tuning {
    pub reference_frequency: f64,
}

impl Tuning {
    pub fn with_reference(reference_frequency: f64) -> Self {
        Tuning {
            reference_frequency,
        }
    }

    /// Return the frequency of a note relative to this tuning.
    pub fn frequency(&self, note: &Note) -> f64 {
        self.frequency_at(note.semitones_from_a4())
    }

    /// Return the frequency of the pitch `semitones` half-tones away from A4.
    pub fn frequency_at(&self, semitones: i32) -> f64 {
        let octaves = semitones as f64 / 12.0;
        self.reference_frequency * 2.0f64.powf(octaves)
    }
}

/// Default concert tuning, where A4 corresponds to 440 Hz.
impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_frequency: 440.0,
        }
    }
}
