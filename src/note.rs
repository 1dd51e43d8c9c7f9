// tonewav -- synthesize periodic waveforms into wav files
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is, and how note names are parsed.

use std::fmt;
use std::str::FromStr;

use snafu::{OptionExt, ResultExt, Snafu};

use crate::synth::tuning::Tuning;

/// One of the twelve semitones of an octave, named relative to A.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl PitchClass {
    /// Look up a pitch class by name.
    ///
    /// Accepts the canonical names (`A`, `A#`, ..., `G#`) and the enharmonic
    /// aliases `Bb`, `Cb`, `B#`, `Db`, `Eb`, `Fb`, `E#`, `Gb` and `Ab`.
    /// The lookup is case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonewav::note::*;
    ///
    /// assert_eq!(PitchClass::from_name("A#"), Some(PitchClass::ASharp));
    /// assert_eq!(PitchClass::from_name("Bb"), Some(PitchClass::ASharp));
    /// assert_eq!(PitchClass::from_name("B#"), Some(PitchClass::C));
    /// assert_eq!(PitchClass::from_name("a"), None);
    /// assert_eq!(PitchClass::from_name("H"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<PitchClass> {
        let class = match name {
            "A" => PitchClass::A,
            "A#" | "Bb" => PitchClass::ASharp,
            "B" | "Cb" => PitchClass::B,
            "C" | "B#" => PitchClass::C,
            "C#" | "Db" => PitchClass::CSharp,
            "D" => PitchClass::D,
            "D#" | "Eb" => PitchClass::DSharp,
            "E" | "Fb" => PitchClass::E,
            "F" | "E#" => PitchClass::F,
            "F#" | "Gb" => PitchClass::FSharp,
            "G" => PitchClass::G,
            "G#" | "Ab" => PitchClass::GSharp,
            _ => return None,
        };
        Some(class)
    }

    /// Number of semitones above the A of the same octave, in `0..12`.
    pub fn offset_from_a(self) -> i32 {
        match self {
            PitchClass::A => 0,
            PitchClass::ASharp => 1,
            PitchClass::B => 2,
            PitchClass::C => 3,
            PitchClass::CSharp => 4,
            PitchClass::D => 5,
            PitchClass::DSharp => 6,
            PitchClass::E => 7,
            PitchClass::F => 8,
            PitchClass::FSharp => 9,
            PitchClass::G => 10,
            PitchClass::GSharp => 11,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum NoteError {
    #[snafu(display("Note {:?} has no trailing octave number", id))]
    MissingOctave { id: String },
    #[snafu(display("Note {:?} has unknown pitch class {:?}", id, pitch_class))]
    UnknownPitchClass { id: String, pitch_class: String },
    #[snafu(display("Octave of note {:?} is out of range: {}", id, source))]
    OctaveOutOfRange {
        id: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("Note {:?} is too far away from A4", id))]
    PitchOutOfRange { id: String },
}

/// A note in standard notation, e.g. `E2` or `Bb4`.
///
/// The octave numbering follows scientific pitch notation, so `A4` is the
/// reference note of the default tuning. Note that the octave number changes
/// between B and C, whereas the semitone table used here is anchored at A.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    id: String,
    pitch_class: PitchClass,
    octave: i32,
    semitones_from_a4: i32,
}

impl Note {
    /// Parse a note identifier of the format `<pitch class><octave>`.
    ///
    /// The octave is the longest run of decimal digits at the end of the identifier,
    /// everything before it must name a pitch class.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonewav::note::*;
    ///
    /// let note = Note::parse("C#10").unwrap();
    /// assert_eq!(note.pitch_class(), PitchClass::CSharp);
    /// assert_eq!(note.octave(), 10);
    /// assert!(Note::parse("A").is_err());
    /// assert!(Note::parse("H4").is_err());
    /// ```
    pub fn parse(id: &str) -> Result<Note, NoteError> {
        let name = id.trim_end_matches(|ch: char| ch.is_ascii_digit());
        let octave_str = &id[name.len()..];
        if octave_str.is_empty() {
            return MissingOctave { id }.fail();
        }

        let pitch_class = PitchClass::from_name(name).context(UnknownPitchClass {
            id,
            pitch_class: name,
        })?;
        let octave: i32 = octave_str.parse().context(OctaveOutOfRange { id })?;
        // octave 4 is the reference octave, with A at offset 0 inside it
        let semitones_from_a4 = octave
            .checked_mul(12)
            .and_then(|semitones| semitones.checked_add(pitch_class.offset_from_a() - 48))
            .context(PitchOutOfRange { id })?;

        Ok(Note {
            id: id.to_owned(),
            pitch_class,
            octave,
            semitones_from_a4,
        })
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// The identifier this note was parsed from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Signed distance in semitones from A4.
    ///
    /// ```
    /// # use tonewav::note::*;
    /// assert_eq!(Note::parse("A4").unwrap().semitones_from_a4(), 0);
    /// assert_eq!(Note::parse("E2").unwrap().semitones_from_a4(), -17);
    /// ```
    pub fn semitones_from_a4(&self) -> i32 {
        self.semitones_from_a4
    }

    /// Frequency of this note in Hz relative to the given tuning.
    pub fn frequency(&self, tuning: &Tuning) -> f64 {
        tuning.frequency(self)
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Resolve a note identifier to a frequency in Hz.
///
/// `reference_pitch` is the frequency of A4, defaulting to 440 Hz.
///
/// # Examples
///
/// ```
/// use tonewav::note::resolve;
///
/// assert_eq!(resolve("A4", None).unwrap(), 440.0);
/// assert_eq!(resolve("A3", Some(440.0)).unwrap(), 220.0);
/// assert_eq!(resolve("A4", Some(432.0)).unwrap(), 432.0);
/// ```
pub fn resolve(id: &str, reference_pitch: Option<f64>) -> Result<f64, NoteError> {
    let tuning = reference_pitch.map_or_else(Tuning::default, Tuning::with_reference);
    Ok(Note::parse(id)?.frequency(&tuning))
}
