//! This namespace contains all the parts converting from note data to wave data.

pub mod oscillator;
pub mod tuning;

use snafu::Snafu;

/// Invalid parameters for synthesizing a waveform.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SynthError {
    #[snafu(display("Frequency must be a positive number of Hz, got {}", frequency))]
    InvalidFrequency { frequency: f64 },
    #[snafu(display("Sample rate {} is out of range", sample_rate))]
    InvalidSampleRate { sample_rate: u32 },
    #[snafu(display(
        "Unsupported bit depth {}, expected one of 8, 16, 24 or 32",
        bit_depth
    ))]
    UnsupportedBitDepth { bit_depth: u16 },
    #[snafu(display("Duration must be a non-negative number of seconds, got {}", duration))]
    InvalidDuration { duration: f64 },
    #[snafu(display("{} seconds of audio do not fit into a WAV file", duration))]
    TooLong { duration: f64 },
}
