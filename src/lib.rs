pub mod note;
pub mod output;
pub mod render;
pub mod synth;
pub mod wave;

use snafu::Snafu;

/// Anything that can go wrong between a note name and a WAV file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid note: {}", source))]
    ResolveNote { source: note::NoteError },
    #[snafu(display("Invalid synthesis parameters: {}", source))]
    Synthesis { source: synth::SynthError },
    #[snafu(display("Failed to write WAV file: {}", source))]
    WriteWav { source: output::wav::WavError },
}
