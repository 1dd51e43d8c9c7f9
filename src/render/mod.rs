//! The glue responsible for turning an oscillator into sampled audio.

use std::path::Path;

use log::info;
use snafu::{ensure, ResultExt};

use crate::output::wav;
use crate::synth::oscillator::{Oscillator, Transform};
use crate::synth::{InvalidDuration, SynthError, TooLong};
use crate::wave::{self, PcmFormat};

/// Number of samples covering `duration` seconds, rounded up.
///
/// Fails if the samples would not fit into a single WAV file at the given bit depth.
///
/// ```
/// # use tonewav::render::sample_count;
/// assert_eq!(sample_count(44100, 16, 2.0).unwrap(), 88200);
/// assert_eq!(sample_count(10, 16, 0.25).unwrap(), 3);
/// assert!(sample_count(44100, 16, -1.0).is_err());
/// assert!(sample_count(44100, 16, 1e300).is_err());
/// ```
pub fn sample_count(sample_rate: u32, bit_depth: u16, duration: f64) -> Result<usize, SynthError> {
    ensure!(
        duration.is_finite() && duration >= 0.0,
        InvalidDuration { duration }
    );
    let count = (f64::from(sample_rate) * duration).ceil();
    let max_count = wav::MAX_DATA_LEN / u64::from(bit_depth / 8).max(1);
    ensure!(count <= max_count as f64, TooLong { duration });
    Ok(count as usize)
}

/// Step the oscillator once for every sample in `duration` seconds.
///
/// The oscillator keeps its phase afterwards, so rendering again continues the wave.
pub fn render_samples(
    osc: &mut Oscillator,
    duration: f64,
    transform: Option<Transform>,
) -> Result<Vec<i32>, SynthError> {
    let params = osc.params();
    let count = sample_count(params.sample_rate, params.bit_depth, duration)?;
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        samples.push(osc.step(transform));
    }
    Ok(samples)
}

/// Render `duration` seconds of the oscillator into packed little-endian PCM bytes.
pub fn render_buffer(
    osc: &mut Oscillator,
    duration: f64,
    transform: Option<Transform>,
) -> Result<Vec<u8>, SynthError> {
    let samples = render_samples(osc, duration, transform)?;
    Ok(wave::pack_samples(&samples, osc.params().bit_depth))
}

/// Render `duration` seconds of the oscillator into a mono WAV file.
pub fn export_wav(
    osc: &mut Oscillator,
    path: &Path,
    duration: f64,
    transform: Option<Transform>,
) -> Result<(), crate::Error> {
    let params = *osc.params();
    let buffer = render_buffer(osc, duration, transform).context(crate::Synthesis)?;
    info!(
        "writing {:.2} seconds of {} at {:.2} Hz ({} bytes) to {}",
        duration,
        osc.shape(),
        params.frequency,
        buffer.len(),
        path.display()
    );
    let format = PcmFormat::mono(params.sample_rate, params.bit_depth);
    wav::write_wav_file(path, &format, &buffer).context(crate::WriteWav)?;
    Ok(())
}
