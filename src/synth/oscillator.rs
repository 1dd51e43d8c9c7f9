// tonewav -- synthesize periodic waveforms into wav files
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Oscillators producing quantized samples of periodic waveforms.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use log::debug;
use snafu::ensure;

use super::*;
use crate::wave::PcmFormat;

/// Sample rate used when none is given explicitly.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Bit depth used when none is given explicitly.
pub const DEFAULT_BIT_DEPTH: u16 = 16;

/// Optional post-processing applied to each normalized sample before quantization.
pub type Transform<'a> = &'a dyn Fn(f64) -> f64;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WaveShape {
    Sine,
    Saw,
    Square,
    Triangle,
}

impl WaveShape {
    pub const ALL: [WaveShape; 4] = [
        WaveShape::Sine,
        WaveShape::Saw,
        WaveShape::Square,
        WaveShape::Triangle,
    ];

    /// How far the phase advances per sample.
    ///
    /// The unit of the phase differs between shapes: radians for sine and square,
    /// seconds for saw, and periods for triangle.
    pub fn phase_increment(self, frequency: f64, sample_rate: f64) -> f64 {
        match self {
            WaveShape::Sine => 2.0 * PI * frequency / sample_rate,
            WaveShape::Saw => 1.0 / sample_rate,
            WaveShape::Square => WaveShape::Sine.phase_increment(frequency, sample_rate),
            WaveShape::Triangle => frequency / sample_rate,
        }
    }

    /// Evaluate the normalized wave at the given phase.
    pub fn sample(self, phase: f64, frequency: f64, amplitude: f64) -> f64 {
        match self {
            WaveShape::Sine => amplitude * phase.sin(),
            WaveShape::Saw => 2.0 * amplitude * frequency * (phase % (1.0 / frequency)) - amplitude,
            WaveShape::Square => amplitude * sign(phase.sin()),
            WaveShape::Triangle => {
                4.0 * amplitude * (phase - (phase + 0.5).floor()).abs() - amplitude
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Saw => "saw",
            WaveShape::Square => "square",
            WaveShape::Triangle => "triangle",
        }
    }
}

/// Like `f64::signum`, but zero stays zero.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

impl FromStr for WaveShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveShape::ALL
            .iter()
            .copied()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| format!("unknown wave shape {:?}", s))
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happens to scaled samples that do not fit the bit depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Overflow {
    /// Keep the low bits, like storing into a fixed width integer.
    Wrap,
    /// Saturate at the most negative/positive representable value.
    Clip,
}

impl Default for Overflow {
    fn default() -> Self {
        Overflow::Wrap
    }
}

/// Convert a normalized sample into a signed integer of `bit_depth` bits.
///
/// The sample is scaled by `2^(bit_depth - 1) - 1` and truncated towards zero.
/// Non-finite results become zero.
///
/// # Panics
///
/// If `bit_depth` is not one of 8, 16, 24 or 32.
///
/// # Examples
///
/// ```
/// use tonewav::synth::oscillator::*;
///
/// assert_eq!(quantize(0.3, 16, Overflow::Wrap), 9830);
/// assert_eq!(quantize(-1.0, 8, Overflow::Wrap), -127);
/// assert_eq!(quantize(2.0, 16, Overflow::Wrap), -2);
/// assert_eq!(quantize(2.0, 16, Overflow::Clip), 32767);
/// ```
pub fn quantize(sample: f64, bit_depth: u16, overflow: Overflow) -> i32 {
    assert!(
        is_supported_bit_depth(bit_depth),
        "unsupported bit depth {}",
        bit_depth
    );
    let max = ((1i64 << (bit_depth - 1)) - 1) as f64;
    let scaled = (sample * max).trunc();
    if !scaled.is_finite() {
        return 0;
    }
    match overflow {
        Overflow::Wrap => {
            let modulus = (1u64 << bit_depth) as f64;
            let low_bits = scaled.rem_euclid(modulus) as u64;
            // sign-extend from bit_depth bits
            let shift = 64 - u32::from(bit_depth);
            (((low_bits << shift) as i64) >> shift) as i32
        }
        Overflow::Clip => scaled.max(-max - 1.0).min(max) as i32,
    }
}

fn is_supported_bit_depth(bit_depth: u16) -> bool {
    matches!(bit_depth, 8 | 16 | 24 | 32)
}

/// Synthesis parameters of an oscillator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OscillatorParams {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak of the normalized wave, nominally within [-1, 1].
    pub amplitude: f64,
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub overflow: Overflow,
}

impl OscillatorParams {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: DEFAULT_BIT_DEPTH,
            overflow: Overflow::default(),
        }
    }

    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    pub fn with_bit_depth(self, bit_depth: u16) -> Self {
        Self { bit_depth, ..self }
    }

    pub fn with_overflow(self, overflow: Overflow) -> Self {
        Self { overflow, ..self }
    }

    fn validate(&self) -> Result<(), SynthError> {
        ensure!(
            self.frequency.is_finite() && self.frequency > 0.0,
            InvalidFrequency {
                frequency: self.frequency
            }
        );
        ensure!(
            is_supported_bit_depth(self.bit_depth),
            UnsupportedBitDepth {
                bit_depth: self.bit_depth
            }
        );
        // the byte rate has to fit the wav header
        let format = PcmFormat::mono(self.sample_rate, self.bit_depth);
        ensure!(
            self.sample_rate > 0 && format.byte_rate().is_some(),
            InvalidSampleRate {
                sample_rate: self.sample_rate
            }
        );
        Ok(())
    }
}

/// The mutable part of an oscillator.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OscillatorState {
    pub phase: f64,
}

/// An oscillator sampling a wave of some shape at a fixed sample rate.
///
/// The phase starts at zero and only ever moves forward by a fixed increment per sample.
/// Construct a new oscillator to start over.
#[derive(Debug, Clone)]
pub struct Oscillator {
    shape: WaveShape,
    params: OscillatorParams,
    phase_increment: f64,
    state: OscillatorState,
}

impl Oscillator {
    pub fn new(shape: WaveShape, params: OscillatorParams) -> Result<Self, SynthError> {
        params.validate()?;
        let phase_increment = shape.phase_increment(params.frequency, params.sample_rate as f64);
        debug!(
            "{} oscillator at {} Hz, amplitude {}, {} Hz/{} bit",
            shape, params.frequency, params.amplitude, params.sample_rate, params.bit_depth
        );
        Ok(Self {
            shape,
            params,
            phase_increment,
            state: OscillatorState::default(),
        })
    }

    /// Compute the sample at the current phase, then advance the phase.
    ///
    /// `transform` is applied to the normalized sample before it is quantized.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonewav::synth::oscillator::*;
    ///
    /// let mut osc = Oscillator::new(WaveShape::Triangle, OscillatorParams::new(110.0, 0.5)).unwrap();
    /// assert_eq!(osc.step(None), -16383);
    /// assert_eq!(osc.phase(), osc.phase_increment());
    /// ```
    pub fn step(&mut self, transform: Option<Transform>) -> i32 {
        let params = &self.params;
        let mut sample = self
            .shape
            .sample(self.state.phase, params.frequency, params.amplitude);
        if let Some(transform) = transform {
            sample = transform(sample);
        }
        self.state.phase += self.phase_increment;
        quantize(sample, params.bit_depth, params.overflow)
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn phase(&self) -> f64 {
        self.state.phase
    }

    pub fn phase_increment(&self) -> f64 {
        self.phase_increment
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn osc(shape: WaveShape, frequency: f64, amplitude: f64) -> Oscillator {
        Oscillator::new(shape, OscillatorParams::new(frequency, amplitude)).unwrap()
    }

    #[test]
    fn first_sample() {
        assert_eq!(osc(WaveShape::Sine, 440.0, 0.3).step(None), 0);
        assert_eq!(osc(WaveShape::Square, 440.0, 0.3).step(None), 0);
        // trunc(-0.3 * 32767)
        assert_eq!(osc(WaveShape::Saw, 440.0, 0.3).step(None), -9830);
        assert_eq!(osc(WaveShape::Triangle, 440.0, 0.3).step(None), -9830);
    }

    #[test]
    fn phase_advance() {
        for shape in WaveShape::ALL.iter().copied() {
            let mut osc = osc(shape, 261.63, 0.8);
            let n = 1000;
            for _ in 0..n {
                osc.step(None);
            }
            let expected = osc.phase_increment() * n as f64;
            assert!(
                (osc.phase() - expected).abs() <= expected * 1e-12,
                "{}: {} vs {}",
                shape,
                osc.phase(),
                expected
            );
        }
    }

    #[test]
    fn increments() {
        let sr = DEFAULT_SAMPLE_RATE as f64;
        assert_eq!(osc(WaveShape::Sine, 440.0, 1.0).phase_increment(), 2.0 * PI * 440.0 / sr);
        assert_eq!(
            osc(WaveShape::Square, 440.0, 1.0).phase_increment(),
            osc(WaveShape::Sine, 440.0, 1.0).phase_increment()
        );
        assert_eq!(osc(WaveShape::Saw, 440.0, 1.0).phase_increment(), 1.0 / sr);
        assert_eq!(osc(WaveShape::Triangle, 440.0, 1.0).phase_increment(), 440.0 / sr);
    }

    #[test]
    fn triangle_quarter_steps() {
        // a quarter period per sample
        let mut osc = osc(WaveShape::Triangle, 11025.0, 1.0);
        let samples: Vec<i32> = (0..5).map(|_| osc.step(None)).collect();
        assert_eq!(samples, vec![-32767, 0, 32767, 0, -32767]);
    }

    #[test]
    fn square_levels() {
        let mut osc = osc(WaveShape::Square, 11025.0, 0.5);
        assert_eq!(osc.step(None), 0);
        assert_eq!(osc.step(None), 16383);
        osc.step(None);
        assert_eq!(osc.step(None), -16383);
    }

    #[test]
    fn saw_ramp() {
        // 100 samples per period
        let mut osc = osc(WaveShape::Saw, 441.0, 1.0);
        let samples: Vec<i32> = (0..102).map(|_| osc.step(None)).collect();
        assert_eq!(samples[0], -32767);
        assert!(samples[1..100].windows(2).all(|w| w[0] < w[1]));
        assert!(samples[99] > 32000);
        assert!(samples[101] < -32000);
    }

    #[test]
    fn saw_uses_float_modulo() {
        let shape = WaveShape::Saw;
        // halfway through the third period
        let value = shape.sample(2.5 / 441.0, 441.0, 1.0);
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn transform_applied_before_quantization() {
        let mut plain = osc(WaveShape::Triangle, 11025.0, 1.0);
        let mut halved = osc(WaveShape::Triangle, 11025.0, 1.0);
        let half = |s: f64| s * 0.5;
        for _ in 0..5 {
            let expected = quantize(
                WaveShape::Triangle.sample(halved.phase(), 11025.0, 1.0) * 0.5,
                16,
                Overflow::Wrap,
            );
            assert_eq!(halved.step(Some(&half)), expected);
            plain.step(None);
        }
        assert_eq!(plain.state(), halved.state());
    }

    #[test]
    fn overflow_wraps_by_default() {
        let mut osc = osc(WaveShape::Sine, 11025.0, 2.0);
        assert_eq!(osc.step(None), 0);
        // 2.0 * 32767 = 65534, which is -2 in 16 bit
        assert_eq!(osc.step(None), -2);
    }

    #[test]
    fn overflow_clips_on_request() {
        let params = OscillatorParams::new(11025.0, 2.0).with_overflow(Overflow::Clip);
        let mut osc = Oscillator::new(WaveShape::Sine, params).unwrap();
        osc.step(None);
        assert_eq!(osc.step(None), 32767);
        assert_eq!(quantize(-3.0, 16, Overflow::Clip), -32768);
    }

    #[test]
    fn quantize_bit_depths() {
        assert_eq!(quantize(1.0, 8, Overflow::Wrap), 127);
        assert_eq!(quantize(1.0, 24, Overflow::Wrap), 8_388_607);
        assert_eq!(quantize(-1.0, 32, Overflow::Wrap), -2_147_483_647);
        assert_eq!(quantize(1.5, 8, Overflow::Wrap), -66);
        assert_eq!(quantize(-0.99999, 16, Overflow::Wrap), -32766);
        assert_eq!(quantize(f64::NAN, 16, Overflow::Wrap), 0);
        assert_eq!(quantize(f64::INFINITY, 16, Overflow::Clip), 0);
    }

    #[test]
    #[should_panic(expected = "unsupported bit depth 0")]
    fn quantize_zero_bits() {
        quantize(0.5, 0, Overflow::Wrap);
    }

    #[test]
    #[should_panic(expected = "unsupported bit depth 64")]
    fn quantize_too_many_bits() {
        quantize(0.5, 64, Overflow::Clip);
    }

    #[test]
    fn zero_amplitude_square_is_silent() {
        let mut osc = osc(WaveShape::Square, 440.0, 0.0);
        assert!((0..100).all(|_| osc.step(None) == 0));
    }

    #[test]
    fn deterministic() {
        let mut a = osc(WaveShape::Sine, 329.63, 0.7);
        let mut b = osc(WaveShape::Sine, 329.63, 0.7);
        for _ in 0..500 {
            assert_eq!(a.step(None), b.step(None));
        }
    }

    #[test]
    fn invalid_params() {
        assert_eq!(
            Oscillator::new(WaveShape::Sine, OscillatorParams::new(0.0, 1.0)).unwrap_err(),
            SynthError::InvalidFrequency { frequency: 0.0 }
        );
        assert_eq!(
            Oscillator::new(WaveShape::Sine, OscillatorParams::new(440.0, 1.0).with_bit_depth(12))
                .unwrap_err(),
            SynthError::UnsupportedBitDepth { bit_depth: 12 }
        );
        assert_eq!(
            Oscillator::new(WaveShape::Sine, OscillatorParams::new(440.0, 1.0).with_sample_rate(0))
                .unwrap_err(),
            SynthError::InvalidSampleRate { sample_rate: 0 }
        );
    }

    #[test]
    fn sample_rate_bounded_by_byte_rate() {
        let params = OscillatorParams::new(440.0, 1.0)
            .with_sample_rate(4_000_000_000)
            .with_bit_depth(32);
        assert_eq!(
            Oscillator::new(WaveShape::Sine, params).unwrap_err(),
            SynthError::InvalidSampleRate {
                sample_rate: 4_000_000_000
            }
        );
        // the same rate fits at one byte per sample
        assert!(Oscillator::new(WaveShape::Sine, params.with_bit_depth(8)).is_ok());
        assert!(Oscillator::new(WaveShape::Sine, params.with_sample_rate(1_073_741_823)).is_ok());
        assert!(Oscillator::new(WaveShape::Sine, params.with_sample_rate(1_073_741_824)).is_err());
    }

    #[test]
    fn shape_names() {
        for shape in WaveShape::ALL.iter() {
            assert_eq!(shape.to_string().parse::<WaveShape>(), Ok(*shape));
        }
        assert!("noise".parse::<WaveShape>().is_err());
    }
}
