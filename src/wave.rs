//! This is the namespace for all parts dealing with data in sampled waves.

/// Information about how PCM audio is laid out in memory.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PcmFormat {
    /// Number of samples per second.
    pub sample_rate: u32,
    /// Number of bits of each sample, a multiple of 8.
    pub bit_depth: u16,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl PcmFormat {
    /// Single channel audio.
    pub fn mono(sample_rate: u32, bit_depth: u16) -> Self {
        PcmFormat {
            sample_rate,
            bit_depth,
            channels: 1,
        }
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bit_depth / 8
    }

    /// Bytes of one frame, i.e. one sample for every channel.
    ///
    /// Returns `None` if the frame does not fit the 16 bit header field.
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.bytes_per_sample())
    }

    /// Bytes per second of audio.
    ///
    /// Returns `None` if the rate does not fit the 32 bit header field.
    ///
    /// ```
    /// # use tonewav::wave::PcmFormat;
    /// assert_eq!(PcmFormat::mono(44100, 16).byte_rate(), Some(88200));
    /// assert_eq!(PcmFormat::mono(4_000_000_000, 32).byte_rate(), None);
    /// ```
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate
            .checked_mul(u32::from(self.block_align()?))
    }
}

/// Pack samples as little-endian integers of `bit_depth / 8` bytes each.
///
/// Only the low bytes of every sample are kept, so a sample must already be
/// representable in `bit_depth` bits.
///
/// # Examples
///
/// ```
/// use tonewav::wave::pack_samples;
///
/// assert_eq!(pack_samples(&[1, -2], 16), vec![0x01, 0x00, 0xfe, 0xff]);
/// assert_eq!(pack_samples(&[-1], 24), vec![0xff, 0xff, 0xff]);
/// ```
pub fn pack_samples(samples: &[i32], bit_depth: u16) -> Vec<u8> {
    let width = usize::from(bit_depth / 8);
    let mut bytes = Vec::with_capacity(samples.len() * width);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes()[..width]);
    }
    bytes
}
