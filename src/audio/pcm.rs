//! 16-bit linear PCM decoding and re-quantisation.
//!
//! The speech model returns raw little-endian `i16` samples with no framing.
//! [`decode_pcm16`] turns them into normalised `f32` channel data, and
//! [`quantize_sample`] is the inverse used when writing a container.
//!
//! # Example
//!
//! ```rust
//! use creative_studio::audio::{decode_pcm16, quantize_sample};
//!
//! // Two mono samples: 0x4000 (16384) and 0x8000 (-32768)
//! let buf = decode_pcm16(&[0x00, 0x40, 0x00, 0x80], 1).unwrap();
//! assert_eq!(buf.frame_count(), 2);
//! assert_eq!(buf.channel(0), &[0.5, -1.0]);
//! assert_eq!(quantize_sample(-1.0), -32768);
//! ```

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Bytes per 16-bit sample.
pub const BYTES_PER_SAMPLE: usize = 2;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors raised while interpreting raw PCM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The byte length is not a whole number of interleaved 16-bit frames.
    #[error("malformed PCM: {len} bytes is not a whole number of {channels}-channel 16-bit frames")]
    Malformed { len: usize, channels: u16 },

    /// The stream is valid PCM but its format or size does not fit the
    /// 32-bit WAV header fields.
    #[error("cannot describe {data_len} bytes of {channels}-channel {sample_rate} Hz PCM in a WAV header")]
    Unrepresentable {
        sample_rate: u32,
        channels: u16,
        data_len: usize,
    },
}

/// Number of whole frames in `len` bytes of interleaved 16-bit PCM.
///
/// Fails when `channels == 0` or when `len` is not a multiple of
/// `channels * 2`.
pub fn frame_count(len: usize, channels: u16) -> Result<usize, AudioError> {
    let frame_bytes = channels as usize * BYTES_PER_SAMPLE;
    if frame_bytes == 0 || len % frame_bytes != 0 {
        return Err(AudioError::Malformed { len, channels });
    }
    Ok(len / frame_bytes)
}

// ---------------------------------------------------------------------------
// PcmBuffer
// ---------------------------------------------------------------------------

/// De-interleaved, normalised audio in the range `[-1.0, 1.0]`.
///
/// Each channel holds `frame_count` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    channels: Vec<Vec<f32>>,
    frame_count: usize,
}

impl PcmBuffer {
    /// Number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Normalised samples of channel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= channel_count()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Iterate the samples frame by frame in interleaved order.
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.frame_count)
            .flat_map(move |frame| self.channels.iter().map(move |ch| ch[frame]))
    }
}

/// Reinterpret `bytes` as interleaved `i16` LE samples and normalise each one
/// by dividing by 32 768.
pub fn decode_pcm16(bytes: &[u8], channels: u16) -> Result<PcmBuffer, AudioError> {
    let frames = frame_count(bytes.len(), channels)?;
    let n = channels as usize;

    let mut data = vec![Vec::with_capacity(frames); n];
    for (i, raw) in bytes.chunks_exact(BYTES_PER_SAMPLE).enumerate() {
        let sample = LittleEndian::read_i16(raw);
        data[i % n].push(sample as f32 / 32_768.0);
    }

    Ok(PcmBuffer {
        channels: data,
        frame_count: frames,
    })
}

/// Convert a normalised sample back to `i16`.
///
/// The sample is clamped to `[-1.0, 1.0]`; negative values scale by 32 768
/// and non-negative values by 32 767, then round towards positive infinity.
///
/// A non-negative sample `n / 32768` scales to `n - n / 32768`, which lies in
/// `(n - 1, n]`, so rounding up restores `n`. Negative samples scale back
/// exactly. Every `i16` therefore survives a decode/quantise round trip.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = f64::from(sample).clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32_768.0 } else { s * 32_767.0 };
    scaled.ceil() as i16
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn frame_count_mono_and_stereo() {
        assert_eq!(frame_count(8, 1), Ok(4));
        assert_eq!(frame_count(8, 2), Ok(2));
        assert_eq!(frame_count(0, 1), Ok(0));
    }

    #[test]
    fn frame_count_rejects_partial_frames() {
        assert_eq!(
            frame_count(3, 1),
            Err(AudioError::Malformed { len: 3, channels: 1 })
        );
        assert_eq!(
            frame_count(6, 2),
            Err(AudioError::Malformed { len: 6, channels: 2 })
        );
    }

    #[test]
    fn frame_count_rejects_zero_channels() {
        assert!(frame_count(4, 0).is_err());
    }

    #[test]
    fn decode_deinterleaves_channels() {
        let bytes = to_bytes(&[16_384, -16_384, 0, 32_767]);
        let buf = decode_pcm16(&bytes, 2).unwrap();

        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 2);
        assert_eq!(buf.channel(0), &[0.5, 0.0]);
        assert_eq!(buf.channel(1)[0], -0.5);
        assert!((buf.channel(1)[1] - 32_767.0 / 32_768.0).abs() < f32::EPSILON);
    }

    #[test]
    fn interleaved_restores_original_order() {
        let samples = [1i16, 2, 3, 4, 5, 6];
        let buf = decode_pcm16(&to_bytes(&samples), 3).unwrap();
        let back: Vec<i16> = buf.interleaved().map(quantize_sample).collect();
        assert_eq!(back, samples);
    }

    #[test]
    fn quantize_clamps_out_of_range() {
        assert_eq!(quantize_sample(1.5), 32_767);
        assert_eq!(quantize_sample(-3.0), -32_768);
        assert_eq!(quantize_sample(0.0), 0);
    }

    #[test]
    fn every_i16_round_trips() {
        for s in i16::MIN..=i16::MAX {
            let normalised = s as f32 / 32_768.0;
            assert_eq!(quantize_sample(normalised), s, "sample {s} drifted");
        }
    }
}
