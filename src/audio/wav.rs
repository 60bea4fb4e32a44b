//! Canonical 44-byte-header WAV encoding of 16-bit PCM.
//!
//! Layout written by [`transcode`]:
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  36 + data length
//!      8     4  "WAVE"
//!     12     4  "fmt "
//!     16     4  16 (fmt chunk length)
//!     20     2  1  (PCM)
//!     22     2  channels
//!     24     4  sample rate
//!     28     4  byte rate   = sample rate * channels * 2
//!     32     2  block align = channels * 2
//!     34     2  16 (bits per sample)
//!     36     4  "data"
//!     40     4  data length = frames * channels * 2
//!     44     …  interleaved i16 LE samples
//! ```

use byteorder::{ByteOrder, LittleEndian};

use super::pcm::{decode_pcm16, quantize_sample, AudioError, BYTES_PER_SAMPLE};

/// Size of the canonical header.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const FORMAT_PCM: u16 = 1;

// ---------------------------------------------------------------------------
// WavSpec
// ---------------------------------------------------------------------------

/// Sample rate and channel layout of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl WavSpec {
    /// 24 kHz mono, as emitted by the speech model.
    pub const SPEECH: WavSpec = WavSpec {
        sample_rate: 24_000,
        channels: 1,
    };

    /// Bytes per interleaved frame; `None` when it does not fit in `u16`.
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(BYTES_PER_SAMPLE as u16)
    }

    /// Bytes per second; `None` when it does not fit in `u32`.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate
            .checked_mul(u32::from(self.block_align()?))
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::SPEECH
    }
}

// ---------------------------------------------------------------------------
// transcode
// ---------------------------------------------------------------------------

/// Wrap raw interleaved 16-bit LE PCM in a WAV container.
///
/// The samples go through the normalised `f32` representation and are
/// re-quantised with [`quantize_sample`], so the payload is byte-identical to
/// `pcm` for every valid input.
///
/// # Errors
///
/// [`AudioError::Malformed`] when `pcm` is not a whole number of frames,
/// [`AudioError::Unrepresentable`] when the format or the payload size
/// overflows a header field.
///
/// # Example
///
/// ```rust
/// use creative_studio::audio::transcode;
///
/// let wav = transcode(&[0x01, 0x00, 0xff, 0xff], 24_000, 1).unwrap();
/// assert_eq!(wav.len(), 44 + 4);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(&wav[44..], &[0x01, 0x00, 0xff, 0xff]);
/// ```
pub fn transcode(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>, AudioError> {
    let buffer = decode_pcm16(pcm, channels)?;
    let spec = WavSpec {
        sample_rate,
        channels,
    };
    let data_len = buffer.frame_count() * usize::from(channels) * BYTES_PER_SAMPLE;
    let fields = HeaderFields::new(spec, data_len).ok_or(AudioError::Unrepresentable {
        sample_rate,
        channels,
        data_len,
    })?;

    let mut out = vec![0u8; WAV_HEADER_LEN + data_len];
    write_header(&mut out[..WAV_HEADER_LEN], &fields);

    for (slot, sample) in out[WAV_HEADER_LEN..]
        .chunks_exact_mut(BYTES_PER_SAMPLE)
        .zip(buffer.interleaved())
    {
        LittleEndian::write_i16(slot, quantize_sample(sample));
    }

    log::debug!(
        "wav: {} frames @ {} Hz x {} ch -> {} bytes",
        buffer.frame_count(),
        sample_rate,
        channels,
        out.len()
    );
    Ok(out)
}

/// Header values, all checked to fit their fields.
struct HeaderFields {
    spec: WavSpec,
    block_align: u16,
    byte_rate: u32,
    data_len: u32,
    riff_len: u32,
}

impl HeaderFields {
    fn new(spec: WavSpec, data_len: usize) -> Option<Self> {
        let data_len = u32::try_from(data_len).ok()?;
        Some(Self {
            spec,
            block_align: spec.block_align()?,
            byte_rate: spec.byte_rate()?,
            data_len,
            riff_len: data_len.checked_add(36)?,
        })
    }
}

fn write_header(header: &mut [u8], fields: &HeaderFields) {
    let spec = fields.spec;
    header[0..4].copy_from_slice(b"RIFF");
    LittleEndian::write_u32(&mut header[4..8], fields.riff_len);
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    LittleEndian::write_u32(&mut header[16..20], 16);
    LittleEndian::write_u16(&mut header[20..22], FORMAT_PCM);
    LittleEndian::write_u16(&mut header[22..24], spec.channels);
    LittleEndian::write_u32(&mut header[24..28], spec.sample_rate);
    LittleEndian::write_u32(&mut header[28..32], fields.byte_rate);
    LittleEndian::write_u16(&mut header[32..34], fields.block_align);
    LittleEndian::write_u16(&mut header[34..36], BITS_PER_SAMPLE);

    header[36..40].copy_from_slice(b"data");
    LittleEndian::write_u32(&mut header[40..44], fields.data_len);
}

// ---------------------------------------------------------------------------
// parse_header
// ---------------------------------------------------------------------------

/// Fields read back from a canonical header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub spec: WavSpec,
    pub data_len: u32,
}

impl WavHeader {
    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        match self.spec.byte_rate() {
            Some(rate) if rate > 0 => self.data_len as f32 / rate as f32,
            _ => 0.0,
        }
    }
}

/// Read the header written by [`transcode`].
///
/// Returns `None` for anything that is not a canonical 16-bit PCM header.
pub fn parse_header(bytes: &[u8]) -> Option<WavHeader> {
    if bytes.len() < WAV_HEADER_LEN
        || &bytes[0..4] != b"RIFF"
        || &bytes[8..12] != b"WAVE"
        || &bytes[12..16] != b"fmt "
        || &bytes[36..40] != b"data"
    {
        return None;
    }
    if LittleEndian::read_u16(&bytes[20..22]) != FORMAT_PCM
        || LittleEndian::read_u16(&bytes[34..36]) != BITS_PER_SAMPLE
    {
        return None;
    }

    Some(WavHeader {
        spec: WavSpec {
            sample_rate: LittleEndian::read_u32(&bytes[24..28]),
            channels: LittleEndian::read_u16(&bytes[22..24]),
        },
        data_len: LittleEndian::read_u32(&bytes[40..44]),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
