//! Speech audio — raw 16-bit PCM → normalised samples → WAV container.
//!
//! # Pipeline
//!
//! ```text
//! base64 PCM (service) → bytes → decode_pcm16 → PcmBuffer (f32, per channel)
//!                                             → quantize_sample → WAV payload
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use creative_studio::audio::{parse_header, transcode, WavSpec};
//!
//! let pcm = vec![0u8; 48_000]; // 1 s of 24 kHz mono silence
//! let wav = transcode(&pcm, 24_000, 1).unwrap();
//! let header = parse_header(&wav).unwrap();
//! assert_eq!(header.spec, WavSpec::SPEECH);
//! ```

pub mod pcm;
pub mod wav;

pub use pcm::{decode_pcm16, frame_count, quantize_sample, AudioError, PcmBuffer};
pub use wav::{parse_header, transcode, WavHeader, WavSpec, WAV_HEADER_LEN};
