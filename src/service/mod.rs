//! Generation service client.
//!
//! This module provides:
//! * [`GenerationService`] — async trait for the four remote tasks plus
//!   artifact download.
//! * [`GeminiService`] — REST implementation with an injected [`ApiKey`].
//! * Request types ([`VideoRequest`], [`InlineImage`]) and option enums.
//! * [`VideoJobHandle`] — typed snapshot of a long-running video operation.
//! * [`ServiceError`] — error variants for remote calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use creative_studio::config::AppConfig;
//! use creative_studio::service::{ApiKey, AspectRatio, GeminiService, GenerationService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let key = ApiKey::new("your-key").unwrap();
//!     let service = GeminiService::new(&config.service, key);
//!
//!     let image_b64 = service
//!         .generate_image("a lighthouse at dusk", AspectRatio::Landscape)
//!         .await
//!         .unwrap();
//!     println!("{} base64 chars", image_b64.len());
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// test-only scripted service shared by the video and studio test modules.
#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiKey, GeminiService, GenerationService, SPEECH_PROMPT_PREFIX};
pub use error::ServiceError;
pub use types::{
    decode_base64, AspectRatio, InlineImage, ParseOptionError, TtsVoice, VideoAspectRatio,
    VideoJobHandle, VideoRequest, VideoResolution,
};
