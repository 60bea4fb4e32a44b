//! Creative studio: image editing, image generation, long-running video
//! generation and text-to-speech against a remote generation service.
//!
//! * [`service`] — the remote API behind the [`service::GenerationService`] trait.
//! * [`video`] — submit/poll/download coordinator for video jobs.
//! * [`audio`] — raw 16-bit PCM to WAV transcoding.
//! * [`credential`] — cached "key selected" gate for video generation.
//! * [`studio`] — per-task workflows and user-facing error messages.
//! * [`config`] — `settings.toml` persistence.

pub mod audio;
pub mod config;
pub mod credential;
pub mod service;
pub mod studio;
pub mod video;
