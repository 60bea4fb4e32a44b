//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides `service.api_key` at load time.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Model identifiers used for each generation task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Multimodal model that edits an uploaded image from a text prompt.
    pub image_edit: String,
    /// Text-to-image model.
    pub image_generate: String,
    /// Long-running text/image-to-video model.
    pub video: String,
    /// Text-to-speech model returning raw 16-bit PCM.
    pub speech: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            image_edit: "gemini-2.5-flash-image".into(),
            image_generate: "imagen-4.0-generate-001".into(),
            video: "veo-3.1-fast-generate-preview".into(),
            speech: "gemini-2.5-flash-preview-tts".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Connection settings for the hosted generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the REST endpoint, without a trailing slash.
    pub base_url: String,
    /// API key. `None` means "select one through the key selector" or rely on
    /// the `GEMINI_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Model names per task.
    pub models: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key: None,
            timeout_secs: 120,
            models: ModelConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoConfig
// ---------------------------------------------------------------------------

/// Scheduling settings for the video polling coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Seconds between two status polls of a running video job.
    pub poll_interval_secs: u64,
    /// Seconds between two rotations of the progress message.
    pub status_interval_secs: u64,
    /// Upper bound on the number of polls for one job. `0` polls until the
    /// service reports the job as done.
    pub max_poll_attempts: u32,
}

impl VideoConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }

    /// `max_poll_attempts` as a limit, `None` when unlimited.
    pub fn poll_limit(&self) -> Option<u32> {
        Some(self.max_poll_attempts).filter(|&n| n > 0)
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            status_interval_secs: 5,
            max_poll_attempts: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Format of the raw PCM returned by the speech model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate in Hz (the speech model emits 24 000).
    pub sample_rate: u32,
    /// Interleaved channel count (the speech model emits mono).
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where downloaded artifacts are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Target directory. `None` means the platform download directory.
    pub directory: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve the effective output directory.
    pub fn resolve(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| AppPaths::new().download_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use creative_studio::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation service connection settings.
    pub service: ServiceConfig,
    /// Video polling settings.
    pub video: VideoConfig,
    /// Speech PCM format.
    pub audio: AudioConfig,
    /// Artifact download settings.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml` and
    /// apply the `GEMINI_API_KEY` override.
    ///
    /// Returns the defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&AppPaths::new().settings_file)?;
        config.service.api_key =
            resolve_api_key(config.service.api_key.take(), std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// A non-empty environment value wins over the file value; empty strings
/// count as unset on both sides.
pub(crate) fn resolve_api_key(file: Option<String>, env: Option<String>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| file.filter(|k| !k.trim().is_empty()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
