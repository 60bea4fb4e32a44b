//! Request and response types shared by every generation backend.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::error::ServiceError;

// ---------------------------------------------------------------------------
// Option enums
// ---------------------------------------------------------------------------

/// Error returned when a CLI / config string names no known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: String,
}

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a wire-string enum.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string sent to the service.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

/// Aspect ratio of a generated still image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    Tall,
}

wire_enum!(AspectRatio, "aspect ratio", {
    Square => "1:1",
    Landscape => "16:9",
    Portrait => "9:16",
    Standard => "4:3",
    Tall => "3:4",
});

/// Aspect ratio of a generated video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoAspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

wire_enum!(VideoAspectRatio, "video aspect ratio", {
    Landscape => "16:9",
    Portrait => "9:16",
});

/// Output resolution of a generated video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoResolution {
    #[serde(rename = "720p")]
    Hd,
    #[default]
    #[serde(rename = "1080p")]
    FullHd,
}

wire_enum!(VideoResolution, "resolution", {
    Hd => "720p",
    FullHd => "1080p",
});

/// Prebuilt speech voices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TtsVoice {
    #[default]
    Kore,
    Puck,
    Zephyr,
    Charon,
    Fenrir,
}

wire_enum!(TtsVoice, "voice", {
    Kore => "Kore",
    Puck => "Puck",
    Zephyr => "Zephyr",
    Charon => "Charon",
    Fenrir => "Fenrir",
});

// ---------------------------------------------------------------------------
// InlineImage
// ---------------------------------------------------------------------------

/// An image sent inline with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Base64 (standard alphabet, padded) image bytes.
    pub data_base64: String,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
}

impl InlineImage {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data_base64: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let mime = mime_for_path(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported image type: {}", path.display()),
            )
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, mime))
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Decode a base64 payload returned by the service.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, ServiceError> {
    Ok(STANDARD.decode(data.trim())?)
}

// ---------------------------------------------------------------------------
// VideoRequest / VideoJobHandle
// ---------------------------------------------------------------------------

/// Parameters of a video-generation job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRequest {
    pub prompt: String,
    /// Optional still image to animate.
    pub image: Option<InlineImage>,
    pub aspect_ratio: VideoAspectRatio,
    pub resolution: VideoResolution,
}

/// Snapshot of a long-running video operation.
///
/// Produced only by the service boundary: the submission returns the first
/// snapshot and every poll replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJobHandle {
    /// Server operation name used for polling.
    pub name: String,
    /// Whether the operation reached a terminal state.
    pub done: bool,
    /// Download reference of the generated video, set only once `done`.
    pub result_uri: Option<String>,
    /// Error reported by the server for a finished operation.
    pub error: Option<String>,
}

impl VideoJobHandle {
    /// Validate an operation object.
    ///
    /// ```json
    /// { "name": "models/veo/operations/abc", "done": true,
    ///   "response": { "generateVideoResponse": {
    ///       "generatedSamples": [ { "video": { "uri": "https://…" } } ] } } }
    /// ```
    pub fn from_operation(json: &serde_json::Value) -> Result<Self, ServiceError> {
        let name = json["name"]
            .as_str()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::Parse("operation has no name".into()))?
            .to_string();
        let done = json["done"].as_bool().unwrap_or(false);

        let result_uri = if done {
            json["response"]["generateVideoResponse"]["generatedSamples"][0]["video"]["uri"]
                .as_str()
                .filter(|u| !u.is_empty())
                .map(str::to_string)
        } else {
            None
        };

        let error = json["error"]["message"].as_str().map(str::to_string);

        Ok(Self {
            name,
            done,
            result_uri,
            error,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
