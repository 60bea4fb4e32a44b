//! Workflow failures. `Display` is the message shown to the user.

use thiserror::Error;

use crate::audio::AudioError;
use crate::service::ServiceError;
use crate::video::{PollError, VideoError};

pub const EDIT_INPUT_REQUIRED: &str = "Please enter a prompt and upload an image.";
pub const PROMPT_REQUIRED: &str = "Please enter a prompt.";
pub const VIDEO_INPUT_REQUIRED: &str =
    "Please enter a prompt or upload an image to generate a video.";
pub const TEXT_REQUIRED: &str = "Please enter text to generate audio.";

#[derive(Debug, Clone, Error)]
pub enum StudioError {
    /// Input rejected before any remote call.
    #[error("{0}")]
    Validation(&'static str),

    /// Video generation needs a selected key and none is available.
    #[error("An API key is required for video generation. Please select your API key.")]
    CredentialRequired,

    #[error("{}", video_message(.0))]
    Video(VideoError),

    #[error("An error occurred: {0}")]
    Service(#[from] ServiceError),

    #[error("An error occurred: {0}")]
    Audio(#[from] AudioError),
}

impl StudioError {
    /// `true` when the user has to select a (different) key before retrying.
    pub fn needs_key_selection(&self) -> bool {
        match self {
            StudioError::CredentialRequired => true,
            StudioError::Video(e) => e.is_credential(),
            _ => false,
        }
    }
}

impl From<VideoError> for StudioError {
    fn from(e: VideoError) -> Self {
        StudioError::Video(e)
    }
}

fn video_message(e: &VideoError) -> String {
    match e {
        VideoError::Poll(PollError::Credential(_)) => {
            "API Key error. Please re-select your API key.".to_string()
        }
        VideoError::Submission(s) if s.is_credential() => {
            "Your API Key is not valid. Please select a valid key.".to_string()
        }
        VideoError::Submission(s) => format!("An error occurred: {s}"),
        VideoError::Poll(PollError::Service(s)) | VideoError::Retrieval(s) => {
            format!("An error occurred while checking status: {s}")
        }
        VideoError::MissingResult { .. } | VideoError::PollLimitExceeded { .. } => {
            format!("An error occurred while checking status: {e}")
        }
        VideoError::Cancelled => "Video generation was cancelled.".to_string(),
        VideoError::NoActiveJob => format!("An error occurred: {e}"),
    }
}
