//! Errors surfaced by the video polling coordinator.

use thiserror::Error;

use crate::service::ServiceError;

/// A status check failed.
#[derive(Debug, Clone, Error)]
pub enum PollError {
    /// The service rejected the key while polling (unauthorised or
    /// entity-not-found). Cached credential state must be invalidated.
    #[error("credential rejected while checking status: {0}")]
    Credential(String),

    /// Any other poll failure.
    #[error("status check failed: {0}")]
    Service(ServiceError),
}

impl From<ServiceError> for PollError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Credential(msg) => PollError::Credential(msg),
            other => PollError::Service(other),
        }
    }
}

/// Terminal failures of one video request.
#[derive(Debug, Clone, Error)]
pub enum VideoError {
    /// The service rejected the submission.
    #[error("video submission failed: {0}")]
    Submission(ServiceError),

    /// A status check failed; polling stopped.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// The job finished but downloading the video failed.
    #[error("video download failed: {0}")]
    Retrieval(ServiceError),

    /// The job finished without a usable result reference.
    #[error("Video generation completed but no download link was found.")]
    MissingResult {
        /// Error reported by the service for the finished operation, if any.
        reason: Option<String>,
    },

    /// The job was still running after the configured number of polls.
    #[error("video is still not ready after {attempts} status checks")]
    PollLimitExceeded { attempts: u32 },

    /// The caller cancelled the job.
    #[error("video generation was cancelled")]
    Cancelled,

    /// `wait` was called without a running or finished job.
    #[error("no video job has been submitted")]
    NoActiveJob,
}

impl VideoError {
    /// `true` when the failure means the key is bad, whether it surfaced on
    /// submission or while polling.
    pub fn is_credential(&self) -> bool {
        match self {
            VideoError::Submission(e) => e.is_credential(),
            VideoError::Poll(PollError::Credential(_)) => true,
            _ => false,
        }
    }
}
