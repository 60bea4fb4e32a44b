//! Errors returned by [`GenerationService`](super::GenerationService)
//! implementations.

use thiserror::Error;

/// Messages the service uses when it rejects the caller's key.
const CREDENTIAL_MARKERS: [&str; 3] = [
    "API key not valid",
    "Requested entity was not found",
    "API_KEY_INVALID",
];

/// Errors that can occur while talking to the generation service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service rejected the credential (unauthorised, or the key cannot
    /// see the requested entity).
    #[error("credential rejected: {0}")]
    Credential(String),

    /// The response body could not be parsed as expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// An image edit returned no inline image part.
    #[error("No image data found in response")]
    NoResult,

    /// An image generation returned zero images.
    #[error("Image generation failed")]
    Generation,

    /// A speech request returned no audio part.
    #[error("Audio generation failed, no audio data received.")]
    NoAudio,

    /// A payload was not valid base64.
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Map a non-success HTTP response onto the taxonomy.
    ///
    /// `401`, `403` and `404` as well as any message carrying one of the
    /// service's invalid-key phrases become [`ServiceError::Credential`].
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        if matches!(status, 401 | 403 | 404) || is_credential_message(&message) {
            ServiceError::Credential(message)
        } else {
            ServiceError::Api { status, message }
        }
    }

    /// `true` for [`ServiceError::Credential`].
    pub fn is_credential(&self) -> bool {
        matches!(self, ServiceError::Credential(_))
    }
}

pub(crate) fn is_credential_message(message: &str) -> bool {
    CREDENTIAL_MARKERS.iter().any(|m| message.contains(m))
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_decode() {
            ServiceError::Parse(e.to_string())
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}

impl From<base64::DecodeError> for ServiceError {
    fn from(e: base64::DecodeError) -> Self {
        ServiceError::Decode(e.to_string())
    }
}
