//! Core `GenerationService` trait and the `GeminiService` REST client.
//!
//! `GeminiService` speaks the Generative Language REST API. Connection
//! details come from [`ServiceConfig`]; the API key is injected explicitly at
//! construction and never read from the environment mid-call.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::ServiceConfig;

use super::error::ServiceError;
use super::types::{AspectRatio, InlineImage, TtsVoice, VideoJobHandle, VideoRequest};

/// Prefix prepended to every text-to-speech prompt.
pub const SPEECH_PROMPT_PREFIX: &str = "Say with a clear and engaging tone: ";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// ApiKey
// ---------------------------------------------------------------------------

/// An API key whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for empty or whitespace-only keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key.trim().to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ---------------------------------------------------------------------------
// GenerationService trait
// ---------------------------------------------------------------------------

/// The hosted generation service, treated as an opaque remote collaborator.
///
/// Implementors must be `Send + Sync` so they can be shared behind
/// `Arc<dyn GenerationService>` between the workflow layer and the video
/// polling task.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Edit `image` according to `prompt`; returns base64 image bytes.
    async fn edit_image(&self, prompt: &str, image: &InlineImage) -> Result<String, ServiceError>;

    /// Generate one JPEG image; returns base64 image bytes.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError>;

    /// Start a long-running video job.
    async fn submit_video_job(&self, request: &VideoRequest)
        -> Result<VideoJobHandle, ServiceError>;

    /// Fetch the latest snapshot of a video job. Has no side effect on the
    /// job itself.
    async fn poll_video_job(&self, handle: &VideoJobHandle)
        -> Result<VideoJobHandle, ServiceError>;

    /// Download a finished artifact by its result reference.
    async fn fetch_artifact(&self, uri: &str) -> Result<Vec<u8>, ServiceError>;

    /// Synthesize speech; returns base64 raw 16-bit PCM.
    async fn generate_audio(&self, text: &str, voice: TtsVoice) -> Result<String, ServiceError>;
}

// Compile-time assertion: Box<dyn GenerationService> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn GenerationService>) {}
};

// ---------------------------------------------------------------------------
// Request bodies / response parsing
// ---------------------------------------------------------------------------

fn edit_image_body(prompt: &str, image: &InlineImage) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "data": image.data_base64, "mimeType": image.mime_type } },
                { "text": prompt }
            ]
        }],
        "generationConfig": { "responseModalities": ["IMAGE"] }
    })
}

fn generate_image_body(prompt: &str, aspect_ratio: AspectRatio) -> Value {
    json!({
        "instances": [{ "prompt": prompt }],
        "parameters": {
            "sampleCount": 1,
            "outputMimeType": "image/jpeg",
            "aspectRatio": aspect_ratio.as_str()
        }
    })
}

fn video_body(request: &VideoRequest) -> Value {
    let mut instance = json!({ "prompt": request.prompt });
    if let Some(image) = &request.image {
        instance["image"] = json!({
            "bytesBase64Encoded": image.data_base64,
            "mimeType": image.mime_type
        });
    }
    json!({
        "instances": [instance],
        "parameters": {
            "sampleCount": 1,
            "aspectRatio": request.aspect_ratio.as_str(),
            "resolution": request.resolution.as_str()
        }
    })
}

fn speech_body(text: &str, voice: TtsVoice) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": format!("{SPEECH_PROMPT_PREFIX}{text}") }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice.as_str() } }
            }
        }
    })
}

/// First inline-data payload among the first candidate's parts.
fn first_inline_data(json: &Value) -> Option<String> {
    json["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| part["inlineData"]["data"].as_str())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn first_prediction(json: &Value) -> Option<String> {
    json["predictions"]
        .as_array()?
        .first()?["bytesBase64Encoded"]
        .as_str()
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// GeminiService
// ---------------------------------------------------------------------------

/// Calls the Generative Language REST API.
pub struct GeminiService {
    client: reqwest::Client,
    config: ServiceConfig,
    api_key: ApiKey,
}

impl GeminiService {
    /// Build a client from config and an explicitly supplied key.
    ///
    /// The HTTP client is pre-configured with `config.timeout_secs`; a default
    /// client is used if the builder fails.
    pub fn new(config: &ServiceConfig, api_key: ApiKey) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    fn operation_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ServiceError> {
        log::debug!("service: POST {url}");
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_json(&self, url: &str) -> Result<Value, ServiceError> {
        log::debug!("service: GET {url}");
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_response(status.as_u16(), &body));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl GenerationService for GeminiService {
    async fn edit_image(&self, prompt: &str, image: &InlineImage) -> Result<String, ServiceError> {
        let url = self.model_url(&self.config.models.image_edit, "generateContent");
        let json = self.post_json(&url, &edit_image_body(prompt, image)).await?;
        first_inline_data(&json).ok_or(ServiceError::NoResult)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError> {
        let url = self.model_url(&self.config.models.image_generate, "predict");
        let json = self
            .post_json(&url, &generate_image_body(prompt, aspect_ratio))
            .await?;
        first_prediction(&json).ok_or(ServiceError::Generation)
    }

    async fn submit_video_job(
        &self,
        request: &VideoRequest,
    ) -> Result<VideoJobHandle, ServiceError> {
        let url = self.model_url(&self.config.models.video, "predictLongRunning");
        let json = self.post_json(&url, &video_body(request)).await?;
        let handle = VideoJobHandle::from_operation(&json)?;
        log::info!("service: video job submitted as {}", handle.name);
        Ok(handle)
    }

    async fn poll_video_job(
        &self,
        handle: &VideoJobHandle,
    ) -> Result<VideoJobHandle, ServiceError> {
        let json = self.get_json(&self.operation_url(&handle.name)).await?;
        VideoJobHandle::from_operation(&json)
    }

    async fn fetch_artifact(&self, uri: &str) -> Result<Vec<u8>, ServiceError> {
        log::debug!("service: downloading artifact");
        let response = self
            .client
            .get(uri)
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_response(status.as_u16(), &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn generate_audio(&self, text: &str, voice: TtsVoice) -> Result<String, ServiceError> {
        let url = self.model_url(&self.config.models.speech, "generateContent");
        let json = self.post_json(&url, &speech_body(text, voice)).await?;
        first_inline_data(&json).ok_or(ServiceError::NoAudio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
