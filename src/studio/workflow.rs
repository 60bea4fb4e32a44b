//! The four generation workflows behind one front-end-agnostic facade.
//!
//! ```text
//! edit_image      prompt + image ─▶ service.edit_image     ─▶ base64 ─▶ EditedImage
//! generate_image  prompt + ratio ─▶ service.generate_image ─▶ base64 ─▶ GeneratedImage
//! generate_video  gate ─▶ VideoCoordinator (submit/poll/fetch)      ─▶ GeneratedVideo
//! generate_audio  text + voice   ─▶ service.generate_audio ─▶ PCM ─▶ WAV ─▶ GeneratedAudio
//! ```
//!
//! Every failure ends up as one message in the task's [`TabState`]; the
//! in-progress result is cleared and credential failures during video
//! generation invalidate the [`CredentialGate`].

use std::sync::Arc;

use crate::audio::transcode;
use crate::config::AppConfig;
use crate::credential::CredentialGate;
use crate::service::{
    decode_base64, AspectRatio, GenerationService, InlineImage, TtsVoice, VideoRequest,
};
use crate::video::{JobState, VideoCanceller, VideoCoordinator};

use super::artifact::{Artifact, ArtifactKind};
use super::error::{
    StudioError, EDIT_INPUT_REQUIRED, PROMPT_REQUIRED, TEXT_REQUIRED, VIDEO_INPUT_REQUIRED,
};
use super::state::TabState;

pub struct Studio {
    service: Arc<dyn GenerationService>,
    gate: Arc<CredentialGate>,
    config: AppConfig,
    video: VideoCoordinator,
    tabs: [TabState; 4],
}

impl Studio {
    pub fn new(
        service: Arc<dyn GenerationService>,
        gate: Arc<CredentialGate>,
        config: AppConfig,
    ) -> Self {
        let video = VideoCoordinator::new(Arc::clone(&service), config.video.clone());
        Self {
            service,
            gate,
            config,
            video,
            tabs: Default::default(),
        }
    }

    pub fn tab(&self, kind: ArtifactKind) -> &TabState {
        &self.tabs[kind.index()]
    }

    fn tab_mut(&mut self, kind: ArtifactKind) -> &mut TabState {
        &mut self.tabs[kind.index()]
    }

    pub fn credential_gate(&self) -> &Arc<CredentialGate> {
        &self.gate
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Edit `image` according to `prompt`.
    pub async fn edit_image(
        &mut self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<&Artifact, StudioError> {
        let kind = ArtifactKind::EditedImage;
        let image = match image {
            Some(image) if !prompt.trim().is_empty() => image,
            _ => return Err(self.tab_mut(kind).reject(StudioError::Validation(EDIT_INPUT_REQUIRED))),
        };

        self.tab_mut(kind).begin();
        log::info!("studio: editing {} image", image.mime_type);
        let outcome = match self.service.edit_image(prompt, image).await {
            Ok(data) => decode_image(kind, &data),
            Err(e) => Err(e.into()),
        };
        self.tab_mut(kind).finish(outcome)
    }

    /// Generate an image from `prompt`.
    pub async fn generate_image(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<&Artifact, StudioError> {
        let kind = ArtifactKind::GeneratedImage;
        if prompt.trim().is_empty() {
            return Err(self.tab_mut(kind).reject(StudioError::Validation(PROMPT_REQUIRED)));
        }

        self.tab_mut(kind).begin();
        log::info!("studio: generating {aspect_ratio} image");
        let outcome = match self.service.generate_image(prompt, aspect_ratio).await {
            Ok(data) => decode_image(kind, &data),
            Err(e) => Err(e.into()),
        };
        self.tab_mut(kind).finish(outcome)
    }

    // -----------------------------------------------------------------------
    // Video
    // -----------------------------------------------------------------------

    /// Run a video job to completion.
    ///
    /// Requires a selected key; a credential failure resets the gate so the
    /// next attempt asks for a new one.
    pub async fn generate_video(&mut self, request: &VideoRequest) -> Result<&Artifact, StudioError> {
        let kind = ArtifactKind::GeneratedVideo;
        if request.prompt.trim().is_empty() && request.image.is_none() {
            return Err(self.tab_mut(kind).reject(StudioError::Validation(VIDEO_INPUT_REQUIRED)));
        }

        if self.gate.is_checking() {
            self.gate.check().await;
        }
        if !self.gate.is_available() {
            return Err(self.tab_mut(kind).reject(StudioError::CredentialRequired));
        }

        self.tab_mut(kind).begin();
        let outcome = match self.video.run(request).await {
            Ok(bytes) => Ok(Artifact::new(kind, bytes)),
            Err(e) => {
                if e.is_credential() {
                    self.gate.reset();
                }
                Err(e.into())
            }
        };
        self.tab_mut(kind).finish(outcome)
    }

    /// Handle that stops the running video job from another task.
    pub fn video_canceller(&self) -> VideoCanceller {
        self.video.canceller()
    }

    pub fn cancel_video(&self) {
        self.video.cancel();
    }

    pub fn video_state(&self) -> JobState {
        self.video.state()
    }

    pub fn video_status(&self) -> &'static str {
        self.video.status_message()
    }

    /// The coordinator, for subscribing to state and status updates.
    pub fn video(&self) -> &VideoCoordinator {
        &self.video
    }

    // -----------------------------------------------------------------------
    // Audio
    // -----------------------------------------------------------------------

    /// Synthesize `text` and wrap the PCM in a WAV container.
    pub async fn generate_audio(&mut self, text: &str, voice: TtsVoice) -> Result<&Artifact, StudioError> {
        let kind = ArtifactKind::GeneratedAudio;
        if text.trim().is_empty() {
            return Err(self.tab_mut(kind).reject(StudioError::Validation(TEXT_REQUIRED)));
        }

        self.tab_mut(kind).begin();
        log::info!("studio: synthesizing speech with voice {voice}");
        let outcome = self.synthesize(text, voice).await;
        self.tab_mut(kind).finish(outcome)
    }

    async fn synthesize(&self, text: &str, voice: TtsVoice) -> Result<Artifact, StudioError> {
        let encoded = self.service.generate_audio(text, voice).await?;
        let pcm = decode_base64(&encoded)?;
        let audio = &self.config.audio;
        let wav = transcode(&pcm, audio.sample_rate, audio.channels)?;
        Ok(Artifact::new(ArtifactKind::GeneratedAudio, wav))
    }
}

fn decode_image(kind: ArtifactKind, data: &str) -> Result<Artifact, StudioError> {
    Ok(Artifact::new(kind, decode_base64(data)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
