//! Scripted [`GenerationService`] for unit tests.
//!
//! Every call is counted. Poll responses are served from a queue; once the
//! queue is empty the job keeps reporting "not done".

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::client::GenerationService;
use super::error::ServiceError;
use super::types::{AspectRatio, InlineImage, TtsVoice, VideoJobHandle, VideoRequest};

pub struct MockService {
    pub submit_result: Mutex<Result<VideoJobHandle, ServiceError>>,
    pub polls: Mutex<VecDeque<Result<VideoJobHandle, ServiceError>>>,
    pub artifacts: Mutex<HashMap<String, Result<Vec<u8>, ServiceError>>>,
    pub image_result: Mutex<Result<String, ServiceError>>,
    pub audio_result: Mutex<Result<String, ServiceError>>,
    /// Simulated latency of each call.
    pub submit_delay: Option<Duration>,
    pub poll_delay: Option<Duration>,
    pub fetch_delay: Option<Duration>,

    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub audio_calls: AtomicUsize,
    pub last_request: Mutex<Option<VideoRequest>>,
    pub last_voice: Mutex<Option<TtsVoice>>,
}

pub fn pending(name: &str) -> VideoJobHandle {
    VideoJobHandle {
        name: name.into(),
        done: false,
        result_uri: None,
        error: None,
    }
}

pub fn finished(name: &str, uri: Option<&str>) -> VideoJobHandle {
    VideoJobHandle {
        name: name.into(),
        done: true,
        result_uri: uri.map(str::to_string),
        error: None,
    }
}

impl MockService {
    pub fn new() -> Self {
        Self {
            submit_result: Mutex::new(Ok(pending("operations/test"))),
            polls: Mutex::new(VecDeque::new()),
            artifacts: Mutex::new(HashMap::new()),
            image_result: Mutex::new(Ok("aW1hZ2U=".into())),
            audio_result: Mutex::new(Ok(String::new())),
            submit_delay: None,
            poll_delay: None,
            fetch_delay: None,
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            audio_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_voice: Mutex::new(None),
        }
    }

    pub fn with_polls(self, polls: Vec<Result<VideoJobHandle, ServiceError>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn with_artifact(self, uri: &str, result: Result<Vec<u8>, ServiceError>) -> Self {
        self.artifacts.lock().unwrap().insert(uri.into(), result);
        self
    }

    pub fn with_submit(self, result: Result<VideoJobHandle, ServiceError>) -> Self {
        *self.submit_result.lock().unwrap() = result;
        self
    }

    pub fn with_image(self, result: Result<String, ServiceError>) -> Self {
        *self.image_result.lock().unwrap() = result;
        self
    }

    pub fn with_audio(self, result: Result<String, ServiceError>) -> Self {
        *self.audio_result.lock().unwrap() = result;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = Some(delay);
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn poll_count(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for MockService {
    async fn edit_image(&self, _prompt: &str, _image: &InlineImage) -> Result<String, ServiceError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_result.lock().unwrap().clone()
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_result.lock().unwrap().clone()
    }

    async fn submit_video_job(
        &self,
        request: &VideoRequest,
    ) -> Result<VideoJobHandle, ServiceError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        self.submit_result.lock().unwrap().clone()
    }

    async fn poll_video_job(
        &self,
        handle: &VideoJobHandle,
    ) -> Result<VideoJobHandle, ServiceError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.poll_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.polls.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(pending(&handle.name)))
    }

    async fn fetch_artifact(&self, uri: &str) -> Result<Vec<u8>, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.artifacts
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .unwrap_or_else(|| {
                Err(ServiceError::Api {
                    status: 404,
                    message: format!("no artifact at {uri}"),
                })
            })
    }

    async fn generate_audio(&self, _text: &str, voice: TtsVoice) -> Result<String, ServiceError> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_voice.lock().unwrap() = Some(voice);
        self.audio_result.lock().unwrap().clone()
    }
}
