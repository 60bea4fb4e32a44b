//! Video polling coordinator — submit, poll on a fixed interval, download.
//!
//! [`VideoCoordinator`] owns everything a running job needs: the poll task,
//! the status-message task and the [`CancellationToken`] that stops both.
//! Nothing is global; dropping the coordinator cancels its job.
//!
//! # Job flow
//!
//! ```text
//! submit()
//!   └─▶ service.submit_video_job                 [Submitting]
//!         ├─ Err → Submission error              [Failed]
//!         └─ Ok  → spawn poll task + ticker      [Polling]
//!
//! poll task (every poll_interval, serialized)
//!   └─▶ service.poll_video_job
//!         ├─ Err                → Poll error     [Failed]
//!         ├─ !done              → wait next tick (or PollLimitExceeded)
//!         ├─ done, no uri       → MissingResult  [Failed]
//!         └─ done, uri          → fetch_artifact [Retrieving]
//!               ├─ Ok  → bytes                   [Succeeded]
//!               └─ Err → Retrieval error         [Failed]
//!
//! cancel() / drop  → token cancelled             [Cancelled]
//! ```
//!
//! A poll that is already in flight when `cancel()` runs is not aborted, but
//! its response is discarded.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::VideoConfig;
use crate::service::{GenerationService, VideoJobHandle, VideoRequest};

use super::error::{PollError, VideoError};
use super::state::JobState;
use super::status::{run_status_ticker, LOADING_MESSAGES};

type Outcome = Result<Vec<u8>, VideoError>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// State shared between the coordinator, its tasks and cancel handles.
struct Shared {
    state: watch::Sender<JobState>,
    status: watch::Sender<&'static str>,
    polls: AtomicU32,
    /// Incremented on every submit so tasks of a superseded job cannot touch
    /// the state of the current one.
    generation: AtomicU64,
    token: Mutex<CancellationToken>,
}

impl Shared {
    fn cancel(&self) {
        lock(&self.token).cancel();
        let changed = self.state.send_if_modified(|s| {
            if s.is_active() {
                *s = JobState::Cancelled;
                true
            } else {
                false
            }
        });
        if changed {
            log::info!("video: job cancelled");
        }
    }

    /// Move job `generation` to `to` unless it was superseded or has already
    /// ended.
    fn transition(&self, generation: u64, to: JobState) -> bool {
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) == generation && s.is_active() {
                log::debug!("video: {} -> {}", s.label(), to.label());
                *s = to;
                true
            } else {
                false
            }
        })
    }
}

// ---------------------------------------------------------------------------
// VideoCanceller
// ---------------------------------------------------------------------------

/// Cloneable handle that cancels whatever job the coordinator is running.
///
/// Useful when the coordinator itself is borrowed by a pending `wait()`.
#[derive(Clone)]
pub struct VideoCanceller {
    shared: Arc<Shared>,
}

impl VideoCanceller {
    pub fn cancel(&self) {
        self.shared.cancel();
    }
}

// ---------------------------------------------------------------------------
// VideoCoordinator
// ---------------------------------------------------------------------------

/// Drives one long-running video-generation request at a time.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use creative_studio::config::AppConfig;
/// use creative_studio::service::{ApiKey, GeminiService, VideoRequest};
/// use creative_studio::video::VideoCoordinator;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let service = Arc::new(GeminiService::new(&config.service, ApiKey::new("key").unwrap()));
/// let coordinator = VideoCoordinator::new(service, config.video.clone());
///
/// let request = VideoRequest { prompt: "a paper boat in the rain".into(), ..Default::default() };
/// coordinator.submit(&request).await.unwrap();
/// let mp4 = coordinator.wait().await.unwrap();
/// # }
/// ```
pub struct VideoCoordinator {
    service: Arc<dyn GenerationService>,
    config: VideoConfig,
    shared: Arc<Shared>,
    outcome: Mutex<Option<oneshot::Receiver<Outcome>>>,
}

impl VideoCoordinator {
    pub fn new(service: Arc<dyn GenerationService>, config: VideoConfig) -> Self {
        let (state, _) = watch::channel(JobState::Idle);
        let (status, _) = watch::channel(LOADING_MESSAGES[0]);
        Self {
            service,
            config,
            shared: Arc::new(Shared {
                state,
                status,
                polls: AtomicU32::new(0),
                generation: AtomicU64::new(0),
                token: Mutex::new(CancellationToken::new()),
            }),
            outcome: Mutex::new(None),
        }
    }

    /// Current state of the latest job.
    pub fn state(&self) -> JobState {
        *self.shared.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.shared.state.subscribe()
    }

    /// Current rotating progress message.
    pub fn status_message(&self) -> &'static str {
        *self.shared.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<&'static str> {
        self.shared.status.subscribe()
    }

    /// Status checks issued for the latest job.
    pub fn polls_issued(&self) -> u32 {
        self.shared.polls.load(Ordering::SeqCst)
    }

    pub fn canceller(&self) -> VideoCanceller {
        VideoCanceller {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Stop polling and the status ticker, whatever the current state.
    ///
    /// When this returns no further status check is started for the job.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Submit `request` and start polling.
    ///
    /// Any previous job owned by this coordinator is cancelled first.
    pub async fn submit(&self, request: &VideoRequest) -> Result<VideoJobHandle, VideoError> {
        self.shared.cancel();

        let token = CancellationToken::new();
        let generation = {
            let mut current = lock(&self.shared.token);
            *current = token.clone();
            self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        *lock(&self.outcome) = None;
        self.shared.polls.store(0, Ordering::SeqCst);
        self.shared.status.send_replace(LOADING_MESSAGES[0]);
        self.shared.state.send_replace(JobState::Submitting);

        log::info!(
            "video: submitting job ({}, {}, seed image: {})",
            request.aspect_ratio,
            request.resolution,
            request.image.is_some()
        );

        let shared = Arc::clone(&self.shared);
        tokio::spawn(run_status_ticker(
            token.clone(),
            self.config.status_interval(),
            move |msg| {
                shared.status.send_replace(msg);
            },
        ));

        // Installed before the first await so `wait` reports how this job
        // ended even when it never reached polling.
        let (tx, rx) = oneshot::channel();
        *lock(&self.outcome) = Some(rx);

        let submitted = self.service.submit_video_job(request).await;

        if token.is_cancelled() {
            log::debug!("video: submission returned after cancel; ignoring");
            let _ = tx.send(Err(VideoError::Cancelled));
            return Err(VideoError::Cancelled);
        }

        let handle = match submitted {
            Ok(handle) => handle,
            Err(e) => {
                token.cancel();
                self.shared.transition(generation, JobState::Failed);
                log::error!("video: submission rejected: {e}");
                let _ = tx.send(Err(VideoError::Submission(e.clone())));
                return Err(VideoError::Submission(e));
            }
        };

        self.shared.transition(generation, JobState::Polling);

        let job = PollJob {
            service: Arc::clone(&self.service),
            shared: Arc::clone(&self.shared),
            token,
            generation,
            period: self.config.poll_interval(),
            max_attempts: self.config.poll_limit(),
        };
        tokio::spawn(job.run(handle.clone(), tx));

        Ok(handle)
    }

    /// Wait for the submitted job to end and return the video bytes.
    pub async fn wait(&self) -> Result<Vec<u8>, VideoError> {
        let rx = lock(&self.outcome).take();
        match rx {
            Some(rx) => rx.await.unwrap_or(Err(VideoError::Cancelled)),
            None => Err(VideoError::NoActiveJob),
        }
    }

    /// `submit` followed by `wait`.
    pub async fn run(&self, request: &VideoRequest) -> Result<Vec<u8>, VideoError> {
        self.submit(request).await?;
        self.wait().await
    }
}

impl Drop for VideoCoordinator {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

// ---------------------------------------------------------------------------
// PollJob
// ---------------------------------------------------------------------------

/// The recurring status check of one submitted job.
struct PollJob {
    service: Arc<dyn GenerationService>,
    shared: Arc<Shared>,
    token: CancellationToken,
    generation: u64,
    period: Duration,
    max_attempts: Option<u32>,
}

impl PollJob {
    async fn run(self, mut handle: VideoJobHandle, outcome: oneshot::Sender<Outcome>) {
        // The ticker shares the token, so it stops whenever polling ends.
        let _stop_ticker = self.token.clone().drop_guard();

        let result = self.poll_until_done(&mut handle).await;

        // The outcome must agree with the recorded state: a job cancelled
        // after its last check still reports `Cancelled`.
        let result = match result {
            Ok(bytes) if self.shared.transition(self.generation, JobState::Succeeded) => {
                log::info!("video: {} finished ({} bytes)", handle.name, bytes.len());
                Ok(bytes)
            }
            Err(VideoError::Cancelled) => {
                log::debug!("video: {} stopped after cancel", handle.name);
                Err(VideoError::Cancelled)
            }
            Err(e) if self.shared.transition(self.generation, JobState::Failed) => {
                log::error!("video: {} failed: {e}", handle.name);
                Err(e)
            }
            _ => {
                log::debug!("video: {} ended after cancel; outcome discarded", handle.name);
                Err(VideoError::Cancelled)
            }
        };

        // The receiver is gone when the coordinator was dropped.
        let _ = outcome.send(result);
    }

    async fn poll_until_done(&self, handle: &mut VideoJobHandle) -> Outcome {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        // Polls never overlap: a slow response delays the next tick instead
        // of queueing a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut attempts: u32 = 0;
        let uri = loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return Err(VideoError::Cancelled),
                _ = ticker.tick() => {}
            }

            attempts += 1;
            self.shared.polls.fetch_add(1, Ordering::SeqCst);
            log::debug!("video: status check #{attempts} for {}", handle.name);

            let polled = self.service.poll_video_job(handle).await;
            if self.token.is_cancelled() {
                log::debug!("video: discarding status received after cancel");
                return Err(VideoError::Cancelled);
            }
            *handle = polled.map_err(PollError::from)?;

            if handle.done {
                match handle.result_uri.clone() {
                    Some(uri) => break uri,
                    None => {
                        return Err(VideoError::MissingResult {
                            reason: handle.error.clone(),
                        })
                    }
                }
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(VideoError::PollLimitExceeded { attempts });
            }
        };

        self.shared.transition(self.generation, JobState::Retrieving);
        let fetched = self.service.fetch_artifact(&uri).await;
        if self.token.is_cancelled() {
            return Err(VideoError::Cancelled);
        }
        fetched.map_err(VideoError::Retrieval)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::mock::{finished, pending, MockService};
    use crate::service::{ServiceError, VideoAspectRatio, VideoResolution};

    fn request() -> VideoRequest {
        VideoRequest {
            prompt: "a neon hologram of a cat driving".into(),
            image: None,
            aspect_ratio: "16:9".parse().unwrap(),
            resolution: "1080p".parse().unwrap(),
        }
    }

    fn coordinator(svc: &Arc<MockService>) -> VideoCoordinator {
        VideoCoordinator::new(svc.clone(), VideoConfig::default())
    }

    async fn sleep_secs(secs: f64) {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_two_pending_then_done() {
        let svc = Arc::new(
            MockService::new()
                .with_polls(vec![
                    Ok(pending("op")),
                    Ok(pending("op")),
                    Ok(finished("op", Some("X"))),
                ])
                .with_artifact("X", Ok(b"mp4-bytes".to_vec())),
        );
        let coord = coordinator(&svc);

        coord.submit(&request()).await.unwrap();
        assert_eq!(coord.state(), JobState::Polling);

        let bytes = coord.wait().await.unwrap();
        assert_eq!(bytes, b"mp4-bytes");
        assert_eq!(svc.poll_count(), 3);
        assert_eq!(svc.fetch_count(), 1);
        assert_eq!(coord.polls_issued(), 3);
        assert_eq!(coord.state(), JobState::Succeeded);

        let sent = svc.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.aspect_ratio, VideoAspectRatio::Landscape);
        assert_eq!(sent.resolution, VideoResolution::FullHd);

        // Timers are gone once the job ended.
        sleep_secs(120.0).await;
        assert_eq!(svc.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_poll_waits_one_interval() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        sleep_secs(9.5).await;
        assert_eq!(svc.poll_count(), 0);
        sleep_secs(1.0).await;
        assert_eq!(svc.poll_count(), 1);
        sleep_secs(10.0).await;
        assert_eq!(svc.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_freezes_poll_count() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        sleep_secs(15.0).await;
        assert_eq!(svc.poll_count(), 1);

        coord.cancel();
        assert_eq!(coord.state(), JobState::Cancelled);

        sleep_secs(300.0).await;
        assert_eq!(svc.poll_count(), 1);
        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn response_arriving_after_cancel_is_discarded() {
        let svc = Arc::new(
            MockService::new()
                .with_poll_delay(Duration::from_secs(5))
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact("X", Ok(vec![1, 2, 3])),
        );
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        // The first poll starts at 10 s and answers at 15 s.
        sleep_secs(12.0).await;
        assert_eq!(svc.poll_count(), 1);
        coord.cancel();

        sleep_secs(30.0).await;
        assert_eq!(coord.state(), JobState::Cancelled);
        assert_eq!(svc.poll_count(), 1);
        assert_eq!(svc.fetch_count(), 0);
        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn canceller_handle_stops_job() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        let canceller = coord.canceller();
        coord.submit(&request()).await.unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(25)).await;
            canceller.cancel();
        });

        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
        assert_eq!(svc.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_coordinator_stops_polling_and_ticker() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();
        let status = coord.subscribe_status();

        drop(coord);
        sleep_secs(120.0).await;

        assert_eq!(svc.poll_count(), 0);
        assert_eq!(*status.borrow(), LOADING_MESSAGES[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn done_without_uri_is_missing_result() {
        let svc = Arc::new(MockService::new().with_polls(vec![Ok(finished("op", None))]));
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        let err = coord.wait().await.unwrap_err();
        assert!(matches!(err, VideoError::MissingResult { reason: None }));
        assert_eq!(coord.state(), JobState::Failed);
        assert_eq!(svc.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_result_carries_operation_error() {
        let mut op = finished("op", None);
        op.error = Some("prompt blocked".into());
        let svc = Arc::new(MockService::new().with_polls(vec![Ok(op)]));
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        match coord.wait().await {
            Err(VideoError::MissingResult { reason }) => {
                assert_eq!(reason.as_deref(), Some("prompt blocked"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn entity_not_found_is_credential_error() {
        let svc = Arc::new(MockService::new().with_polls(vec![Err(ServiceError::Credential(
            "Requested entity was not found.".into(),
        ))]));
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        let err = coord.wait().await.unwrap_err();
        assert!(matches!(err, VideoError::Poll(PollError::Credential(_))));
        assert!(err.is_credential());
        assert_eq!(coord.state(), JobState::Failed);

        sleep_secs(60.0).await;
        assert_eq!(svc.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn other_poll_error_is_terminal() {
        let svc = Arc::new(MockService::new().with_polls(vec![
            Ok(pending("op")),
            Err(ServiceError::Timeout),
        ]));
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        let err = coord.wait().await.unwrap_err();
        assert!(matches!(
            err,
            VideoError::Poll(PollError::Service(ServiceError::Timeout))
        ));
        sleep_secs(60.0).await;
        assert_eq!(svc.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn download_failure_does_not_resume_polling() {
        let svc = Arc::new(
            MockService::new()
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact(
                    "X",
                    Err(ServiceError::Api {
                        status: 500,
                        message: "boom".into(),
                    }),
                ),
        );
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        let err = coord.wait().await.unwrap_err();
        assert!(matches!(err, VideoError::Retrieval(_)));
        assert_eq!(coord.state(), JobState::Failed);

        sleep_secs(60.0).await;
        assert_eq!(svc.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_submission_fails_without_polling() {
        let svc = Arc::new(
            MockService::new().with_submit(Err(ServiceError::Credential("API key not valid".into()))),
        );
        let coord = coordinator(&svc);

        let err = coord.submit(&request()).await.unwrap_err();
        assert!(matches!(err, VideoError::Submission(_)));
        assert!(err.is_credential());
        assert_eq!(coord.state(), JobState::Failed);

        sleep_secs(60.0).await;
        assert_eq!(svc.poll_count(), 0);
        assert!(matches!(coord.wait().await, Err(VideoError::Submission(_))));
        assert!(matches!(coord.wait().await, Err(VideoError::NoActiveJob)));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_limit_ends_a_stuck_job() {
        let svc = Arc::new(MockService::new());
        let config = VideoConfig {
            max_poll_attempts: 2,
            ..VideoConfig::default()
        };
        let coord = VideoCoordinator::new(svc.clone(), config);
        coord.submit(&request()).await.unwrap();

        let err = coord.wait().await.unwrap_err();
        assert!(matches!(err, VideoError::PollLimitExceeded { attempts: 2 }));
        assert_eq!(coord.state(), JobState::Failed);
        sleep_secs(60.0).await;
        assert_eq!(svc.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn status_rotates_and_stops_with_polling() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();
        assert_eq!(coord.status_message(), LOADING_MESSAGES[0]);

        sleep_secs(5.5).await;
        assert_eq!(coord.status_message(), LOADING_MESSAGES[1]);
        sleep_secs(5.0).await;
        assert_eq!(coord.status_message(), LOADING_MESSAGES[2]);

        coord.cancel();
        sleep_secs(60.0).await;
        assert_eq!(coord.status_message(), LOADING_MESSAGES[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmit_restarts_counters_and_state() {
        let svc = Arc::new(
            MockService::new()
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact("X", Ok(vec![9])),
        );
        let coord = coordinator(&svc);
        assert_eq!(coord.run(&request()).await.unwrap(), vec![9]);
        assert_eq!(coord.polls_issued(), 1);

        coord.submit(&request()).await.unwrap();
        assert_eq!(coord.state(), JobState::Polling);
        assert_eq!(coord.polls_issued(), 0);
        assert_eq!(coord.status_message(), LOADING_MESSAGES[0]);
        coord.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_terminal_state() {
        let svc = Arc::new(
            MockService::new()
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact("X", Ok(vec![0])),
        );
        let coord = coordinator(&svc);
        let mut rx = coord.subscribe();
        coord.submit(&request()).await.unwrap();

        rx.wait_for(|s| s.is_terminal()).await.unwrap();
        assert_eq!(*rx.borrow(), JobState::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_submission_stops_everything() {
        let svc = Arc::new(MockService::new().with_submit_delay(Duration::from_secs(12)));
        let coord = coordinator(&svc);
        let canceller = coord.canceller();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            canceller.cancel();
        });

        let err = coord.submit(&request()).await.unwrap_err();
        assert!(matches!(err, VideoError::Cancelled));
        assert_eq!(coord.state(), JobState::Cancelled);
        // One rotation at 5 s, none after the cancel at 7 s.
        assert_eq!(coord.status_message(), LOADING_MESSAGES[1]);

        sleep_secs(120.0).await;
        assert_eq!(svc.poll_count(), 0);
        assert_eq!(svc.submit_calls.load(Ordering::SeqCst), 1);
        assert_eq!(coord.state(), JobState::Cancelled);
        assert_eq!(coord.status_message(), LOADING_MESSAGES[1]);
        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_download_discards_bytes() {
        let svc = Arc::new(
            MockService::new()
                .with_fetch_delay(Duration::from_secs(10))
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact("X", Ok(vec![1, 2, 3])),
        );
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        // Poll at 10 s, download runs from 10 s to 20 s.
        sleep_secs(15.0).await;
        assert_eq!(coord.state(), JobState::Retrieving);
        coord.cancel();

        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
        assert_eq!(coord.state(), JobState::Cancelled);
        assert_eq!(svc.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_job_never_reports_success() {
        let svc = Arc::new(
            MockService::new()
                .with_polls(vec![Ok(finished("op", Some("X")))])
                .with_artifact("X", Ok(vec![4])),
        );
        let coord = coordinator(&svc);
        coord.submit(&request()).await.unwrap();

        // The task can no longer record `Succeeded` for its job.
        coord.shared.generation.fetch_add(1, Ordering::SeqCst);

        assert!(matches!(coord.wait().await, Err(VideoError::Cancelled)));
        assert_ne!(coord.state(), JobState::Succeeded);
        assert_eq!(svc.fetch_count(), 1);
    }

    #[test]
    fn cancel_on_idle_is_a_no_op() {
        let svc = Arc::new(MockService::new());
        let coord = coordinator(&svc);
        coord.cancel();
        assert_eq!(coord.state(), JobState::Idle);
    }
}
