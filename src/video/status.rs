//! Rotating progress messages shown while a video renders.
//!
//! The ticker only feeds the UI. It never touches the job state machine and
//! shares the job's cancellation token, so it stops together with polling.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Messages cycled through while a job is running.
pub const LOADING_MESSAGES: [&str; 6] = [
    "Warming up the digital director...",
    "Rendering pixels into motion...",
    "Choreographing virtual actors...",
    "This can take a few minutes, please wait...",
    "Adding cinematic magic...",
    "Finalizing the high-definition cut...",
];

/// Cursor over [`LOADING_MESSAGES`] that wraps around.
#[derive(Debug, Clone, Default)]
pub struct StatusRotator {
    index: usize,
}

impl StatusRotator {
    pub fn current(&self) -> &'static str {
        LOADING_MESSAGES[self.index]
    }

    /// Advance to the next message and return it.
    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % LOADING_MESSAGES.len();
        self.current()
    }
}

/// Publish the next message every `period` until `token` is cancelled.
///
/// The first rotation happens one `period` after the call.
pub async fn run_status_ticker<F>(token: CancellationToken, period: Duration, publish: F)
where
    F: Fn(&'static str) + Send + 'static,
{
    let mut rotator = StatusRotator::default();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => publish(rotator.advance()),
        }
    }
    log::debug!("video: status ticker stopped");
}
