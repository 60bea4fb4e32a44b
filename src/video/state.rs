//! Video job state machine.
//!
//! [`JobState`] is published by the [`VideoCoordinator`](super::VideoCoordinator)
//! over a `tokio::sync::watch` channel so a front-end can render progress.

// ---------------------------------------------------------------------------
// JobState
// ---------------------------------------------------------------------------

/// States of one video-generation request.
///
/// ```text
/// Idle ──submit──▶ Submitting ──accepted──▶ Polling ──done + uri──▶ Retrieving ──▶ Succeeded
///                      │                       │                       │
///                      │ rejected              │ poll error /          │ download error
///                      ▼                       ▼ done without uri      ▼
///                    Failed                  Failed                  Failed
///
/// Submitting / Polling / Retrieving ──cancel()──▶ Cancelled
/// ```
///
/// `Succeeded`, `Failed` and `Cancelled` are terminal for a request; the next
/// `submit` starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobState {
    /// Nothing submitted yet.
    #[default]
    Idle,

    /// The submission call is in flight.
    Submitting,

    /// The service accepted the job; status is checked on a fixed interval.
    Polling,

    /// The job finished; the video is being downloaded.
    Retrieving,

    /// The video bytes are available.
    Succeeded,

    /// The request failed; the error is returned by `wait()`.
    Failed,

    /// The caller stopped the job.
    Cancelled,
}

impl JobState {
    /// Returns `true` while a job owns running timers or in-flight calls.
    ///
    /// ```
    /// use creative_studio::video::JobState;
    ///
    /// assert!(!JobState::Idle.is_active());
    /// assert!(JobState::Submitting.is_active());
    /// assert!(JobState::Polling.is_active());
    /// assert!(JobState::Retrieving.is_active());
    /// assert!(!JobState::Succeeded.is_active());
    /// assert!(!JobState::Cancelled.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobState::Submitting | JobState::Polling | JobState::Retrieving
        )
    }

    /// Returns `true` for states that end a request.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::Cancelled
        )
    }

    /// A short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Submitting => "Submitting",
            JobState::Polling => "Generating",
            JobState::Retrieving => "Downloading",
            JobState::Succeeded => "Done",
            JobState::Failed => "Failed",
            JobState::Cancelled => "Cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(JobState::default(), JobState::Idle);
    }

    #[test]
    fn idle_is_neither_active_nor_terminal() {
        assert!(!JobState::Idle.is_active());
        assert!(!JobState::Idle.is_terminal());
    }

    #[test]
    fn active_and_terminal_are_disjoint() {
        let all = [
            JobState::Idle,
            JobState::Submitting,
            JobState::Polling,
            JobState::Retrieving,
            JobState::Succeeded,
            JobState::Failed,
            JobState::Cancelled,
        ];
        for s in all {
            assert!(!(s.is_active() && s.is_terminal()), "{s:?}");
        }
    }

    #[test]
    fn terminal_states() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(!JobState::Polling.is_terminal());
    }

    #[test]
    fn labels() {
        assert_eq!(JobState::Polling.label(), "Generating");
        assert_eq!(JobState::Retrieving.label(), "Downloading");
        assert_eq!(JobState::Succeeded.label(), "Done");
    }
}
