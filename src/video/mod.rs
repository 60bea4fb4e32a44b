//! Long-running video generation.
//!
//! * [`VideoCoordinator`] — submits a job, polls it on a fixed interval,
//!   downloads the finished video and exposes cancellation.
//! * [`JobState`] — lifecycle of one job.
//! * [`run_status_ticker`] — rotating progress messages for the UI.
//! * [`VideoError`] / [`PollError`] — terminal failures.

pub mod coordinator;
pub mod error;
pub mod state;
pub mod status;

pub use coordinator::{VideoCanceller, VideoCoordinator};
pub use error::{PollError, VideoError};
pub use state::JobState;
pub use status::{run_status_ticker, StatusRotator, LOADING_MESSAGES};
