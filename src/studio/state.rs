//! Per-task submit/result state.
//!
//! Every workflow owns one [`TabState`]. A run goes
//!
//! ```text
//! begin ──▶ loading ──finish(Ok)──▶ result set, error cleared
//!                   ──finish(Err)─▶ result empty, error message set
//! ```
//!
//! Validation failures only set the error; the previous result stays.

use super::artifact::{Artifact, ResultSlot};
use super::error::StudioError;

#[derive(Debug, Default)]
pub struct TabState {
    loading: bool,
    error: Option<String>,
    result: ResultSlot,
}

impl TabState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The user-facing message of the last failure, if the last run failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&Artifact> {
        self.result.get()
    }

    pub fn take_result(&mut self) -> Option<Artifact> {
        self.result.take()
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.result.begin();
    }

    pub(crate) fn reject(&mut self, err: StudioError) -> StudioError {
        self.error = Some(err.to_string());
        err
    }

    pub(crate) fn finish(
        &mut self,
        outcome: Result<Artifact, StudioError>,
    ) -> Result<&Artifact, StudioError> {
        self.loading = false;
        match outcome {
            Ok(artifact) => Ok(self.result.set(artifact)),
            Err(err) => {
                log::warn!("studio: {err}");
                Err(self.reject(err))
            }
        }
    }
}
