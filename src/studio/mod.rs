//! Workflow layer shared by every front-end.
//!
//! [`Studio`] validates input, calls the generation service (or the video
//! coordinator), and records each task's outcome in a [`TabState`]: a
//! loading flag, one user-facing error message and the current [`Artifact`].

pub mod artifact;
pub mod error;
pub mod state;
pub mod workflow;

pub use artifact::{Artifact, ArtifactKind, ResultSlot};
pub use error::StudioError;
pub use state::TabState;
pub use workflow::Studio;
