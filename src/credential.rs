//! Cached credential availability for video generation.
//!
//! Video generation is billed against a key the user selects through a
//! host-provided mechanism ([`KeySelector`]). [`CredentialGate`] caches the
//! answer to "is a key selected?" so the workflow can refuse to submit
//! without one, and [`CredentialGate::reset`] forces reselection after the
//! service rejects the key.
//!
//! ```text
//! new ──check()──▶ available / unavailable
//!                       │            │
//!                  reset()        select()
//!                       ▼            ▼
//!                 unavailable     available
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::service::ApiKey;

// ---------------------------------------------------------------------------
// KeySelector
// ---------------------------------------------------------------------------

/// Errors raised by a [`KeySelector`].
#[derive(Debug, Clone, Error)]
pub enum SelectorError {
    /// The host cannot show a selection dialog.
    #[error("key selection is not available: {0}")]
    Unavailable(String),

    /// The host's selection mechanism failed.
    #[error("key selection failed: {0}")]
    Failed(String),
}

/// Host-provided credential selection.
#[async_trait]
pub trait KeySelector: Send + Sync {
    /// Whether the user already selected a usable key.
    async fn has_selected_key(&self) -> Result<bool, SelectorError>;

    /// Ask the user to select a key.
    async fn open_select_key(&self) -> Result<(), SelectorError>;
}

/// Selector backed by the key the config layer resolved at startup.
///
/// There is no dialog to open; selection tells the user where the key comes
/// from instead.
pub struct ConfigKeySelector {
    key: Option<ApiKey>,
}

impl ConfigKeySelector {
    pub fn new(key: Option<ApiKey>) -> Self {
        Self { key }
    }
}

#[async_trait]
impl KeySelector for ConfigKeySelector {
    async fn has_selected_key(&self) -> Result<bool, SelectorError> {
        Ok(self.key.is_some())
    }

    async fn open_select_key(&self) -> Result<(), SelectorError> {
        Err(SelectorError::Unavailable(format!(
            "set {} or `service.api_key` in settings.toml",
            crate::config::API_KEY_ENV
        )))
    }
}

// ---------------------------------------------------------------------------
// CredentialGate
// ---------------------------------------------------------------------------

/// Cached "credential available" flag in front of a [`KeySelector`].
pub struct CredentialGate {
    selector: Option<Arc<dyn KeySelector>>,
    available: AtomicBool,
    checking: AtomicBool,
}

impl CredentialGate {
    /// A gate that consults `selector`. Call [`check`](Self::check) before
    /// relying on [`is_available`](Self::is_available).
    pub fn new(selector: Arc<dyn KeySelector>) -> Self {
        Self {
            selector: Some(selector),
            available: AtomicBool::new(false),
            checking: AtomicBool::new(true),
        }
    }

    /// A gate for hosts with no selection mechanism; a key is assumed to be
    /// supplied some other way.
    pub fn without_selector() -> Self {
        Self {
            selector: None,
            available: AtomicBool::new(false),
            checking: AtomicBool::new(true),
        }
    }

    /// Ask the selector whether a key is selected and cache the answer.
    ///
    /// Selector errors count as "no key".
    pub async fn check(&self) -> bool {
        self.checking.store(true, Ordering::SeqCst);
        let available = match &self.selector {
            Some(selector) => match selector.has_selected_key().await {
                Ok(has_key) => has_key,
                Err(e) => {
                    log::error!("credential: error checking for API key: {e}");
                    false
                }
            },
            None => {
                log::warn!("credential: no key selector; assuming a key is available");
                true
            }
        };
        self.available.store(available, Ordering::SeqCst);
        self.checking.store(false, Ordering::SeqCst);
        available
    }

    /// Open the selection dialog.
    ///
    /// On success the key is assumed available without re-checking; a bad
    /// selection surfaces as a credential error on the next request.
    pub async fn select(&self) -> bool {
        let Some(selector) = &self.selector else {
            return self.is_available();
        };
        match selector.open_select_key().await {
            Ok(()) => {
                self.available.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                log::error!("credential: error opening key selection: {e}");
                self.is_available()
            }
        }
    }

    /// Forget the cached availability so the user is asked to select again.
    pub fn reset(&self) {
        log::info!("credential: cached key state invalidated");
        self.available.store(false, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// `true` until the first [`check`](Self::check) completes.
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
