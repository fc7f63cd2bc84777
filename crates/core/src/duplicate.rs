//! Time-windowed duplicate-submission guard.
//!
//! Catches accidental resubmissions: a successful submission records a
//! timestamp under the submitter's identity key, and another attempt with
//! the same key inside the window is suppressed. The guard fails open —
//! its own infrastructure failing must never block a legitimate
//! submission.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default suppression window, in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 5;

/// Identity of one submitter for duplicate detection.
///
/// Equality is exact-string: no case-folding or trimming of the email is
/// performed here, a deliberate simplicity trade-off (two spellings of
/// the same address are treated as different submitters).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey {
    pub client_type: String,
    pub email: String,
}

impl IdentityKey {
    pub fn new(client_type: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            client_type: client_type.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.client_type, self.email)
    }
}

/// Key-value storage contract for guard records.
///
/// A key holds at most one timestamp; recording again supersedes the
/// previous value.
#[async_trait]
pub trait GuardStore: Send + Sync {
    async fn last_submission(&self, key: &IdentityKey) -> Result<Option<Timestamp>, CoreError>;
    async fn record(&self, key: &IdentityKey, at: Timestamp) -> Result<(), CoreError>;
}

#[async_trait]
impl<T: GuardStore + ?Sized> GuardStore for std::sync::Arc<T> {
    async fn last_submission(&self, key: &IdentityKey) -> Result<Option<Timestamp>, CoreError> {
        (**self).last_submission(key).await
    }
    async fn record(&self, key: &IdentityKey, at: Timestamp) -> Result<(), CoreError> {
        (**self).record(key, at).await
    }
}

/// Whether `last` still falls inside the suppression window at `now`.
pub fn within_window(last: Timestamp, now: Timestamp, window_minutes: i64) -> bool {
    now.signed_duration_since(last).num_seconds() < window_minutes * 60
}

/// The duplicate-submission guard over a [`GuardStore`].
pub struct DuplicateGuard<G: GuardStore> {
    store: G,
    window_minutes: i64,
}

impl<G: GuardStore> DuplicateGuard<G> {
    pub fn new(store: G) -> Self {
        Self::with_window(store, DEFAULT_WINDOW_MINUTES)
    }

    pub fn with_window(store: G, window_minutes: i64) -> Self {
        Self {
            store,
            window_minutes,
        }
    }

    pub fn window_minutes(&self) -> i64 {
        self.window_minutes
    }

    /// Check whether `key` submitted inside the window.
    ///
    /// Storage failures are logged and treated as "not a duplicate".
    pub async fn is_duplicate(&self, key: &IdentityKey) -> bool {
        match self.store.last_submission(key).await {
            Ok(Some(last)) => within_window(last, Utc::now(), self.window_minutes),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(
                    identity = %key,
                    error = %err,
                    "Duplicate guard lookup failed; allowing submission"
                );
                false
            }
        }
    }

    /// Record a successful submission for `key`.
    ///
    /// Must only be called after the persistence write succeeded, so a
    /// failed attempt never poisons the guard. Storage failures are
    /// logged and swallowed.
    pub async fn record_submission(&self, key: &IdentityKey) {
        if let Err(err) = self.store.record(key, Utc::now()).await {
            tracing::warn!(
                identity = %key,
                error = %err,
                "Failed to record submission in the duplicate guard"
            );
        }
    }
}
