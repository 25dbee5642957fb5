//! Store interfaces used by the feature resolver (token lookup, flag sets).
use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors (transport/command/timeout).
///
/// Note:
/// - Kept independent from `AppError`; the resolver attaches the request id when it
///   surfaces one of these to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    BackendConnection(String),
    #[error("store command error: {0}")]
    BackendCommand(String),
    #[error("store command timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Bearer token -> user id lookup.
///
/// Entries expire on the backend side; an expired token simply reads as `None`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    // `GET <token>`
    async fn user_for_token(&self, token: &str) -> StoreResult<Option<String>>;
}

/// Set-membership store holding feature flags.
#[async_trait]
pub trait FlagStore: Send + Sync {
    // `SMEMBERS <set>`; a missing key is an empty set.
    async fn members(&self, set: &str) -> StoreResult<HashSet<String>>;

    // `SINTER <a> <b>`, computed server-side in one round trip.
    async fn intersection(&self, a: &str, b: &str) -> StoreResult<HashSet<String>>;
}
