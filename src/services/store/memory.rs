//! In-memory store used by tests. Records every call so tests can assert round trips.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::services::store::client::{FlagStore, StoreError, StoreResult, TokenStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    strings: HashMap<String, String>,
    sets: HashMap<String, HashSet<String>>,
    calls: Mutex<Vec<String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user_id: &str) -> Self {
        self.strings.insert(token.to_string(), user_id.to_string());
        self
    }

    pub fn with_set<'a>(mut self, key: &str, members: impl IntoIterator<Item = &'a str>) -> Self {
        self.sets.insert(
            key.to_string(),
            members.into_iter().map(str::to_string).collect(),
        );
        self
    }

    // Every subsequent call fails with a connection error.
    pub fn go_down(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::BackendConnection("connection refused".into()));
        }
        Ok(())
    }

    fn set(&self, key: &str) -> HashSet<String> {
        self.sets.get(key).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn user_for_token(&self, token: &str) -> StoreResult<Option<String>> {
        self.record(format!("GET {token}"))?;
        Ok(self.strings.get(token).cloned())
    }
}

#[async_trait]
impl FlagStore for MemoryStore {
    async fn members(&self, set: &str) -> StoreResult<HashSet<String>> {
        self.record(format!("SMEMBERS {set}"))?;
        Ok(self.set(set))
    }

    async fn intersection(&self, a: &str, b: &str) -> StoreResult<HashSet<String>> {
        self.record(format!("SINTER {a} {b}"))?;
        Ok(self.set(a).intersection(&self.set(b)).cloned().collect())
    }
}
