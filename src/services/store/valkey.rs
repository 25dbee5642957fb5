use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use crate::services::store::client::{FlagStore, StoreError, StoreResult, TokenStore};

/// Valkey/Redis-backend store client.
///
/// One client serves either role (token store or flag store); the app builds one per
/// endpoint. Every command is bounded by `command_timeout`.
#[derive(Clone)]
pub struct ValkeyClient {
    manager: redis::aio::ConnectionManager,
    command_timeout: Duration,
}

impl ValkeyClient {
    // Create a Valkey client from a URL like `redis://localhost:6379`
    pub async fn new(url: &str, command_timeout: Duration) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        let manager = tokio::time::timeout(command_timeout, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Timeout(command_timeout))?
            .map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        Ok(Self {
            manager,
            command_timeout,
        })
    }

    // Returns the backend name (for logging).
    pub fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn query<T>(&self, cmd: redis::Cmd) -> StoreResult<T>
    where
        T: redis::FromRedisValue + Send,
    {
        // The connection manager is a cheap handle over one multiplexed connection.
        let mut conn = self.manager.clone();

        tokio::time::timeout(self.command_timeout, cmd.query_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout(self.command_timeout))?
            .map_err(|e| StoreError::BackendCommand(e.to_string()))
    }
}

impl std::fmt::Debug for ValkeyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValkeyClient")
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenStore for ValkeyClient {
    async fn user_for_token(&self, token: &str) -> StoreResult<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(token);
        self.query(cmd).await
    }
}

#[async_trait]
impl FlagStore for ValkeyClient {
    async fn members(&self, set: &str) -> StoreResult<HashSet<String>> {
        let mut cmd = redis::cmd("SMEMBERS");
        cmd.arg(set);
        self.query(cmd).await
    }

    async fn intersection(&self, a: &str, b: &str) -> StoreResult<HashSet<String>> {
        let mut cmd = redis::cmd("SINTER");
        cmd.arg(a).arg(b);
        self.query(cmd).await
    }
}
