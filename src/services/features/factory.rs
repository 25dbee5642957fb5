/// Factory: build `RequestAuthorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::features::RequestAuthorizer;
use crate::services::store::{StoreError, ValkeyClient};

pub async fn build_authorizer(config: &Config) -> Result<Arc<RequestAuthorizer>, StoreError> {
    let tokens = ValkeyClient::new(&config.redis_auth_url, config.redis_socket_timeout).await?;
    let flags = ValkeyClient::new(&config.redis_features_url, config.redis_socket_timeout).await?;

    tracing::info!(
        backend = tokens.backend_name(),
        timeout = ?config.redis_socket_timeout,
        "connected token and feature stores"
    );

    Ok(Arc::new(RequestAuthorizer::new(
        Arc::new(tokens),
        Arc::new(flags),
    )))
}
