use std::sync::Arc;

use crate::error::AppError;
use crate::services::features::header::parse_authorization;
use crate::services::features::types::{ActiveFeatureSet, Event, InvocationContext, UserId};
use crate::services::store::{FlagStore, StoreError, TokenStore};

pub const GLOBAL_FEATURES_KEY: &str = "global_features";
pub const ACTIVE_FEATURES_KEY: &str = "active_features";

/// Resolves the feature flags active for one inbound event.
///
/// - No `Authorization` header: `global_features`.
/// - Valid bearer token for user U: `global_features ∪ (active_features ∩ features:user:U)`.
/// - Malformed header or unknown/expired token: `AppError::Auth`.
///
/// Stateless across invocations; the stores are injected by the caller.
#[derive(Clone)]
pub struct RequestAuthorizer {
    tokens: Arc<dyn TokenStore>,
    flags: Arc<dyn FlagStore>,
}

impl RequestAuthorizer {
    pub fn new(tokens: Arc<dyn TokenStore>, flags: Arc<dyn FlagStore>) -> Self {
        Self { tokens, flags }
    }

    pub async fn resolve(
        &self,
        event: &Event,
        ctx: &InvocationContext,
    ) -> Result<ActiveFeatureSet, AppError> {
        // SMEMBERS global_features (always)
        let mut active = self
            .flags
            .members(GLOBAL_FEATURES_KEY)
            .await
            .map_err(|e| store_failure(ctx, e))?;

        let user_id = match event.authorization() {
            Some(header) => Some(self.authenticate(header, ctx).await?),
            None => None,
        };

        if let Some(user_id) = &user_id {
            // SINTER active_features features:user:<id>
            let user_features = self
                .flags
                .intersection(ACTIVE_FEATURES_KEY, &user_id.features_key())
                .await
                .map_err(|e| store_failure(ctx, e))?;

            active.extend(user_features);
        }

        let features: ActiveFeatureSet = active.into_iter().collect();

        tracing::debug!(
            request_id = %ctx.request_id,
            user_id = user_id.as_ref().map(UserId::as_str),
            count = features.len(),
            "resolved features"
        );

        Ok(features)
    }

    async fn authenticate(
        &self,
        header: &str,
        ctx: &InvocationContext,
    ) -> Result<UserId, AppError> {
        let credentials = match parse_authorization(header) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    error = %err,
                    "malformed authorization header"
                );
                return Err(AppError::auth(ctx, None));
            }
        };

        // GET <token>; missing and empty values are both "not authenticated".
        let user_id = self
            .tokens
            .user_for_token(credentials.token)
            .await
            .map_err(|e| store_failure(ctx, e))?
            .and_then(UserId::parse);

        match user_id {
            Some(user_id) => Ok(user_id),
            None => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    scheme = credentials.scheme,
                    "unknown or expired token"
                );
                Err(AppError::auth(ctx, None))
            }
        }
    }
}

fn store_failure(ctx: &InvocationContext, err: StoreError) -> AppError {
    tracing::error!(request_id = %ctx.request_id, error = %err, "store call failed");
    AppError::store(ctx, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::memory::MemoryStore;

    fn ctx() -> InvocationContext {
        InvocationContext::new("req-1")
    }

    fn token_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new().with_token("tok1", "42").with_token("blank", ""))
    }

    fn flag_store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_set(GLOBAL_FEATURES_KEY, ["dark_mode"])
                .with_set(ACTIVE_FEATURES_KEY, ["beta_x", "beta_y"])
                .with_set("features:user:42", ["beta_x", "gamma"]),
        )
    }

    fn authorizer(tokens: &Arc<MemoryStore>, flags: &Arc<MemoryStore>) -> RequestAuthorizer {
        RequestAuthorizer::new(tokens.clone(), flags.clone())
    }

    fn set(flags: &[&str]) -> ActiveFeatureSet {
        flags.iter().copied().collect()
    }

    fn assert_auth_error(err: AppError) {
        assert_eq!(err.code(), 401);
        assert_eq!(err.kind(), "AuthError");
        assert_eq!(err.request_id(), "req-1");
    }

    #[tokio::test]
    async fn no_header_returns_global_features_only() {
        let (tokens, flags) = (token_store(), flag_store());

        let got = authorizer(&tokens, &flags)
            .resolve(&Event::default(), &ctx())
            .await
            .unwrap();

        assert_eq!(got, set(&["dark_mode"]));
        assert!(tokens.calls().is_empty());
        assert_eq!(flags.calls(), vec!["SMEMBERS global_features"]);
    }

    #[tokio::test]
    async fn headers_without_authorization_are_unauthenticated() {
        let (tokens, flags) = (token_store(), flag_store());
        let event: Event = serde_json::from_str(r#"{"headers": {"Accept": "*/*"}}"#).unwrap();

        let got = authorizer(&tokens, &flags)
            .resolve(&event, &ctx())
            .await
            .unwrap();

        assert_eq!(got, set(&["dark_mode"]));
        assert!(tokens.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_header_fails_without_token_or_intersection_calls() {
        for header in ["Bearer", "Bearer abc def", "Bearer "] {
            let (tokens, flags) = (token_store(), flag_store());

            let err = authorizer(&tokens, &flags)
                .resolve(&Event::with_authorization(header), &ctx())
                .await
                .unwrap_err();

            assert_auth_error(err);
            assert!(tokens.calls().is_empty(), "{header:?} hit the token store");
            assert!(
                !flags.calls().iter().any(|c| c.starts_with("SINTER")),
                "{header:?} hit SINTER"
            );
        }
    }

    #[tokio::test]
    async fn unknown_token_is_auth_error() {
        let (tokens, flags) = (token_store(), flag_store());

        let err = authorizer(&tokens, &flags)
            .resolve(&Event::with_authorization("Bearer unknown_tok"), &ctx())
            .await
            .unwrap_err();

        assert_auth_error(err);
        assert_eq!(tokens.calls(), vec!["GET unknown_tok"]);
        assert!(!flags.calls().iter().any(|c| c.starts_with("SINTER")));
    }

    #[tokio::test]
    async fn empty_user_id_is_auth_error() {
        let (tokens, flags) = (token_store(), flag_store());

        let err = authorizer(&tokens, &flags)
            .resolve(&Event::with_authorization("Bearer blank"), &ctx())
            .await
            .unwrap_err();

        assert_auth_error(err);
    }

    #[tokio::test]
    async fn known_token_adds_active_user_features() {
        let (tokens, flags) = (token_store(), flag_store());

        let got = authorizer(&tokens, &flags)
            .resolve(&Event::with_authorization("Bearer tok1"), &ctx())
            .await
            .unwrap();

        // gamma is the user's but not active; beta_y is active but not the user's.
        assert_eq!(got, set(&["dark_mode", "beta_x"]));

        assert_eq!(tokens.calls(), vec!["GET tok1"]);
        assert_eq!(
            flags.calls(),
            vec![
                "SMEMBERS global_features",
                "SINTER active_features features:user:42",
            ]
        );
    }

    #[tokio::test]
    async fn scheme_is_not_checked() {
        let (tokens, flags) = (token_store(), flag_store());

        let got = authorizer(&tokens, &flags)
            .resolve(&Event::with_authorization("Token tok1"), &ctx())
            .await
            .unwrap();

        assert_eq!(got, set(&["dark_mode", "beta_x"]));
    }

    #[tokio::test]
    async fn repeated_resolution_is_stable() {
        let (tokens, flags) = (token_store(), flag_store());
        let authorizer = authorizer(&tokens, &flags);
        let event = Event::with_authorization("Bearer tok1");

        let first = authorizer.resolve(&event, &ctx()).await.unwrap();
        let second = authorizer.resolve(&event, &ctx()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn flag_store_outage_is_store_error() {
        let (tokens, flags) = (token_store(), flag_store());
        flags.go_down();

        let err = authorizer(&tokens, &flags)
            .resolve(&Event::default(), &ctx())
            .await
            .unwrap_err();

        assert_eq!(err.code(), 503);
        assert_eq!(err.kind(), "StoreError");
        assert_eq!(err.request_id(), "req-1");
    }

    #[tokio::test]
    async fn token_store_outage_is_store_error_not_auth_error() {
        let (tokens, flags) = (token_store(), flag_store());
        tokens.go_down();

        let err = authorizer(&tokens, &flags)
            .resolve(&Event::with_authorization("Bearer tok1"), &ctx())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "StoreError");
    }
}
