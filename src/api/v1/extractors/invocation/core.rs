use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use uuid::Uuid;

use crate::services::features::InvocationContext;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Handler で InvocationContext を受け取るための extractor
/// SetRequestIdLayer が x-request-id を付与済みである前提。
pub struct Invocation(pub InvocationContext);

impl FromRequestParts<AppState> for Invocation
where
    AppState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Invocation(context_from_headers(&parts.headers)))
    }
}

/// x-request-id から InvocationContext を作る。
/// 無い/UTF-8 でない場合 (middleware 未設定) はここで UUID を振る。
pub fn context_from_headers(headers: &HeaderMap) -> InvocationContext {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    InvocationContext::new(request_id)
}
