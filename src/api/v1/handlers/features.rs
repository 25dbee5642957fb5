/*
 * Responsibility
 * - GET /features: HTTP ヘッダから Event を組み立てて解決
 * - POST /invoke: body の event JSON をそのまま解決 (不正な body は BadRequest)
 * - 失敗は AppError (IntoResponse) で {type, message, requestid} を返す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};

use crate::{
    api::v1::extractors::Invocation,
    error::AppError,
    services::features::{ActiveFeatureSet, Event},
    state::AppState,
};

pub async fn get_features(
    State(state): State<AppState>,
    Invocation(ctx): Invocation,
    headers: HeaderMap,
) -> Result<Json<ActiveFeatureSet>, AppError> {
    let event = event_from_headers(&headers);
    let features = state.authorizer.resolve(&event, &ctx).await?;

    Ok(Json(features))
}

pub async fn invoke(
    State(state): State<AppState>,
    Invocation(ctx): Invocation,
    event: Result<Json<Event>, JsonRejection>,
) -> Result<Json<ActiveFeatureSet>, AppError> {
    let Json(event) = event.map_err(|rejection| {
        tracing::warn!(
            request_id = %ctx.request_id,
            status = %rejection.status(),
            "invalid event body"
        );
        AppError::bad_request(&ctx, rejection.body_text())
    })?;

    let features = state.authorizer.resolve(&event, &ctx).await?;

    Ok(Json(features))
}

// HTTP header names are case-insensitive; the event key is always `Authorization`.
// A non UTF-8 value is kept (lossy) so it fails token lookup instead of looking absent.
fn event_from_headers(headers: &HeaderMap) -> Event {
    match headers.get(header::AUTHORIZATION) {
        Some(value) => Event::with_authorization(String::from_utf8_lossy(value.as_bytes())),
        None => Event::default(),
    }
}
