//! HTTP-level middleware applied to every route.
//!
//! Layer order, outermost first:
//! 1. request id set/propagate: every response, errors included, echoes `x-request-id`
//! 2. access tracing
//! 3. error mapping: timeouts and other layer errors become an `AppError` payload
//!    carrying the same request id
//! 4. deadline
//! 5. body size limit

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderMap, header::HeaderName};
use axum::response::{IntoResponse, Response};
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::api::v1::extractors::invocation::{REQUEST_ID_HEADER, context_from_headers};
use crate::error::AppError;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request-id, tracing, 1 MiB body limit and a 30 s deadline.
pub fn apply(router: Router) -> Router {
    apply_with_timeout(router, REQUEST_TIMEOUT)
}

pub fn apply_with_timeout(router: Router, timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(HandleErrorLayer::new(handle_layer_error))
        .layer(TimeoutLayer::new(timeout))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

    router.layer(layers)
}

// Runs inside SetRequestIdLayer, so the header is already present.
async fn handle_layer_error(headers: HeaderMap, err: BoxError) -> Response {
    let ctx = context_from_headers(&headers);

    if err.is::<Elapsed>() {
        tracing::warn!(request_id = %ctx.request_id, "request deadline exceeded");
        AppError::timeout(&ctx).into_response()
    } else {
        tracing::error!(request_id = %ctx.request_id, error = %err, "middleware failure");
        AppError::internal(&ctx).into_response()
    }
}
