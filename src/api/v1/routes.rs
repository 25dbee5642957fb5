/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /features, /invoke
 * - 認証は handler 内で任意 (Authorization が無ければ global features のみ)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    features::{get_features, invoke},
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/features", get(get_features))
        .route("/invoke", post(invoke))
}
