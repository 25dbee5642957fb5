/*
 * Responsibility
 * - 呼び出し単位のエラー定義 (AppError)
 * - request id を保持し {type, message, requestid} へ serialize
 * - IntoResponse 実装 (HTTP status / JSON error body)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::features::InvocationContext;
use crate::services::store::StoreError;

const DEFAULT_AUTH_MESSAGE: &str = "Auth error";
const STORE_MESSAGE: &str = "feature store unavailable";
const TIMEOUT_MESSAGE: &str = "request timed out";
const INTERNAL_MESSAGE: &str = "internal server error";

/// Wire shape of every error returned to a caller.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub requestid: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or unknown credentials.
    #[error("{message}")]
    Auth { message: String, request_id: String },
    /// Token or flag store could not answer. The cause is logged, never returned.
    #[error("feature store unavailable: {source}")]
    Store {
        #[source]
        source: StoreError,
        request_id: String,
    },
    /// Request body is not a valid event.
    #[error("{message}")]
    BadRequest { message: String, request_id: String },
    /// Request exceeded the HTTP-level deadline.
    #[error("request timed out")]
    Timeout { request_id: String },
    /// Middleware failure with no more specific meaning.
    #[error("internal server error")]
    Internal { request_id: String },
}

impl AppError {
    pub fn auth(ctx: &InvocationContext, message: Option<&str>) -> Self {
        Self::Auth {
            message: message.unwrap_or(DEFAULT_AUTH_MESSAGE).to_string(),
            request_id: ctx.request_id.clone(),
        }
    }

    pub fn store(ctx: &InvocationContext, source: StoreError) -> Self {
        Self::Store {
            source,
            request_id: ctx.request_id.clone(),
        }
    }

    pub fn bad_request(ctx: &InvocationContext, message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            request_id: ctx.request_id.clone(),
        }
    }

    pub fn timeout(ctx: &InvocationContext) -> Self {
        Self::Timeout {
            request_id: ctx.request_id.clone(),
        }
    }

    pub fn internal(ctx: &InvocationContext) -> Self {
        Self::Internal {
            request_id: ctx.request_id.clone(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            AppError::Auth { .. } => 401,
            AppError::Store { .. } => 503,
            AppError::BadRequest { .. } => 400,
            AppError::Timeout { .. } => 408,
            AppError::Internal { .. } => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Auth { .. } => "AuthError",
            AppError::Store { .. } => "StoreError",
            AppError::BadRequest { .. } => "BadRequest",
            AppError::Timeout { .. } => "Timeout",
            AppError::Internal { .. } => "InternalError",
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            AppError::Auth { request_id, .. }
            | AppError::Store { request_id, .. }
            | AppError::BadRequest { request_id, .. }
            | AppError::Timeout { request_id }
            | AppError::Internal { request_id } => request_id,
        }
    }

    pub fn jsonify(&self) -> ErrorPayload {
        let message = match self {
            AppError::Auth { message, .. } | AppError::BadRequest { message, .. } => {
                message.clone()
            }
            AppError::Store { .. } => STORE_MESSAGE.to_string(),
            AppError::Timeout { .. } => TIMEOUT_MESSAGE.to_string(),
            AppError::Internal { .. } => INTERNAL_MESSAGE.to_string(),
        };

        ErrorPayload {
            kind: self.kind(),
            message,
            requestid: self.request_id().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.jsonify())).into_response()
    }
}
