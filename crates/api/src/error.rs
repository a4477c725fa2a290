use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use skinsight_core::error::CoreError;
use skinsight_vision::{GatewayError, UpstreamError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for local failures and [`GatewayError`] for upstream
/// ones. Implements [`IntoResponse`] to produce consistent JSON error bodies
/// of the form `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `skinsight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed call to the vision API.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::NoResult => (
                    StatusCode::BAD_REQUEST,
                    "NO_RESULT",
                    core.to_string(),
                ),
                CoreError::InvalidTransition(_) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", core.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Vision API errors ---
            AppError::Gateway(gateway) => classify_gateway_error(gateway),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a gateway error into an HTTP status, error code, and message.
///
/// - Upstream categories use their own status and user-facing message.
/// - Misconfiguration maps to 500 and keeps its message (it names no secret).
/// - Transport and decode failures map to 500 with a sanitized message.
fn classify_gateway_error(err: &GatewayError) -> (StatusCode, &'static str, String) {
    match err {
        GatewayError::Upstream(upstream) => (
            status_of(upstream),
            upstream.code(),
            upstream.to_string(),
        ),
        GatewayError::Misconfigured(msg) => {
            tracing::error!(error = %msg, "Vision API misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_MISCONFIGURED",
                msg.clone(),
            )
        }
        GatewayError::Transport(e) => {
            tracing::error!(error = %e, "Vision API transport failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_UNAVAILABLE",
                UpstreamError::UpstreamUnavailable.to_string(),
            )
        }
        GatewayError::Decode(msg) => {
            tracing::error!(error = %msg, "Vision API returned an unreadable body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_UNAVAILABLE",
                UpstreamError::UpstreamUnavailable.to_string(),
            )
        }
    }
}

fn status_of(upstream: &UpstreamError) -> StatusCode {
    StatusCode::from_u16(upstream.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
