use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Missing or invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<&'static str>),

    #[error("OpenAI API error (status {status})")]
    Upstream { status: u16, detail: String },

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(anyhow::Error::new(e).context("Invalid JSON request body"))
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Api { status, body } => AppError::Upstream {
                status,
                detail: body,
            },
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Missing OPENAI_API_KEY" }),
            ),
            AppError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing or invalid fields", "fields": fields }),
            ),
            AppError::Upstream { status, detail } => {
                tracing::error!("OpenAI error {status}: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "OpenAI API error", "detail": detail }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                return server_failure(format!("{e:#}"));
            }
        };

        (status, Json(body)).into_response()
    }
}

/// The catch-all 500 body, shared with the panic handler.
pub fn server_failure(detail: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server failure", "detail": detail })),
    )
        .into_response()
}
