//! Axum route handler for the offer-text generator.

use anyhow::Context;
use axum::{
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::generator::generate_offer_text;
use crate::generation::validation::validate_offer;
use crate::models::offer::OfferRequest;
use crate::state::AppState;

/// `OPTIONS` → 200 with an empty body.
/// `POST` → generated offer text.
/// Anything else → 405.
///
/// The API key check runs before the body is read, so a misconfigured
/// deployment answers 500 whatever the client sends. A body that could not
/// be buffered (e.g. over the size limit) is a server failure like any other.
pub async fn handle_generate(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let backend = state.backend.as_deref().ok_or(AppError::MissingApiKey)?;

    let body = body.context("Failed to read request body")?;
    let request = parse_body(&body)?;
    let offer = validate_offer(request)?;

    let response = generate_offer_text(backend, &offer, state.log_prompts).await?;

    Ok(Json(response).into_response())
}

/// An empty body, or any JSON that is not an object, reads as an empty request.
fn parse_body(body: &[u8]) -> Result<OfferRequest, AppError> {
    if body.is_empty() {
        return Ok(OfferRequest::default());
    }
    match serde_json::from_slice::<Value>(body)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(OfferRequest::default()),
    }
}
