use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    response::Response,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};

use crate::errors::server_failure;
use crate::generation::handlers::handle_generate;
use crate::state::AppState;

/// Offer requests are a handful of short fields; anything bigger is refused.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Every path serves the generator; the handler itself gates on method.
///
/// CORS headers are set on every response, errors and caught panics included.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_generate)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!("Handler panicked: {detail}");
    server_failure(detail)
}
