//! Bearer token check for the PDF endpoints

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Reject requests that do not carry `Authorization: Bearer <API_TOKEN>`
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let Some(expected) = state.config().auth.token() else {
        tracing::error!("API_TOKEN not configured properly");
        return Err(AppError::AuthNotConfigured);
    };

    let path = request.uri().path().to_string();

    let Some(header) = request.headers().get(AUTHORIZATION) else {
        tracing::warn!(path = %path, "Missing Authorization header");
        return Err(AppError::Unauthorized("Missing Authorization header".to_string()));
    };

    let Some(token) = header.to_str().ok().and_then(bearer_token) else {
        tracing::warn!(path = %path, "Invalid Authorization header format");
        return Err(AppError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        ));
    };

    if !constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        tracing::warn!(path = %path, "Invalid API token");
        return Err(AppError::Unauthorized("Invalid API token".to_string()));
    }

    Ok(next.run(request).await)
}

/// `"Bearer abc"` → `Some("abc")`
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) if !token.is_empty() => Some(token),
        _ => None,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
