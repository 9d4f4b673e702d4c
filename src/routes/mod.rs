//! HTTP routes
//!
//! `/api/pdf/*` requires a bearer token; `/` and `/health` are public.

pub mod avis;
pub mod avis_batch;
pub mod health;
pub mod index;
pub mod preparation;
pub mod render;
pub mod summary;
mod validated_json;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use validated_json::ValidatedJson;

use crate::auth;
use crate::error::AppError;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let pdf = Router::new()
        .nest("/avis", avis::router())
        .nest("/avis-batch", avis_batch::router())
        .nest("/summary", summary::router())
        .nest("/preparation", preparation::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    Router::new()
        .route("/", get(index::api_info))
        .route("/health", get(health::health_check))
        .nest("/api/pdf", pdf)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config().server.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config().server.cors_origins))
        .with_state(state)
}

/// Any origin without credentials, or the listed origins with credentials
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} {} not found", method, uri.path()))
}
