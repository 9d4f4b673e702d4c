//! API description served at the root

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub authenticated: bool,
}

const ENDPOINTS: &[(&str, &str, &str, bool)] = &[
    ("GET", "/", "API information", false),
    ("GET", "/health", "Service and Gotenberg health", false),
    ("POST", "/api/pdf/avis", "Bon de livraison for one order", true),
    ("POST", "/api/pdf/avis-batch", "Bons de livraison for several orders in one PDF", true),
    ("POST", "/api/pdf/summary", "Feuille de synthèse for a tour", true),
    ("POST", "/api/pdf/preparation", "Fiche de préparation des commandes", true),
];

/// GET /
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "LADP PDF Server",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description, authenticated)| EndpointInfo {
                method,
                path,
                description,
                authenticated,
            })
            .collect(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
