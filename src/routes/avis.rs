//! Bon de livraison endpoint

use std::time::Instant;

use axum::{extract::State, response::Response, routing::post, Router};
use serde_json::Value;

use super::render::{elapsed_ms, pdf_response, render_pdf, Assets};
use super::ValidatedJson;
use crate::documents::{AvisContext, AvisRequest};
use crate::error::Result;
use crate::state::AppState;

pub const TEMPLATE: &str = "avis.html";

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_avis))
}

/// POST /api/pdf/avis
async fn generate_avis(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AvisRequest>,
) -> Result<Response> {
    let started = Instant::now();

    let order_id = request.order.extra.get("id").cloned().unwrap_or(Value::Null);
    let lines_count = request.lignes.len();
    let context = AvisContext::new(request);
    let numero = context.order.order.numero_text();

    tracing::info!(
        order_id = %order_id,
        order_numero = %numero,
        lines_count,
        pages_count = context.pages.len(),
        "Generating avis PDF"
    );

    let pdf = render_pdf(&state, TEMPLATE, &context, Assets::Attach, "PDF generation failed")
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                order_numero = %numero,
                duration_ms = elapsed_ms(started),
                "Avis PDF generation failed"
            )
        })?;

    tracing::info!(
        order_id = %order_id,
        order_numero = %numero,
        pdf_size = pdf.len(),
        duration_ms = elapsed_ms(started),
        "Avis PDF generated successfully"
    );

    pdf_response(&context.filename(), pdf)
}
