//! Fiche de préparation endpoint

use std::time::Instant;

use axum::{extract::State, response::Response, routing::post, Router};
use chrono::Utc;

use super::render::{elapsed_ms, pdf_response, render_pdf, Assets};
use super::ValidatedJson;
use crate::documents::{PreparationContext, PreparationRequest};
use crate::error::Result;
use crate::state::AppState;

const TEMPLATE: &str = "preparation.html";

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_preparation))
}

/// POST /api/pdf/preparation
async fn generate_preparation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PreparationRequest>,
) -> Result<Response> {
    let started = Instant::now();
    let products_count = request.products.len();
    let context = PreparationContext::new(request, Utc::now());
    let date = context.meta.meta.selected_date.clone();

    tracing::info!(
        date = %date,
        products_count,
        sort_mode = ?context.sort_mode,
        "Generating preparation PDF"
    );

    let pdf = render_pdf(&state, TEMPLATE, &context, Assets::Attach, "PDF generation failed")
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                date = %date,
                duration_ms = elapsed_ms(started),
                "Preparation PDF generation failed"
            )
        })?;

    tracing::info!(
        date = %date,
        products_count,
        pdf_size = pdf.len(),
        duration_ms = elapsed_ms(started),
        "Preparation PDF generated successfully"
    );

    pdf_response(&context.filename(), pdf)
}
