//! Batch of delivery notes in a single PDF

use std::time::Instant;

use axum::{extract::State, response::Response, routing::post, Router};

use super::render::{elapsed_ms, pdf_response, render_pdf, Assets};
use super::ValidatedJson;
use crate::documents::{AvisBatchContext, AvisBatchRequest};
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_batch))
}

/// POST /api/pdf/avis-batch
async fn generate_batch(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AvisBatchRequest>,
) -> Result<Response> {
    let started = Instant::now();
    let orders_count = request.orders.len();

    tracing::info!(orders_count, "Generating batch avis PDF");

    let context = AvisBatchContext::new(request);
    if context.pages.is_empty() {
        return Err(AppError::BadRequest("No valid orders found in batch".to_string()));
    }

    tracing::info!(
        orders_rendered = context.orders_rendered,
        orders_skipped = context.orders_skipped,
        pages_count = context.pages.len(),
        "Batch paginated"
    );

    // The logo is inlined as a data URI, nothing to attach
    let pdf = render_pdf(
        &state,
        super::avis::TEMPLATE,
        &context,
        Assets::Skip,
        "Failed to generate batch PDF",
    )
    .await
    .inspect_err(|e| {
        tracing::error!(
            error = %e,
            duration_ms = elapsed_ms(started),
            "Batch PDF generation failed"
        )
    })?;

    tracing::info!(
        orders_count = context.orders_rendered,
        pages_count = context.pages.len(),
        pdf_size = pdf.len(),
        duration_ms = elapsed_ms(started),
        "Batch PDF generated successfully"
    );

    pdf_response(AvisBatchContext::FILENAME, pdf)
}
