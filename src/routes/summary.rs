//! Feuille de synthèse endpoint

use std::time::Instant;

use axum::{extract::State, response::Response, routing::post, Router};

use super::render::{elapsed_ms, pdf_response, render_pdf, Assets};
use super::ValidatedJson;
use crate::documents::{SummaryContext, SummaryRequest};
use crate::error::Result;
use crate::state::AppState;

const TEMPLATE: &str = "summary.html";

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_summary))
}

/// POST /api/pdf/summary
async fn generate_summary(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SummaryRequest>,
) -> Result<Response> {
    let started = Instant::now();
    let context = SummaryContext::new(request);
    let date = context.meta.date.clone();
    let tour_type = context.tour.kind.nom.clone();

    tracing::info!(
        date = %date,
        tour_type = %tour_type,
        orders_count = context.orders.len(),
        sort_mode = ?context.sort_mode,
        "Generating summary PDF"
    );

    let pdf = render_pdf(&state, TEMPLATE, &context, Assets::Attach, "PDF generation failed")
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                date = %date,
                duration_ms = elapsed_ms(started),
                "Summary PDF generation failed"
            )
        })?;

    tracing::info!(
        date = %date,
        tour_type = %tour_type,
        pdf_size = pdf.len(),
        duration_ms = elapsed_ms(started),
        "Summary PDF generated successfully"
    );

    pdf_response(&context.filename(), pdf)
}
