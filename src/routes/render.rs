//! Shared HTML → PDF pipeline for the document endpoints

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;

use crate::error::{AppError, GenerationError, Result};
use crate::gotenberg::Asset;
use crate::state::AppState;

/// Whether the branding files travel with the HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assets {
    Attach,
    Skip,
}

/// Render `template` with `context`, then convert it to PDF.
///
/// The conversion runs in its own task so that a client hanging up does
/// not abort a call already sent to the rendering service.
pub async fn render_pdf<T: Serialize>(
    state: &AppState,
    template: &str,
    context: &T,
    assets: Assets,
    failure: &'static str,
) -> Result<Bytes> {
    let html = state
        .templates()
        .render(template, context)
        .await
        .map_err(|e| AppError::generation(failure, e))?;

    let task_state = state.clone();
    let conversion = tokio::spawn(async move {
        let files: &[Asset] = match assets {
            Assets::Attach => task_state.templates().assets(),
            Assets::Skip => &[],
        };
        task_state.engine().convert_html(html, files).await
    });

    conversion
        .await
        .map_err(|e| AppError::generation(failure, GenerationError::Task(e.to_string())))?
        .map_err(|e| AppError::generation(failure, e))
}

/// 200 response carrying a PDF download
pub fn pdf_response(filename: &str, pdf: Bytes) -> Result<Response> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .map_err(|e| AppError::Internal(format!("Invalid filename {:?}: {}", filename, e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, pdf.len())
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

/// `attachment; filename="..."`, plus `filename*` when the name is not plain ASCII
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

/// Elapsed milliseconds for log fields
pub fn elapsed_ms(started: std::time::Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
