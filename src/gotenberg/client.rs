//! HTML to PDF conversion through Gotenberg's Chromium route

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::multipart::{Form, Part};

use super::types::{Asset, GotenbergError};
use crate::config::GotenbergConfig;

const CONVERT_PATH: &str = "/forms/chromium/convert/html";
const HEALTH_PATH: &str = "/health";

/// Page layout is driven by the templates' CSS (`@page`)
const LAYOUT_FIELDS: &[(&str, &str)] = &[
    ("marginTop", "0"),
    ("marginBottom", "0"),
    ("marginLeft", "0"),
    ("marginRight", "0"),
    ("preferCssPageSize", "true"),
    ("printBackground", "true"),
];

/// Anything able to turn an HTML page into a PDF
#[async_trait]
pub trait PdfEngine: Send + Sync {
    /// Convert `html` (plus the files it references) into a PDF; one attempt, no retry
    async fn convert_html(&self, html: String, assets: &[Asset]) -> Result<Bytes, GotenbergError>;

    /// Check if the engine answers
    async fn is_healthy(&self) -> bool;
}

/// Gotenberg HTTP client
#[derive(Clone)]
pub struct GotenbergClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl GotenbergClient {
    pub fn new(config: &GotenbergConfig) -> Result<Self, GotenbergError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GotenbergError::Failed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            health_timeout: config.health_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_form(html: String, assets: &[Asset]) -> Result<Form, GotenbergError> {
        let index = Part::bytes(html.into_bytes())
            .file_name("index.html")
            .mime_str("text/html")
            .map_err(|e| GotenbergError::Failed(e.to_string()))?;
        let mut form = Form::new().part("files", index);

        for asset in assets {
            let part = Part::bytes(asset.content.clone())
                .file_name(asset.filename.clone())
                .mime_str(&asset.content_type())
                .map_err(|e| GotenbergError::Failed(e.to_string()))?;
            form = form.part("files", part);
        }

        for (field, value) in LAYOUT_FIELDS {
            form = form.text(*field, *value);
        }

        Ok(form)
    }
}

/// Map transport failures to what the caller reports
fn classify(err: reqwest::Error) -> GotenbergError {
    if err.is_timeout() {
        GotenbergError::TimedOut
    } else if err.is_connect() {
        GotenbergError::Unavailable
    } else {
        GotenbergError::Failed(err.to_string())
    }
}

#[async_trait]
impl PdfEngine for GotenbergClient {
    async fn convert_html(&self, html: String, assets: &[Asset]) -> Result<Bytes, GotenbergError> {
        let started = Instant::now();
        let url = format!("{}{}", self.base_url, CONVERT_PATH);
        let form = Self::build_form(html, assets)?;

        let result = async {
            let response = self
                .client
                .post(&url)
                .multipart(form)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(classify)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GotenbergError::Failed(format!(
                    "Gotenberg returned {}: {}",
                    status,
                    body.trim()
                )));
            }

            response.bytes().await.map_err(classify)
        }
        .await;

        match &result {
            Ok(pdf) => tracing::info!(
                size = pdf.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "PDF generated successfully"
            ),
            Err(e) => tracing::error!(
                error = %e,
                gotenberg_url = %self.base_url,
                duration_ms = started.elapsed().as_millis() as u64,
                "PDF generation failed"
            ),
        }

        result
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);

        match self.client.get(&url).timeout(self.health_timeout).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    gotenberg_url = %self.base_url,
                    "Gotenberg health check failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Router;
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    struct SeenPart {
        name: String,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    }

    type Seen = Arc<Mutex<Vec<SeenPart>>>;

    async fn fake_convert(State(seen): State<Seen>, mut multipart: Multipart) -> &'static [u8] {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let part = SeenPart {
                name: field.name().unwrap_or_default().to_string(),
                file_name: field.file_name().map(str::to_string),
                content_type: field.content_type().map(str::to_string),
                data: field.bytes().await.unwrap().to_vec(),
            };
            seen.lock().push(part);
        }
        b"%PDF-1.7 fake"
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(url: &str, timeout: Duration) -> GotenbergClient {
        GotenbergClient::new(&GotenbergConfig {
            url: url.to_string(),
            timeout,
            health_timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    /// Address nothing listens on
    async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_convert_sends_html_assets_and_layout() {
        let seen: Seen = Arc::default();
        let url = spawn(
            Router::new()
                .route(CONVERT_PATH, post(fake_convert))
                .with_state(seen.clone()),
        )
        .await;

        let gotenberg = client(&format!("{}/", url), Duration::from_secs(5));
        assert_eq!(gotenberg.base_url(), url);

        let pdf = gotenberg
            .convert_html(
                "<html>bonjour</html>".to_string(),
                &[Asset::new("ladp_logo.svg", "<svg/>")],
            )
            .await
            .unwrap();
        assert_eq!(&pdf[..], b"%PDF-1.7 fake");

        let parts = seen.lock().clone();
        let files: Vec<_> = parts.iter().filter(|p| p.name == "files").collect();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name.as_deref(), Some("index.html"));
        assert_eq!(files[0].content_type.as_deref(), Some("text/html"));
        assert_eq!(files[0].data, b"<html>bonjour</html>");
        assert_eq!(files[1].file_name.as_deref(), Some("ladp_logo.svg"));
        assert_eq!(files[1].content_type.as_deref(), Some("image/svg+xml"));

        for (field, value) in LAYOUT_FIELDS {
            let part = parts.iter().find(|p| p.name == *field).unwrap();
            assert_eq!(part.data, value.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let gotenberg = client(&closed_port_url().await, Duration::from_secs(5));
        let err = gotenberg.convert_html("<html/>".into(), &[]).await.unwrap_err();
        assert_eq!(err, GotenbergError::Unavailable);
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let url = spawn(Router::new().route(
            CONVERT_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;

        let gotenberg = client(&url, Duration::from_millis(200));
        let err = gotenberg.convert_html("<html/>".into(), &[]).await.unwrap_err();
        assert_eq!(err, GotenbergError::TimedOut);
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_message() {
        let url = spawn(Router::new().route(
            CONVERT_PATH,
            post(|| async { (StatusCode::BAD_REQUEST, "Invalid form data: no index.html") }),
        ))
        .await;

        let gotenberg = client(&url, Duration::from_secs(5));
        match gotenberg.convert_html("<html/>".into(), &[]).await {
            Err(GotenbergError::Failed(message)) => {
                assert!(message.contains("400"), "{message}");
                assert!(message.contains("Invalid form data: no index.html"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let url = spawn(Router::new().route(HEALTH_PATH, get(|| async { "ok" }))).await;
        assert!(client(&url, Duration::from_secs(1)).is_healthy().await);

        let down = client(&closed_port_url().await, Duration::from_secs(1));
        assert!(!down.is_healthy().await);
    }
}
