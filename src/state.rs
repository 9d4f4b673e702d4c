//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::gotenberg::{GotenbergClient, GotenbergError, PdfEngine};
use crate::templates::{TemplateError, TemplateRenderer};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize templates: {0}")]
    Templates(#[from] TemplateError),

    #[error("Failed to initialize Gotenberg client: {0}")]
    Gotenberg(#[from] GotenbergError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    templates: TemplateRenderer,
    engine: Arc<dyn PdfEngine>,
}

impl AppState {
    /// Build the state used in production: templates from disk, Gotenberg over HTTP
    pub fn from_config(config: Config) -> Result<Self, StateError> {
        let templates = TemplateRenderer::new(&config.templates.dir, config.templates.cache)?;
        let engine = GotenbergClient::new(&config.gotenberg)?;

        tracing::info!(
            templates_dir = %config.templates.dir.display(),
            template_cache = ?config.templates.cache,
            gotenberg_url = %engine.base_url(),
            logo = templates.branding().has_logo(),
            "Application state initialized"
        );

        Ok(Self::new(config, templates, Arc::new(engine)))
    }

    /// Create a state around any PDF engine
    pub fn new(config: Config, templates: TemplateRenderer, engine: Arc<dyn PdfEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                templates,
                engine,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the template renderer
    pub fn templates(&self) -> &TemplateRenderer {
        &self.inner.templates
    }

    /// Get the PDF engine
    pub fn engine(&self) -> &dyn PdfEngine {
        self.inner.engine.as_ref()
    }
}
