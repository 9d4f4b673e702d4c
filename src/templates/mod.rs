//! HTML rendering
//!
//! Templates are Tera files kept to the logic-less subset: substitution,
//! `for` over provided sequences, `if` on presence, and `default` for
//! optional values. Every context also receives `branding.*`.

mod branding;
mod store;

use std::path::PathBuf;

use serde::Serialize;
use tera::Context;
use thiserror::Error;

use crate::gotenberg::Asset;

pub use branding::{Branding, LOGO_FILENAME};
pub use store::{CachePolicy, TemplateStore};

/// Template errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to render template {name}: {message}")]
    Render { name: String, message: String },

    #[error("Failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    fn render(name: &str, err: &tera::Error) -> Self {
        // Tera keeps the useful part (missing variable, parse position) in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self::Render {
            name: name.to_string(),
            message,
        }
    }

    fn io(name: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(name.to_string())
        } else {
            Self::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

/// Renders named templates with branding merged into the context
pub struct TemplateRenderer {
    store: TemplateStore,
    branding: Branding,
    assets: Vec<Asset>,
}

impl TemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>, policy: CachePolicy) -> Result<Self, TemplateError> {
        let store = TemplateStore::new(dir, policy)?;
        let (branding, assets) = Branding::load(store.dir());

        Ok(Self {
            store,
            branding,
            assets,
        })
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Binary files shipped to the rendering service alongside the HTML
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Render `name` with `data` (must serialize to a JSON object)
    pub async fn render<T: Serialize>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<String, TemplateError> {
        let mut context =
            Context::from_serialize(data).map_err(|e| TemplateError::render(name, &e))?;
        context.insert("branding", &self.branding);

        self.store.render(name, &context).await
    }
}
