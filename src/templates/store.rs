//! Template source cache
//!
//! Compiled templates live in a single `Tera` instance owned by the store.
//! How that instance is filled depends on the [`CachePolicy`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use parking_lot::RwLock;
use tera::{Context, Tera};

use super::TemplateError;

/// When template files are read from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Every `*.html` file is compiled at startup; nothing is read afterwards
    Preload,
    /// Compiled on first use and kept for the lifetime of the process
    #[default]
    Lazy,
    /// Read and compiled on every render (template development)
    Off,
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preload" => Ok(Self::Preload),
            "lazy" => Ok(Self::Lazy),
            "off" | "none" | "disabled" => Ok(Self::Off),
            other => Err(format!(
                "unknown template cache policy '{}' (expected preload, lazy or off)",
                other
            )),
        }
    }
}

pub struct TemplateStore {
    dir: PathBuf,
    policy: CachePolicy,
    tera: RwLock<Tera>,
}

impl TemplateStore {
    /// Create a store over `dir`; with [`CachePolicy::Preload`] this compiles
    /// every template right away and fails on the first broken one.
    pub fn new(dir: impl Into<PathBuf>, policy: CachePolicy) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let mut tera = Tera::default();

        if policy == CachePolicy::Preload {
            preload(&dir, &mut tera)?;
            tracing::info!(
                dir = %dir.display(),
                count = tera.get_template_names().count(),
                "Templates preloaded"
            );
        }

        Ok(Self {
            dir,
            policy,
            tera: RwLock::new(tera),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `name` is compiled and held in memory
    pub fn is_cached(&self, name: &str) -> bool {
        has_template(&self.tera.read(), name)
    }

    pub async fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        if !is_plain_name(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        match self.policy {
            CachePolicy::Preload => self.render_cached(name, context),
            CachePolicy::Lazy => {
                if !self.is_cached(name) {
                    let source = self.read_source(name).await?;
                    let mut tera = self.tera.write();
                    // Another request may have loaded it while we were reading
                    if !has_template(&tera, name) {
                        tera.add_raw_template(name, &source)
                            .map_err(|e| TemplateError::render(name, &e))?;
                        tracing::debug!(template = name, "Template cached");
                    }
                }
                self.render_cached(name, context)
            }
            CachePolicy::Off => {
                let source = self.read_source(name).await?;
                let mut tera = Tera::default();
                tera.add_raw_template(name, &source)
                    .map_err(|e| TemplateError::render(name, &e))?;
                tera.render(name, context)
                    .map_err(|e| TemplateError::render(name, &e))
            }
        }
    }

    fn render_cached(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        let tera = self.tera.read();
        if !has_template(&tera, name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        tera.render(name, context)
            .map_err(|e| TemplateError::render(name, &e))
    }

    async fn read_source(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TemplateError::io(name, e))
    }
}

fn has_template(tera: &Tera, name: &str) -> bool {
    tera.get_template_names().any(|n| n == name)
}

/// Template names are bare file names; no directory components
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.starts_with('.')
}

fn preload(dir: &Path, tera: &mut Tera) -> Result<(), TemplateError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| TemplateError::io(&dir.display().to_string(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| TemplateError::io(&dir.display().to_string(), e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let source = std::fs::read_to_string(&path).map_err(|e| TemplateError::io(name, e))?;
        tera.add_raw_template(name, &source)
            .map_err(|e| TemplateError::render(name, &e))?;
    }

    Ok(())
}
