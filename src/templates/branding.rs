//! Shared branding (logo) injected into every document

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

use crate::gotenberg::Asset;

/// Logo file shipped next to the templates, under `assets/`
pub const LOGO_FILENAME: &str = "ladp_logo.svg";

/// Values exposed to templates as `branding.*`
#[derive(Debug, Clone, Default, Serialize)]
pub struct Branding {
    pub logo_svg: Option<String>,
    pub logo_base64: Option<String>,
    pub logo_data_uri: Option<String>,
}

impl Branding {
    /// Load the logo from `{templates_dir}/assets`; a missing logo is not an error
    pub fn load(templates_dir: &Path) -> (Self, Vec<Asset>) {
        let path = templates_dir.join("assets").join(LOGO_FILENAME);

        match std::fs::read(&path) {
            Ok(bytes) => {
                let encoded = BASE64.encode(&bytes);
                let branding = Self {
                    logo_svg: Some(String::from_utf8_lossy(&bytes).into_owned()),
                    logo_data_uri: Some(format!("data:image/svg+xml;base64,{}", encoded)),
                    logo_base64: Some(encoded),
                };
                (branding, vec![Asset::new(LOGO_FILENAME, bytes)])
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Logo not found, documents will be unbranded"
                );
                (Self::default(), Vec::new())
            }
        }
    }

    pub fn has_logo(&self) -> bool {
        self.logo_svg.is_some()
    }
}
