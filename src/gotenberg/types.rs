//! Gotenberg client types

/// A file shipped next to `index.html` (logo, fonts, stylesheets)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Asset {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Guessed from the extension, `application/octet-stream` otherwise
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Rendering service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GotenbergError {
    #[error("Gotenberg service is unavailable")]
    Unavailable,

    #[error("PDF generation timed out")]
    TimedOut,

    #[error("PDF generation failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_content_type() {
        assert_eq!(Asset::new("ladp_logo.svg", "<svg/>").content_type(), "image/svg+xml");
        assert_eq!(Asset::new("style.css", "").content_type(), "text/css");
        assert_eq!(
            Asset::new("blob.unknownext", vec![0u8]).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GotenbergError::Unavailable.to_string(), "Gotenberg service is unavailable");
        assert_eq!(GotenbergError::TimedOut.to_string(), "PDF generation timed out");
        assert_eq!(
            GotenbergError::Failed("boom".into()).to_string(),
            "PDF generation failed: boom"
        );
    }
}
