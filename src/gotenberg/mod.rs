//! Gotenberg rendering service
//!
//! Documents are rasterized by an external Gotenberg instance. The server
//! talks to it through the [`PdfEngine`] trait so routes can be exercised
//! without a running Chromium.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ladp_pdf_server::gotenberg::{GotenbergClient, PdfEngine};
//!
//! let client = GotenbergClient::new(&config.gotenberg)?;
//! let pdf = client.convert_html(html, renderer.assets()).await?;
//! ```

mod client;
mod types;

pub use client::{GotenbergClient, PdfEngine};
pub use types::{Asset, GotenbergError};
