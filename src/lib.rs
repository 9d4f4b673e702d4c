//! LADP PDF Server Library
//!
//! Renders the delivery back-office documents (bons de livraison, feuilles de
//! synthèse, fiches de préparation) to HTML and has Gotenberg turn them into
//! PDF. The binary in main.rs only wires configuration and the listener.
//!
//! # Modules
//!
//! - `documents`: payload types, date formatting, pagination, sorting
//! - `templates`: Tera rendering with branding
//! - `gotenberg`: the PDF engine client
//! - `routes`, `auth`: the HTTP surface

pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod gotenberg;
pub mod routes;
pub mod state;
pub mod templates;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::router;
pub use state::AppState;
