//! Document preparation
//!
//! Turns validated request payloads into template contexts:
//!
//! - `formatters`: Europe/Paris date display
//! - `pagination`: order lines split into printed pages
//! - `sorting`: order / product ordering modes
//! - `avis`, `summary`, `preparation`: per-document context builders

pub mod avis;
pub mod formatters;
pub mod pagination;
pub mod preparation;
pub mod sorting;
pub mod summary;
pub mod types;

pub use avis::{AvisBatchContext, AvisContext, BatchPage, FormattedOrder};
pub use pagination::{paginate, Page};
pub use preparation::PreparationContext;
pub use sorting::{sort_orders, sort_products, OrderSortMode, ProductSortMode};
pub use summary::SummaryContext;
pub use types::{
    AvisBatchRequest, AvisRequest, PreparationRequest, Record, SummaryOrder, SummaryRequest,
};
