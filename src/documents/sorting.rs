//! Order and product ordering for the summary and picking sheets

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::types::{number_of, PreparationProduct, SummaryOrder};

/// Ordering of orders on the tour summary
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderSortMode {
    /// Client name, French collation
    Alpha,
    /// Order number
    #[default]
    Numero,
    /// Delivery order as received
    Time,
    /// Anything else: keep the received order
    Unknown(String),
}

impl From<&str> for OrderSortMode {
    fn from(s: &str) -> Self {
        match s {
            "alpha" => Self::Alpha,
            "numero" => Self::Numero,
            "time" => Self::Time,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Ordering of products on the picking sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductSortMode {
    /// Product name, French collation
    #[default]
    Alphabetical,
    /// Largest overall quantity first
    Total,
    /// Per delivery type; products arrive already grouped
    Type,
    Unknown(String),
}

impl From<&str> for ProductSortMode {
    fn from(s: &str) -> Self {
        match s {
            "alphabetical" => Self::Alphabetical,
            "total" => Self::Total,
            "type" => Self::Type,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Return `orders` in the requested order; the input is left untouched
pub fn sort_orders(orders: &[SummaryOrder], mode: &OrderSortMode) -> Vec<SummaryOrder> {
    let mut sorted = orders.to_vec();

    match mode {
        OrderSortMode::Alpha => sorted.sort_by(|a, b| {
            french_compare(
                a.client_nom.as_deref().unwrap_or(""),
                b.client_nom.as_deref().unwrap_or(""),
            )
        }),
        OrderSortMode::Numero => sorted.sort_by(|a, b| {
            a.numero
                .as_deref()
                .unwrap_or("")
                .cmp(b.numero.as_deref().unwrap_or(""))
        }),
        OrderSortMode::Time | OrderSortMode::Unknown(_) => {}
    }

    sorted
}

/// Return `products` in the requested order; the input is left untouched
pub fn sort_products(
    products: &[PreparationProduct],
    mode: &ProductSortMode,
) -> Vec<PreparationProduct> {
    let mut sorted = products.to_vec();

    match mode {
        ProductSortMode::Alphabetical => sorted.sort_by(|a, b| {
            french_compare(
                a.produit_nom.as_deref().unwrap_or(""),
                b.produit_nom.as_deref().unwrap_or(""),
            )
        }),
        ProductSortMode::Total => sorted.sort_by(|a, b| {
            let ta = a.total_all.as_ref().map(number_of).unwrap_or(0.0);
            let tb = b.total_all.as_ref().map(number_of).unwrap_or(0.0);
            tb.partial_cmp(&ta).unwrap_or(Ordering::Equal)
        }),
        // TODO: sort by the delivery type named in sortMode once the back-office sends its id
        ProductSortMode::Type | ProductSortMode::Unknown(_) => {}
    }

    sorted
}

/// Accent- and case-insensitive key ("Élodie" sorts with "elodie")
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uppercase positions; lowercase sorts first on an otherwise equal name
fn case_key(s: &str) -> Vec<bool> {
    s.chars().map(char::is_uppercase).collect()
}

/// French-style comparison: base letters, then accents, then case
/// ("durand" < "Durand"), exact spelling as the last tiebreak
pub fn french_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}
