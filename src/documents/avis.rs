//! Bon de livraison context building (single and batch)

use serde::Serialize;
use serde_json::Value;

use super::formatters::{format_date_paris, format_ymd};
use super::pagination::{paginate, Page};
use super::types::{AvisBatchRequest, AvisRequest, BatchEntry, Order, Record};

/// Order header with its display dates next to the raw ones
#[derive(Debug, Clone, Serialize)]
pub struct FormattedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub date_created_formatted: String,
    pub date_livraison_formatted: String,
}

impl From<Order> for FormattedOrder {
    fn from(order: Order) -> Self {
        let date_created_formatted = order
            .date_created
            .as_deref()
            .map(format_date_paris)
            .unwrap_or_default();
        let date_livraison_formatted = order
            .date_livraison
            .as_deref()
            .map(format_ymd)
            .unwrap_or_default();

        Self {
            order,
            date_created_formatted,
            date_livraison_formatted,
        }
    }
}

/// Template context for `avis.html` (single order)
#[derive(Debug, Serialize)]
pub struct AvisContext {
    pub company: Record,
    pub order: FormattedOrder,
    pub pages: Vec<Page<Value>>,
}

impl AvisContext {
    pub fn new(request: AvisRequest) -> Self {
        let reduced = request.order.has_special_requests();
        Self {
            company: request.company,
            order: request.order.into(),
            pages: paginate(request.lignes, reduced),
        }
    }

    pub fn filename(&self) -> String {
        format!("bon-livraison-{}.pdf", self.order.order.numero_text())
    }
}

/// A page of a batch: each one repeats the header of the order it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct BatchPage {
    #[serde(flatten)]
    pub page: Page<Value>,
    pub company: Record,
    pub order: FormattedOrder,
}

/// Template context for `avis.html` (several orders in one document)
#[derive(Debug, Serialize)]
pub struct AvisBatchContext {
    pub pages: Vec<BatchPage>,
    #[serde(skip)]
    pub orders_rendered: usize,
    #[serde(skip)]
    pub orders_skipped: usize,
}

impl AvisBatchContext {
    pub const FILENAME: &'static str = "bons-de-livraison-batch.pdf";

    /// Paginate every usable entry; malformed entries are skipped
    pub fn new(request: AvisBatchRequest) -> Self {
        let mut pages = Vec::new();
        let mut orders_rendered = 0;
        let mut orders_skipped = 0;

        for (index, raw) in request.orders.into_iter().enumerate() {
            let entry: BatchEntry = match serde_json::from_value(raw) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping invalid order in batch");
                    orders_skipped += 1;
                    continue;
                }
            };

            let reduced = entry.order.has_special_requests();
            let order = FormattedOrder::from(entry.order);
            for page in paginate(entry.lignes, reduced) {
                pages.push(BatchPage {
                    page,
                    company: entry.company.clone(),
                    order: order.clone(),
                });
            }
            orders_rendered += 1;
        }

        Self {
            pages,
            orders_rendered,
            orders_skipped,
        }
    }
}
