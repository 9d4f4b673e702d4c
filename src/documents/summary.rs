//! Feuille de synthèse context building

use serde::Serialize;

use super::formatters::format_date_readable;
use super::sorting::{sort_orders, OrderSortMode};
use super::types::{SummaryMeta, SummaryOrder, SummaryRequest, Tour};

/// Template context for `summary.html`
#[derive(Debug, Serialize)]
pub struct SummaryContext {
    pub meta: SummaryMeta,
    pub tour: Tour,
    pub orders: Vec<SummaryOrder>,
    #[serde(skip)]
    pub sort_mode: OrderSortMode,
}

impl SummaryContext {
    pub fn new(request: SummaryRequest) -> Self {
        let sort_mode = request
            .sort_mode
            .as_deref()
            .map(OrderSortMode::from)
            .unwrap_or_default();

        let date_formatted = request
            .meta
            .date_formatted
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format_date_readable(&request.meta.date));

        Self {
            meta: SummaryMeta {
                date: request.meta.date,
                date_formatted: Some(date_formatted),
            },
            tour: request.tour,
            orders: sort_orders(&request.orders, &sort_mode),
            sort_mode,
        }
    }

    /// `summary-2025-10-31-tournee-matin.pdf`
    pub fn filename(&self) -> String {
        let tour_name = self
            .tour
            .kind
            .nom
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("summary-{}-{}.pdf", self.meta.date, tour_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(extra: serde_json::Value) -> SummaryRequest {
        let mut body = json!({
            "meta": {"date": "2025-10-31"},
            "tour": {"type": {"nom": "Tournée  du Matin"}, "chauffeur": "Paul"},
            "orders": [
                {"numero": "C-2", "client_nom": "Zoé"},
                {"numero": "C-1", "client_nom": "Amélie"}
            ]
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            body.extend(extra.clone());
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults() {
        let ctx = SummaryContext::new(request(json!({})));
        assert_eq!(ctx.sort_mode, OrderSortMode::Numero);
        assert_eq!(ctx.orders[0].numero.as_deref(), Some("C-1"));
        assert_eq!(
            ctx.meta.date_formatted.as_deref(),
            Some("vendredi 31 octobre 2025")
        );
        assert_eq!(ctx.filename(), "summary-2025-10-31-tournée-du-matin.pdf");
    }

    #[test]
    fn test_provided_date_formatted_is_kept() {
        let ctx = SummaryContext::new(request(json!({
            "meta": {"date": "2025-10-31", "date_formatted": "Vendredi"},
            "sort_mode": "time"
        })));
        assert_eq!(ctx.meta.date_formatted.as_deref(), Some("Vendredi"));
        assert_eq!(ctx.orders[0].numero.as_deref(), Some("C-2"));
    }

    #[test]
    fn test_tour_passes_through() {
        let ctx = SummaryContext::new(request(json!({})));
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["tour"]["type"]["nom"], "Tournée  du Matin");
        assert_eq!(value["tour"]["chauffeur"], "Paul");
        assert!(value.get("sort_mode").is_none());
    }
}
