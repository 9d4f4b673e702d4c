//! Fiche de préparation context building

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use super::formatters::format_date_time_paris;
use super::sorting::{sort_products, ProductSortMode};
use super::types::{
    is_truthy, number_of, number_value, DeliveryType, PreparationDetail, PreparationMeta,
    PreparationProduct, PreparationRequest,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationMetaView {
    #[serde(flatten)]
    pub meta: PreparationMeta,
    pub printed_at_formatted: String,
}

/// Quantity of one product for one delivery type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryValue {
    pub id: Value,
    pub value: Value,
    /// Quantity going to in-house ("maison") clients, `null` when none
    pub maison_count: Option<Value>,
    /// Per-client lines for this delivery type
    pub clients: Vec<PreparationDetail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedProduct {
    #[serde(flatten)]
    pub product: PreparationProduct,
    pub delivery_values: Vec<DeliveryValue>,
    pub maison_total: Option<Value>,
}

/// Template context for `preparation.html`
#[derive(Debug, Serialize)]
pub struct PreparationContext {
    pub meta: PreparationMetaView,
    pub products: Vec<PreparedProduct>,
    #[serde(skip)]
    pub sort_mode: ProductSortMode,
}

impl PreparationContext {
    /// `now` stamps the sheet when the caller did not send `printedAt`
    pub fn new(request: PreparationRequest, now: DateTime<Utc>) -> Self {
        let mut meta = request.meta;
        let sort_mode = meta
            .sort_mode_name()
            .map(ProductSortMode::from)
            .unwrap_or_default();

        let printed_at = meta
            .printed_at
            .take()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));
        let printed_at_formatted = format_date_time_paris(&printed_at);
        meta.printed_at = Some(printed_at);

        let products = sort_products(&request.products, &sort_mode)
            .into_iter()
            .map(|product| prepare_product(product, &meta.delivery_types))
            .collect();

        Self {
            meta: PreparationMetaView {
                meta,
                printed_at_formatted,
            },
            products,
            sort_mode,
        }
    }

    pub fn filename(&self) -> String {
        format!("fiche-preparation-{}.pdf", self.meta.meta.selected_date)
    }
}

fn prepare_product(
    product: PreparationProduct,
    delivery_types: &[DeliveryType],
) -> PreparedProduct {
    let delivery_values = delivery_types
        .iter()
        .map(|delivery_type| {
            let key = delivery_type.key();

            let value = product
                .totals
                .as_ref()
                .and_then(|totals| totals.get(&key))
                .filter(|v| is_truthy(v))
                .cloned()
                .unwrap_or_else(|| Value::from(0));

            let mut clients = product
                .details
                .as_ref()
                .and_then(|details| details.get(&key))
                .cloned()
                .unwrap_or_default();

            let maison: f64 = clients
                .iter()
                .filter(|d| d.is_maison.as_ref().is_some_and(is_truthy))
                .map(|d| d.quantite.as_ref().map(number_of).unwrap_or(0.0))
                .sum();

            // Only a literal `true` prints the in-house marker
            for client in &mut clients {
                client.is_maison = (client.is_maison == Some(Value::Bool(true)))
                    .then_some(Value::Bool(true));
            }

            DeliveryValue {
                id: delivery_type.id.clone(),
                value,
                maison_count: (maison > 0.0).then(|| number_value(maison)),
                clients,
            }
        })
        .collect();

    let maison_total = product
        .maison_total
        .as_ref()
        .filter(|v| number_of(v) > 0.0)
        .cloned();

    PreparedProduct {
        product,
        delivery_values,
        maison_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(meta_extra: Value) -> PreparationRequest {
        let mut meta = json!({
            "title": "Préparation",
            "selectedDate": "2025-10-31",
            "deliveryTypes": [{"id": 1, "nom": "Matin"}, {"id": "soir", "nom": "Soir"}]
        });
        if let (Some(meta), Some(extra)) = (meta.as_object_mut(), meta_extra.as_object()) {
            meta.extend(extra.clone());
        }
        serde_json::from_value(json!({
            "meta": meta,
            "products": [
                {
                    "produit_nom": "Croissant",
                    "total_all": 30,
                    "totals": {"1": 20, "soir": 10},
                    "maison_total": 5,
                    "details": {
                        "1": [
                            {"client": "Hôtel", "quantite": "3", "is_maison": true},
                            {"client": "Café", "quantite": 17, "is_maison": false}
                        ],
                        "soir": [
                            {"client": "Boutique", "quantite": 2, "is_maison": true}
                        ]
                    }
                },
                {"produit_nom": "Baguette", "total_all": 50, "totals": {"1": 50}, "maison_total": 0}
            ]
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 30, 16, 45, 0).unwrap()
    }

    #[test]
    fn test_defaults_printed_at_and_sorts_alphabetically() {
        let ctx = PreparationContext::new(request(json!({})), now());

        assert_eq!(ctx.sort_mode, ProductSortMode::Alphabetical);
        assert_eq!(ctx.meta.meta.printed_at.as_deref(), Some("2025-10-30T16:45:00.000Z"));
        assert_eq!(ctx.meta.printed_at_formatted, "30/10/2025 17:45");
        assert_eq!(ctx.products[0].product.produit_nom.as_deref(), Some("Baguette"));
        assert_eq!(ctx.filename(), "fiche-preparation-2025-10-31.pdf");
    }

    #[test]
    fn test_delivery_values() {
        let ctx = PreparationContext::new(request(json!({"sortMode": {"type": "total"}})), now());
        assert_eq!(ctx.sort_mode, ProductSortMode::Total);

        let baguette = &ctx.products[0];
        assert_eq!(baguette.product.produit_nom.as_deref(), Some("Baguette"));
        assert_eq!(baguette.delivery_values[0].value, json!(50));
        assert_eq!(baguette.delivery_values[1].value, json!(0));
        assert_eq!(baguette.delivery_values[0].maison_count, None);
        assert_eq!(baguette.maison_total, None);

        let croissant = &ctx.products[1];
        assert_eq!(croissant.delivery_values[0].maison_count, Some(json!(3)));
        assert_eq!(croissant.delivery_values[1].maison_count, Some(json!(2)));
        assert_eq!(croissant.delivery_values[0].clients.len(), 2);
        assert_eq!(croissant.maison_total, Some(json!(5)));
    }

    #[test]
    fn test_serialized_shape() {
        let ctx = PreparationContext::new(
            request(json!({"printedAt": "2025-10-31T05:00:00Z"})),
            now(),
        );
        let value = serde_json::to_value(&ctx).unwrap();

        assert_eq!(value["meta"]["printedAt"], "2025-10-31T05:00:00Z");
        assert_eq!(value["meta"]["printedAtFormatted"], "31/10/2025 06:00");
        assert_eq!(value["meta"]["selectedDate"], "2025-10-31");
        assert_eq!(value["products"][1]["deliveryValues"][0]["maisonCount"], 3);
        assert_eq!(value["products"][0]["maisonTotal"], Value::Null);
        assert_eq!(value["products"][1]["maison_total"], 5);
    }

    #[test]
    fn test_missing_delivery_types() {
        let request: PreparationRequest = serde_json::from_value(json!({
            "meta": {"title": "T", "selectedDate": "2025-10-31"},
            "products": [{"produit_nom": "Pain"}]
        }))
        .unwrap();
        let ctx = PreparationContext::new(request, now());
        assert!(ctx.products[0].delivery_values.is_empty());
    }

    #[test]
    fn test_loose_is_maison() {
        let request: PreparationRequest = serde_json::from_value(json!({
            "meta": {
                "title": "T",
                "selectedDate": "2025-10-31",
                "deliveryTypes": [{"id": 1}]
            },
            "products": [{
                "produit_nom": "Pain",
                "totals": {"1": 6},
                "details": {"1": [
                    {"client": "Hôtel", "quantite": 4, "is_maison": 1},
                    {"client": "Café", "quantite": 2, "is_maison": false}
                ]}
            }]
        }))
        .unwrap();

        let ctx = PreparationContext::new(request, now());
        let values = &ctx.products[0].delivery_values[0];
        assert_eq!(values.maison_count, Some(json!(4)));
        assert_eq!(values.clients[0].is_maison, None);
        assert_eq!(values.clients[1].is_maison, None);
    }
}
