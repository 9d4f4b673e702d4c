//! Request records for each document endpoint
//!
//! Fields the server interprets are typed; everything else is carried through
//! `extra` so templates see the payload as the back-office sent it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// Free-form JSON object (company records, order lines, ...)
pub type Record = serde_json::Map<String, Value>;

// ============================================================================
// Bon de livraison
// ============================================================================

/// Order header of a delivery note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order number; the back-office sends it as text or as a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<Value>,

    /// ISO-8601 creation instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    /// `YYYY-MM-DD` delivery day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_livraison: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demandes_speciales: Option<Value>,

    #[serde(flatten)]
    pub extra: Record,
}

impl Order {
    /// Whether special requests must be printed on the first page
    pub fn has_special_requests(&self) -> bool {
        self.demandes_speciales.as_ref().is_some_and(is_truthy)
    }

    /// `numero` as printed (`"CMD-1"`, `"42"`), empty when absent
    pub fn numero_text(&self) -> String {
        match &self.numero {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

impl Validate for Order {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let numero = self.numero.as_ref().is_some_and(is_truthy);
        let date_created = self.date_created.as_deref().is_some_and(|d| !d.is_empty());
        let date_livraison = self.date_livraison.as_deref().is_some_and(|d| !d.is_empty());

        let mut errors = ValidationErrors::new();
        let mut valid = true;
        for (field, present, message) in [
            ("numero", numero, "order.numero is required"),
            ("date_created", date_created, "order.date_created is required"),
            ("date_livraison", date_livraison, "order.date_livraison is required"),
        ] {
            if !present {
                let mut error = ValidationError::new("required");
                error.message = Some(message.into());
                errors.add(field, error);
                valid = false;
            }
        }

        if valid {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `POST /api/pdf/avis`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AvisRequest {
    pub company: Record,
    #[validate(nested)]
    pub order: Order,
    pub lignes: Vec<Value>,
}

/// `POST /api/pdf/avis-batch`
///
/// Entries are kept raw: a malformed entry is skipped, not rejected.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AvisBatchRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "orders array is required and must not be empty"))]
    pub orders: Vec<Value>,
}

/// One usable entry of a batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    pub company: Record,
    pub order: Order,
    pub lignes: Vec<Value>,
}

// ============================================================================
// Feuille de synthèse
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryMeta {
    #[validate(length(min = 1, message = "meta.date is required"))]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_formatted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TourType {
    #[validate(length(min = 1, message = "tour.type.nom is required"))]
    pub nom: String,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tour {
    #[serde(rename = "type")]
    #[validate(nested)]
    pub kind: TourType,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOrder {
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_nom: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `POST /api/pdf/summary`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(nested)]
    pub meta: SummaryMeta,
    #[validate(nested)]
    pub tour: Tour,
    pub orders: Vec<SummaryOrder>,
    #[serde(default)]
    pub sort_mode: Option<String>,
}

// ============================================================================
// Fiche de préparation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryType {
    pub id: Value,
    #[serde(flatten)]
    pub extra: Record,
}

impl DeliveryType {
    /// Key used by `totals` / `details` maps (JSON object keys are strings)
    pub fn key(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreparationMeta {
    #[validate(length(min = 1, message = "meta.title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "meta.selectedDate is required"))]
    pub selected_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_mode: Option<Record>,
    #[serde(default)]
    pub delivery_types: Vec<DeliveryType>,
    #[serde(flatten)]
    pub extra: Record,
}

impl PreparationMeta {
    /// `sortMode.type`, if any
    pub fn sort_mode_name(&self) -> Option<&str> {
        self.sort_mode
            .as_ref()
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
    }
}

/// Per-client quantity for one delivery type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantite: Option<Value>,
    /// Anything truthy marks an in-house client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_maison: Option<Value>,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produit_nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_all: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<PreparationDetail>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maison_total: Option<Value>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `POST /api/pdf/preparation`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreparationRequest {
    #[validate(nested)]
    pub meta: PreparationMeta,
    pub products: Vec<PreparationProduct>,
}

// ============================================================================
// Value helpers
// ============================================================================

/// Loose truthiness used by the back-office payloads
///
/// `null`, `false`, `0` and `""` are falsy; arrays and objects are truthy
/// even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accepts `"C-1"` or `1042`; numbers keep their JSON spelling
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Numeric reading of a quantity that may arrive as a number or a string
pub fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// JSON number without a spurious `.0` for whole values
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("Sans gluten")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_order_keeps_unknown_fields() {
        let order: Order = serde_json::from_value(json!({
            "numero": "CMD-1",
            "date_created": "2025-10-31T08:30:00Z",
            "date_livraison": "2025-11-01",
            "client_nom": "Boulangerie Martin"
        }))
        .unwrap();

        assert!(order.validate().is_ok());
        assert!(!order.has_special_requests());
        assert_eq!(order.extra["client_nom"], "Boulangerie Martin");

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["client_nom"], "Boulangerie Martin");
        assert!(back.get("demandes_speciales").is_none());
    }

    #[test]
    fn test_order_missing_numero_fails_validation() {
        let order: Order = serde_json::from_value(json!({
            "date_created": "2025-10-31T08:30:00Z",
            "date_livraison": "2025-11-01"
        }))
        .unwrap();

        let errors = order.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("numero"));
    }

    #[test]
    fn test_order_accepts_numeric_numero() {
        let order: Order = serde_json::from_value(json!({
            "numero": 1042,
            "date_created": "2025-10-31T08:30:00Z",
            "date_livraison": "2025-11-01"
        }))
        .unwrap();

        assert!(order.validate().is_ok());
        assert_eq!(order.numero_text(), "1042");
    }

    #[test]
    fn test_order_empty_fields_fail_validation() {
        let order: Order = serde_json::from_value(json!({
            "numero": "",
            "date_created": "2025-10-31T08:30:00Z",
            "date_livraison": ""
        }))
        .unwrap();

        let errors = order.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("numero"));
        assert!(fields.contains_key("date_livraison"));
        assert!(!fields.contains_key("date_created"));
    }

    #[test]
    fn test_summary_order_numeric_numero() {
        let order: SummaryOrder =
            serde_json::from_value(json!({"numero": 1042, "client_nom": "Durand"})).unwrap();
        assert_eq!(order.numero.as_deref(), Some("1042"));

        let order: SummaryOrder = serde_json::from_value(json!({"numero": null})).unwrap();
        assert_eq!(order.numero, None);
    }

    #[test]
    fn test_detail_accepts_loose_is_maison() {
        let detail: PreparationDetail =
            serde_json::from_value(json!({"quantite": 2, "is_maison": 1})).unwrap();
        assert!(detail.is_maison.as_ref().is_some_and(is_truthy));
    }

    #[test]
    fn test_avis_rejects_non_array_lines() {
        let result = serde_json::from_value::<AvisRequest>(json!({
            "company": {},
            "order": {"numero": "1", "date_created": "x", "date_livraison": "y"},
            "lignes": "nope"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(number_of(&json!(3)), 3.0);
        assert_eq!(number_of(&json!("2.5")), 2.5);
        assert_eq!(number_of(&json!("abc")), 0.0);
        assert_eq!(number_of(&json!(null)), 0.0);
        assert_eq!(number_value(4.0), json!(4));
        assert_eq!(number_value(1.5), json!(1.5));
    }

    #[test]
    fn test_delivery_type_key() {
        let numeric: DeliveryType =
            serde_json::from_value(json!({"id": 3, "nom": "Matin"})).unwrap();
        let text: DeliveryType = serde_json::from_value(json!({"id": "soir"})).unwrap();
        assert_eq!(numeric.key(), "3");
        assert_eq!(text.key(), "soir");
    }
}
