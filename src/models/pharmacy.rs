use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub rating: Option<Decimal>,
    pub is_open_24_hours: bool,
    pub delivery_time: Option<String>,
    pub distance: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub delivery_fee: Option<Decimal>,
    pub onboarding_status: String,
    pub is_default: bool,
}

/// Payload for POST /api/pharmacies. Name, address and phone are required;
/// the rest falls back to the same defaults the schema declares.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePharmacy {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default = "default_hours")]
    pub hours: String,
    #[serde(default = "default_rating")]
    pub rating: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_open_24_hours: bool,
    #[serde(default = "default_delivery_time")]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: Option<Decimal>,
    #[serde(default = "default_onboarding_status")]
    pub onboarding_status: String,
}

fn default_hours() -> String {
    "24/7".to_string()
}

fn default_rating() -> Option<Decimal> {
    Some(Decimal::new(45, 1))
}

fn default_true() -> bool {
    true
}

fn default_delivery_time() -> Option<String> {
    Some("15-20 min".to_string())
}

fn default_delivery_fee() -> Option<Decimal> {
    Some(Decimal::ZERO)
}

fn default_onboarding_status() -> String {
    "pending".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_gets_schema_defaults() {
        let payload: CreatePharmacy = serde_json::from_value(serde_json::json!({
            "name": "Ocean View Pharmacy",
            "address": "123 Beach Road, Coastal City",
            "phone": "+1-555-0100",
        }))
        .unwrap();

        assert_eq!(payload.hours, "24/7");
        assert_eq!(payload.rating, Some(Decimal::new(45, 1)));
        assert!(payload.is_open_24_hours);
        assert_eq!(payload.delivery_time.as_deref(), Some("15-20 min"));
        assert_eq!(payload.delivery_fee, Some(Decimal::ZERO));
        assert_eq!(payload.onboarding_status, "pending");
        assert!(payload.distance.is_none());
    }

    #[test]
    fn decimal_fields_accept_strings() {
        let payload: CreatePharmacy = serde_json::from_value(serde_json::json!({
            "name": "HealthPlus Pharmacy",
            "address": "456 Main Street, Downtown",
            "phone": "+1-555-0200",
            "rating": "4.6",
            "latitude": "37.7849",
            "longitude": "-122.4294",
            "deliveryFee": "3.00",
        }))
        .unwrap();

        assert_eq!(payload.rating.unwrap().to_string(), "4.6");
        assert_eq!(payload.delivery_fee.unwrap().to_string(), "3.00");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result: Result<CreatePharmacy, _> = serde_json::from_value(serde_json::json!({
            "name": "No Address Pharmacy",
            "phone": "+1-555-0300",
        }));
        assert!(result.is_err());
    }
}
