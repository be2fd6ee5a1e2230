use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ApiError;

/// One pharmacy's listing of one catalog medication. Rows are owned by the
/// pharmacy in `pharmacy_id`; `(pharmacy_id, medication_id)` is not unique,
/// so callers must not assume a single listing per medication.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub medication_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub in_stock: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub batch_number: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Payload for POST /api/inventory. The owning pharmacy is taken from the
/// caller's user record, never from the payload, so there is no pharmacyId
/// field here; clients that send one have it silently dropped.
///
/// Money and date fields tolerate the serializations real clients produce:
/// price as a JSON number or a numeric string, expiry as RFC 3339 or a
/// plain `YYYY-MM-DD` date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryItem {
    pub medication_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
    #[serde(deserialize_with = "lenient_decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub original_price: Option<Decimal>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default, deserialize_with = "lenient_datetime_opt")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub batch_number: Option<String>,
}

impl CreateInventoryItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.quantity < 0 {
            return Err(ApiError::Validation(
                "quantity must be zero or greater".to_string(),
            ));
        }
        Ok(())
    }

    /// Rescale money fields to two decimals before storage so a price sent
    /// as `12.5` reads back as `12.50`.
    pub fn normalize(&mut self) {
        self.price.rescale(2);
        if let Some(original) = self.original_price.as_mut() {
            original.rescale(2);
        }
    }
}

/// Payload for PATCH /api/inventory/:id. Absent fields keep their stored
/// value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryItem {
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default, deserialize_with = "lenient_datetime_opt")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub batch_number: Option<String>,
}

impl UpdateInventoryItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        if matches!(self.quantity, Some(q) if q < 0) {
            return Err(ApiError::Validation(
                "quantity must be zero or greater".to_string(),
            ));
        }
        Ok(())
    }

    pub fn normalize(&mut self) {
        if let Some(price) = self.price.as_mut() {
            price.rescale(2);
        }
        if let Some(original) = self.original_price.as_mut() {
            original.rescale(2);
        }
    }
}

fn default_in_stock() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(f64),
    Text(String),
}

fn decimal_from_raw<E: serde::de::Error>(raw: RawDecimal) -> Result<Decimal, E> {
    match raw {
        RawDecimal::Number(n) => {
            Decimal::from_f64(n).ok_or_else(|| E::custom(format!("invalid decimal: {n}")))
        }
        RawDecimal::Text(s) => {
            Decimal::from_str(s.trim()).map_err(|_| E::custom(format!("invalid decimal: {s:?}")))
        }
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    decimal_from_raw(RawDecimal::deserialize(deserializer)?)
}

fn lenient_decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDecimal>::deserialize(deserializer)? {
        Some(raw) => decimal_from_raw(raw).map(Some),
        None => Ok(None),
    }
}

fn lenient_datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        let midnight = date.and_time(NaiveTime::MIN);
        return Ok(Some(DateTime::from_naive_utc_and_offset(midnight, Utc)));
    }

    Err(serde::de::Error::custom(format!("invalid date: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDICATION_ID: &str = "5e3e83b1-1cc6-49af-97b5-f5b0c7f8a101";

    fn create_payload(value: serde_json::Value) -> CreateInventoryItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn price_as_number_normalizes_to_two_decimals() {
        let mut item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "quantity": 10,
            "price": 12.5,
        }));
        item.normalize();
        assert_eq!(item.price.to_string(), "12.50");
    }

    #[test]
    fn price_as_string_normalizes_to_two_decimals() {
        let mut item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "price": "5",
            "originalPrice": "7.125",
        }));
        item.normalize();
        assert_eq!(item.price.to_string(), "5.00");
        assert_eq!(item.original_price.unwrap().to_string(), "7.12");
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "price": "5.00",
        }));
        assert_eq!(item.quantity, 0);
        assert!(item.in_stock);
        assert!(item.original_price.is_none());
        assert!(item.expiry_date.is_none());
        assert!(item.batch_number.is_none());
    }

    #[test]
    fn caller_supplied_pharmacy_id_is_dropped() {
        // The owning pharmacy always comes from the authenticated user.
        let item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "price": 5,
            "pharmacyId": "9f2c1c57-0000-0000-0000-000000000000",
        }));
        assert_eq!(item.medication_id.to_string(), MEDICATION_ID);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "quantity": -1,
            "price": 5,
        }));
        assert!(item.validate().is_err());
    }

    #[test]
    fn expiry_accepts_plain_dates_and_rfc3339() {
        let item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "price": 5,
            "expiryDate": "2027-01-31",
        }));
        assert_eq!(
            item.expiry_date.unwrap().to_rfc3339(),
            "2027-01-31T00:00:00+00:00"
        );

        let item = create_payload(serde_json::json!({
            "medicationId": MEDICATION_ID,
            "price": 5,
            "expiryDate": "2027-01-31T12:30:00Z",
        }));
        assert_eq!(
            item.expiry_date.unwrap().to_rfc3339(),
            "2027-01-31T12:30:00+00:00"
        );
    }

    #[test]
    fn garbage_expiry_is_rejected() {
        let result: Result<CreateInventoryItem, _> =
            serde_json::from_value(serde_json::json!({
                "medicationId": MEDICATION_ID,
                "price": 5,
                "expiryDate": "next week",
            }));
        assert!(result.is_err());
    }

    #[test]
    fn partial_update_leaves_absent_fields_unset() {
        let mut update: UpdateInventoryItem = serde_json::from_value(serde_json::json!({
            "price": "9.5",
        }))
        .unwrap();
        update.normalize();
        assert_eq!(update.price.unwrap().to_string(), "9.50");
        assert!(update.quantity.is_none());
        assert!(update.in_stock.is_none());
        assert!(update.validate().is_ok());
    }
}
