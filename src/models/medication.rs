use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

pub const OTC_ONLY_MESSAGE: &str =
    "Only over-the-counter (OTC) medications are allowed. Prescription medications cannot be added.";

/// Catalog entry, shared across all pharmacies. Immutable once created:
/// there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub strength: String,
    pub manufacturer: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub form_factor: Option<String>,
    pub requires_prescription: bool,
    #[serde(rename = "isOTC")]
    pub is_otc: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedication {
    pub name: String,
    pub strength: String,
    pub manufacturer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub form_factor: Option<String>,
    #[serde(default)]
    pub requires_prescription: bool,
    // Must be an explicit `true`; the catalog admits OTC medications only.
    #[serde(rename = "isOTC", default)]
    pub is_otc: Option<bool>,
}

impl CreateMedication {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_otc != Some(true) {
            return Err(ApiError::Validation(OTC_ONLY_MESSAGE.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: serde_json::Value) -> CreateMedication {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn otc_medication_is_accepted() {
        let med = payload(serde_json::json!({
            "name": "Paracetamol",
            "strength": "500mg",
            "manufacturer": "Emzor Pharmaceuticals",
            "isOTC": true,
        }));
        assert!(med.validate().is_ok());
        assert!(!med.requires_prescription);
    }

    #[test]
    fn non_otc_medication_is_rejected() {
        let med = payload(serde_json::json!({
            "name": "Amoxicillin",
            "strength": "250mg",
            "manufacturer": "GSK Nigeria",
            "isOTC": false,
        }));
        let err = med.validate().unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, OTC_ONLY_MESSAGE),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absent_otc_flag_is_rejected() {
        let med = payload(serde_json::json!({
            "name": "Ibuprofen",
            "strength": "400mg",
            "manufacturer": "May & Baker",
        }));
        assert!(med.validate().is_err());
    }

    #[test]
    fn prescription_flag_does_not_override_the_otc_rule() {
        // requiresPrescription is independent of admission: isOTC decides.
        let med = payload(serde_json::json!({
            "name": "Metformin",
            "strength": "500mg",
            "manufacturer": "Diabetes Solutions",
            "requiresPrescription": true,
            "isOTC": true,
        }));
        assert!(med.validate().is_ok());

        let med = payload(serde_json::json!({
            "name": "Vitamin C",
            "strength": "1000mg",
            "manufacturer": "HealthGuard",
            "requiresPrescription": false,
            "isOTC": false,
        }));
        assert!(med.validate().is_err());
    }
}
