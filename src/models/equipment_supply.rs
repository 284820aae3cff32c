//! Equipment supply (loan) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::input::{lenient_timestamp, trimmed};

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "supply_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SupplyStatus {
    /// Equipment is currently with the recipient
    #[default]
    Active,
    Returned,
    Lost,
}

/// One lending of one equipment item to one recipient.
///
/// `equipment_unique_id` and `equipment_name` are copied from the equipment
/// when the loan is created and are not kept in sync with later edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSupply {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_unique_id: String,
    pub equipment_name: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_address: Option<String>,
    pub supply_date: DateTime<Utc>,
    /// Expected return date
    pub return_date: Option<String>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub status: SupplyStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create loan request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentSupply {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub equipment_id: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub patient_phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub patient_address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub return_date: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub notes: Option<String>,
}

/// Recipient details of a validated loan request
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipmentSupply {
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_address: Option<String>,
    pub return_date: Option<String>,
    pub notes: Option<String>,
}

/// Update loan request. Equipment reference, snapshots and supply date are
/// fixed at creation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentSupply {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub patient_phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub patient_address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub return_date: Option<String>,
    /// Overwritten with the current time when the update returns an active loan
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub actual_return_date: Option<DateTime<Utc>>,
    pub status: Option<SupplyStatus>,
    #[serde(default, deserialize_with = "trimmed")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_recipient() {
        let request: CreateEquipmentSupply =
            serde_json::from_str(r#"{"equipmentId": "x", "patientName": " ", "patientPhone": "555"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("patient_name"));
        assert!(!fields.contains_key("patient_phone"));
    }

    #[test]
    fn test_update_status_and_rules() {
        let update: UpdateEquipmentSupply =
            serde_json::from_str(r#"{"status": "lost", "notes": " gone "}"#).unwrap();
        assert_eq!(update.status, Some(SupplyStatus::Lost));
        assert_eq!(update.notes.as_deref(), Some("gone"));
        assert!(update.validate().is_ok());

        let update = UpdateEquipmentSupply {
            patient_phone: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
