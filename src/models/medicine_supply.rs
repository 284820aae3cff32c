//! Medicine dispensation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::input::trimmed;

/// Medicine dispensation record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSupply {
    pub id: Uuid,
    pub patient_name: String,
    pub medicine: String,
    pub quantity: i32,
    pub phone: String,
    pub address: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create medicine supply request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicineSupply {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub medicine: Option<String>,
    /// Units dispensed (default 1)
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub address: Option<String>,
}

/// Update medicine supply request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicineSupply {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub medicine: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub address: Option<String>,
}
