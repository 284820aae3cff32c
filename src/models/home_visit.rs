//! Home visit model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::input::trimmed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "visit_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VisitMode {
    Monthly,
    Emergency,
    #[default]
    New,
}

/// Home visit record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeVisit {
    pub id: Uuid,
    pub patient_name: String,
    pub address: String,
    /// Date of the visit as entered by the health worker
    pub visit_date: String,
    pub visit_mode: VisitMode,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create home visit request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeVisit {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub visit_date: Option<String>,
    pub visit_mode: Option<VisitMode>,
    #[serde(default, deserialize_with = "trimmed")]
    pub notes: Option<String>,
}

/// Update home visit request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeVisit {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub visit_date: Option<String>,
    pub visit_mode: Option<VisitMode>,
    #[serde(default, deserialize_with = "trimmed")]
    pub notes: Option<String>,
}
