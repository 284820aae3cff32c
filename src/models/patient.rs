//! Patient model and register-id allocation helpers

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::input::{lenient_timestamp, trimmed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "patient_gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Patient record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    /// Sequential register number within the calendar year, `NN/YY`
    pub register_id: Option<String>,
    pub name: String,
    pub relation: Option<String>,
    pub gender: Gender,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub place: Option<String>,
    pub village: String,
    pub disease: Option<String>,
    pub plan: Option<String>,
    pub is_dead: bool,
    pub date_of_death: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create patient request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub relation: Option<String>,
    #[validate(required)]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "trimmed")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub phone: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "trimmed")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub village: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub disease: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan: Option<String>,
    pub is_dead: Option<bool>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_of_death: Option<DateTime<Utc>>,
}

/// Update patient request. The register id is not editable.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub relation: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "trimmed")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub phone: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "trimmed")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub village: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub disease: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan: Option<String>,
    pub is_dead: Option<bool>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_of_death: Option<DateTime<Utc>>,
}

/// Two-digit year suffix used in register ids
pub fn register_year(at: DateTime<Utc>) -> String {
    format!("{:02}", at.year().rem_euclid(100))
}

/// Numeric part of a register id belonging to `year`, if any
fn register_number(register_id: &str, year: &str) -> Option<u32> {
    let (number, suffix) = register_id.split_once('/')?;
    if suffix != year || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Next register id for `year`, given the register ids already in use.
/// Numbers are compared as integers, so `10/24` follows `09/24`.
pub fn next_register_id<'a, I>(year: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = existing
        .into_iter()
        .filter_map(|id| register_number(id, year))
        .max()
        .map_or(1, |max| max + 1);
    format!("{:02}/{}", next, year)
}
