//! Equipment model and unique-id allocation helpers

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::input::trimmed;

/// Prefix used when the equipment name has no letters
pub const DEFAULT_PREFIX: &str = "EQ";

/// Largest number of units a single intake may create
pub const MAX_INTAKE_QUANTITY: i32 = 1000;

/// Equipment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "equipment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    Available,
    Supplied,
    Maintenance,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "available",
            EquipmentStatus::Supplied => "supplied",
            EquipmentStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(EquipmentStatus::Available),
            "supplied" => Ok(EquipmentStatus::Supplied),
            "maintenance" => Ok(EquipmentStatus::Maintenance),
            _ => Err(format!("Invalid equipment status: {}", s)),
        }
    }
}

/// One physical, individually tracked item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    /// Human-readable identifier, e.g. `WH-001`
    pub unique_id: String,
    /// Prefix the unique id was allocated under
    pub serial_no: String,
    pub name: String,
    /// Always 1: multi-unit intake creates one record per unit
    pub quantity: i32,
    pub purchased_from: Option<String>,
    pub place: Option<String>,
    pub phone: String,
    pub status: EquipmentStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment intake request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Prefix for the generated unique ids; derived from the name when absent
    #[serde(default, deserialize_with = "trimmed")]
    pub serial_no: Option<String>,
    /// Number of units to create (default 1)
    #[validate(range(min = 1, max = 1000))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "trimmed")]
    pub purchased_from: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
}

/// Validated intake, ready to be persisted under an allocated prefix
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipment {
    pub prefix: String,
    pub name: String,
    pub purchased_from: Option<String>,
    pub place: Option<String>,
    pub phone: String,
    pub created_by: Option<Uuid>,
}

/// Update equipment request. Status has its own endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub serial_no: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub purchased_from: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub phone: Option<String>,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipmentStatus {
    pub status: Option<String>,
}

/// Query parameters for listing equipment
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EquipmentQuery {
    /// Filter by status (available, supplied, maintenance)
    pub status: Option<String>,
}

/// Intake response
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateEquipmentResponse {
    pub message: String,
    pub count: usize,
    pub equipment: Vec<Equipment>,
}

/// Derive a unique-id prefix from an equipment name: the first two letters,
/// uppercased, or [`DEFAULT_PREFIX`] when the name has none.
pub fn derive_prefix(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(2)
        .collect::<String>()
        .to_uppercase();

    if prefix.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Next free sequence number under `prefix`, given the unique ids already in
/// use. Only ids of the exact form `PREFIX-<digits>` count; the comparison is
/// numeric, so `WH-1000` sorts after `WH-999`.
pub fn next_sequence<'a, I>(prefix: &str, existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let pattern = format!(r"^{}-(\d+)$", regex::escape(prefix));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return 1,
    };

    existing
        .into_iter()
        .filter_map(|id| re.captures(id))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

/// Format a unique id: `PREFIX-NNN` (at least three digits)
pub fn format_unique_id(prefix: &str, number: u32) -> String {
    format!("{}-{:03}", prefix, number)
}

/// Allocate `count` contiguous unique ids following the existing ones
pub fn allocate_unique_ids<'a, I>(prefix: &str, existing: I, count: u32) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let start = next_sequence(prefix, existing);
    (0..count)
        .map(|offset| format_unique_id(prefix, start + offset))
        .collect()
}
