//! Deserialization helpers for request bodies

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::Error, Deserialize, Deserializer};

/// Optional string with surrounding whitespace removed
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}

/// Parse a timestamp given as RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken
/// as UTC) or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// Optional timestamp accepting the formats of [`parse_timestamp`]
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
    }
}
