//! Small helpers shared across modules

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00Z`, `...+00:00`) and naive
/// timestamps written by older state files, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole days between two instants, never negative
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days().max(0)
}

/// Deserialize `null` as the type's default value
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a recomputable value; anything unreadable becomes the default
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }

    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Discarding unreadable stored value: {}", e);
        T::default()
    }))
}

/// Deserialize a list, skipping members that cannot be read
pub fn readable_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Expected a list, found {}; starting empty", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping unreadable list entry: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Cached {
        #[serde(deserialize_with = "or_default")]
        score: Option<u32>,
        #[serde(deserialize_with = "readable_items")]
        names: Vec<String>,
    }

    #[test]
    fn test_parse_rfc3339_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let parsed = parse_timestamp("2024-03-01T12:30:00.123456").unwrap();
        assert_eq!(parsed.timestamp(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap().timestamp());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_days_between_clamps() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 4, 1, 0, 0).unwrap();
        assert_eq!(days_between(a, b), 3);
        assert_eq!(days_between(b, a), 0);
    }

    #[test]
    fn test_or_default_replaces_unreadable_values() {
        let cached: Cached = serde_json::from_value(json!({ "score": "high" })).unwrap();
        assert_eq!(cached.score, None);

        let cached: Cached = serde_json::from_value(json!({ "score": 7 })).unwrap();
        assert_eq!(cached.score, Some(7));
    }

    #[test]
    fn test_readable_items_skips_bad_entries() {
        let cached: Cached = serde_json::from_value(json!({ "names": ["a", 3, null, "b"] })).unwrap();
        assert_eq!(cached.names, vec!["a".to_string(), "b".to_string()]);

        let cached: Cached = serde_json::from_value(json!({ "names": "oops" })).unwrap();
        assert!(cached.names.is_empty());
    }
}
