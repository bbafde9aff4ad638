//! Serde adapters for loosely-typed backend records.
//!
//! Backend records are schemaless JSON: flags may be `null`, lists may be
//! missing, and timestamps may or may not carry an offset.

/// `bool` fields where `null` means `false`.
pub mod flag {
    use serde::{Deserialize, Deserializer};

    /// Deserialize a boolean, treating `null` as `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a boolean nor `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
    }
}

/// `Vec` fields where `null` means empty.
pub mod list {
    use serde::{Deserialize, Deserializer};

    /// Deserialize a list, treating `null` as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither an array nor `null`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Creation timestamps.
///
/// The backend writes naive ISO-8601 timestamps in UTC
/// (`2025-10-28T14:03:11.512000`); RFC 3339 with an offset is accepted too.
/// Unparseable values decode as `None`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from RFC 3339 or a naive UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error only if the value is not a string or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// Parse a backend timestamp.
    #[must_use]
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Datelike, Timelike, Utc};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "super::flag::deserialize")]
        sold: bool,
        #[serde(default, deserialize_with = "super::list::deserialize")]
        tags: Vec<String>,
        #[serde(default, with = "super::timestamp")]
        created_date: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_nulls_become_defaults() {
        let r: Record = serde_json::from_str(r#"{"sold": null, "tags": null}"#).unwrap();
        assert!(!r.sold);
        assert!(r.tags.is_empty());
        assert!(r.created_date.is_none());
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let ts = super::timestamp::parse("2025-10-28T14:03:11.512000").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 10, 28));
        assert_eq!((ts.hour(), ts.minute()), (14, 3));
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        let ts = super::timestamp::parse("2025-10-28T16:03:11+02:00").unwrap();
        assert_eq!(ts.hour(), 14);
    }

    #[test]
    fn test_garbage_timestamp_is_none() {
        let r: Record = serde_json::from_str(r#"{"created_date": "yesterday"}"#).unwrap();
        assert!(r.created_date.is_none());
    }
}
