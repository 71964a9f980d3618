use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// naive date-time layouts accepted for stored dates, read as utc
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// a stored "date-like" value as it arrives from the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    /// unix epoch milliseconds
    Millis(i64),
    /// fractional epoch milliseconds, truncated when parsed
    FractionalMillis(f64),
    /// textual date or timestamp
    Text(String),
    /// anything else the store happened to hold; never parses
    Other(serde_json::Value),
}

impl DateLike {
    /// parse into a utc instant, `None` when the value is not a usable date
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            DateLike::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            DateLike::FractionalMillis(ms) if ms.is_finite() => {
                Utc.timestamp_millis_opt(ms.trunc() as i64).single()
            }
            DateLike::FractionalMillis(_) => None,
            DateLike::Text(s) => parse_text(s.trim()),
            DateLike::Other(_) => None,
        }
    }

    /// short rendering for error messages
    pub fn describe(&self) -> String {
        match self {
            DateLike::Millis(ms) => ms.to_string(),
            DateLike::FractionalMillis(ms) => ms.to_string(),
            DateLike::Text(s) => s.clone(),
            DateLike::Other(v) => v.to_string(),
        }
    }
}

impl From<DateTime<Utc>> for DateLike {
    fn from(dt: DateTime<Utc>) -> Self {
        DateLike::Text(dt.to_rfc3339())
    }
}

impl From<NaiveDate> for DateLike {
    fn from(d: NaiveDate) -> Self {
        DateLike::Text(d.format("%Y-%m-%d").to_string())
    }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// whole days elapsed from `start` to `end`, partial days dropped, never negative
pub fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let days = (end - start).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_plain_date() {
        let parsed = DateLike::Text("2024-01-15".to_string()).parse().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = DateLike::Text("2024-01-15T10:00:00+02:00".to_string())
            .parse()
            .unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_datetime() {
        let parsed = DateLike::Text("2024-01-15 06:30:00".to_string()).parse().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 6, 30, 0).unwrap());

        let parsed = DateLike::Text("2024-01-15T06:30:00.250".to_string()).parse().unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_epoch_millis() {
        let parsed = DateLike::Millis(1_704_067_200_000).parse().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_fractional_epoch_millis_truncated() {
        let fractional: DateLike = serde_json::from_str("1704067200000.5").unwrap();
        assert_eq!(fractional, DateLike::FractionalMillis(1_704_067_200_000.5));
        assert_eq!(
            fractional.parse().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );

        assert!(DateLike::FractionalMillis(f64::NAN).parse().is_none());
    }

    #[test]
    fn test_unparseable_values() {
        assert!(DateLike::Text(String::new()).parse().is_none());
        assert!(DateLike::Text("not a date".to_string()).parse().is_none());
        assert!(DateLike::Text("2024-13-45".to_string()).parse().is_none());
        assert!(DateLike::Other(serde_json::json!({"nested": true})).parse().is_none());
    }

    #[test]
    fn test_deserialize_untagged() {
        let millis: DateLike = serde_json::from_str("1704067200000").unwrap();
        assert_eq!(millis, DateLike::Millis(1_704_067_200_000));

        let text: DateLike = serde_json::from_str("\"2024-01-01\"").unwrap();
        assert_eq!(text, DateLike::Text("2024-01-01".to_string()));

        let other: DateLike = serde_json::from_str("true").unwrap();
        assert!(other.parse().is_none());
    }

    #[test]
    fn test_elapsed_days_floors_and_clamps() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(elapsed_days(start, start + Duration::hours(23)), 0);
        assert_eq!(elapsed_days(start, start + Duration::hours(49)), 2);
        assert_eq!(elapsed_days(start, start - Duration::days(5)), 0);
    }
}
