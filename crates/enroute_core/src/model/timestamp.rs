//! Timestamp parsing and the on-disk ISO-8601 representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Formats as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn to_iso_millis(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses the date shapes found in stored or user-entered data.
///
/// Accepts RFC 3339, zone-less date-times (read as UTC), bare `YYYY-MM-DD`
/// (UTC midnight) and epoch-millisecond numbers.
pub fn parse_loose_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_text(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|millis| millis as i64))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Loose timestamp with `now` substituted for absent or unparsable input.
///
/// `now` is cut to millisecond precision so a returned record equals its
/// stored form.
pub(crate) fn timestamp_or_now(value: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(parse_loose_timestamp)
        .unwrap_or_else(|| now.trunc_subsecs(3))
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// `serde(with = ...)` adapter storing timestamps as ISO-8601 strings.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_millis(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp_text(text.trim())
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{text}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_loose_timestamp, to_iso_millis};
    use serde_json::json;

    #[test]
    fn accepts_common_shapes() {
        let rfc = parse_loose_timestamp(&json!("2025-09-05T12:00:00.000Z")).unwrap();
        assert_eq!(to_iso_millis(&rfc), "2025-09-05T12:00:00.000Z");

        let date_only = parse_loose_timestamp(&json!("2025-09-05")).unwrap();
        assert_eq!(to_iso_millis(&date_only), "2025-09-05T00:00:00.000Z");

        let local = parse_loose_timestamp(&json!("2025-09-05T08:30")).unwrap();
        assert_eq!(to_iso_millis(&local), "2025-09-05T08:30:00.000Z");

        let millis = parse_loose_timestamp(&json!(1_757_073_600_000_i64)).unwrap();
        assert_eq!(to_iso_millis(&millis), "2025-09-05T12:00:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_loose_timestamp(&json!("next tuesday")).is_none());
        assert!(parse_loose_timestamp(&json!("")).is_none());
        assert!(parse_loose_timestamp(&json!(true)).is_none());
    }
}
