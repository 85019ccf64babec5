//! Normalization of the loosely-typed values found in verifyReceipt
//! responses.
//!
//! Apple renders the same instant in several shapes depending on the field
//! and the age of the receipt:
//!
//!   "2014-05-28 14:47:53 Etc/GMT"
//!   "2014-05-28 07:47:53 America/Los_Angeles"
//!   "1401288473000" (milliseconds since the epoch, `*_ms` fields)
//!   "2014-05-28T14:47:53Z"
//!
//! All of them end up as a `DateTime<Utc>`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::errors::{ReceiptError, Result};

/// Rendering used whenever a timestamp is serialized back out.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOCAL_DATE_TIME_LEN: usize = 19;

/// Parses one of Apple's date representations.
///
/// Absent or empty input yields `Ok(None)`. Anything else that cannot be
/// understood is an error; a receipt with a garbled date is not a receipt we
/// want to hand back half-parsed.
pub(crate) fn parse_date(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };
    parse_date_str(value).map(Some).ok_or_else(|| {
        ReceiptError::parse(field, format!("unrecognized date format '{value}'"))
    })
}

fn parse_date_str(value: &str) -> Option<DateTime<Utc>> {
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return DateTime::from_timestamp_millis(value.parse().ok()?);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if value.len() < LOCAL_DATE_TIME_LEN || !value.is_char_boundary(LOCAL_DATE_TIME_LEN) {
        return None;
    }
    let (local, zone) = value.split_at(LOCAL_DATE_TIME_LEN);
    let naive = NaiveDateTime::parse_from_str(local, LOCAL_DATE_TIME_FORMAT).ok()?;
    let zone = zone.trim();
    if zone.is_empty() {
        return Some(naive.and_utc());
    }
    let tz: Tz = zone.parse().ok()?;
    // During a DST fold the earlier reading wins.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Tri-state flag: `None` when absent or empty, otherwise `true` only for the
/// literal string "true".
pub(crate) fn parse_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s == "true"),
        Value::Bool(b) => Some(*b),
        _ => Some(false),
    }
}

pub(crate) fn format_http_date(date: &DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

/// Serde helper rendering optional timestamps as HTTP dates, or `null`.
pub(crate) fn serialize_http_date<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(date) => serializer.serialize_str(&format_http_date(date)),
        None => serializer.serialize_none(),
    }
}

/// Identifier fields are documented as strings but some receipts carry them
/// as bare JSON numbers.
pub(crate) fn deserialize_loose_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
