//! Timestamp wire format helpers. `::serde` is the external crate; this module shadows it.

use ::serde::{Deserialize, Deserializer, Serializer, de::Error as _};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Accept an RFC 3339 timestamp, or a local `YYYY-MM-DDTHH:MM[:SS]` as sent by
/// `datetime-local` inputs. Offset-less values are taken as UTC.
pub fn from_rfc3339_lenient<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    parse_lenient(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
}

/// [`from_rfc3339_lenient`] for optional fields; `null` reads as `None`.
/// Pair with `#[serde(default)]` so a missing field does too.
pub fn from_rfc3339_lenient_opt<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => parse_lenient(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
