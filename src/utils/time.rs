use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Deserialize an RFC 3339 formatted string into an OffsetDateTime
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
}

/// Serialize an OffsetDateTime into an RFC 3339 formatted string
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

/// Parse a backend timestamp.
///
/// The backend emits Python `isoformat()` strings, which omit the UTC
/// offset; such values are assumed to be UTC. RFC 3339 values are accepted
/// as well.
pub fn parse_backend_timestamp(s: &str) -> Option<OffsetDateTime> {
    if let Ok(datetime) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(datetime);
    }
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let seconds = s.split('.').next().unwrap_or(s);
    PrimitiveDateTime::parse(seconds, &format)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
