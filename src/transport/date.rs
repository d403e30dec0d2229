use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::Error as DeError;

/// ISO 8601 timestamp as returned by the API.
///
/// The API emits RFC 3339 values (`2017-05-02T21:07:41+00:00`), but older
/// records come back without an offset; those are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportDate(DateTime<Utc>);

impl TransportDate {
    pub fn into_utc(self) -> DateTime<Utc> {
        self.0
    }

    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
            return Some(Self(parsed.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
            .map(|naive| Self(naive.and_utc()))
    }
}

impl<'de> Deserialize<'de> for TransportDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid ISO 8601 timestamp: {raw}")))
    }
}

pub fn into_utc(value: Option<TransportDate>) -> Option<DateTime<Utc>> {
    value.map(TransportDate::into_utc)
}
