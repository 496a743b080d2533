//! Serde adapter for claim dates.
//!
//! The service stores claim days as `YYYY-MM-DD`; some deployments send a
//! full RFC 3339 timestamp instead, which is reduced to its UTC date.
//!
//! `deserialize_lenient` is for values the service has already committed:
//! anything it cannot read becomes `None` instead of failing the payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};
use tracing::warn;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(day) => serializer.serialize_str(&day.format(DAY_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_claim_day(text).map(Some).map_err(de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClaimDay {
    Text(String),
    Other(de::IgnoredAny),
}

pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawClaimDay> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawClaimDay::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawClaimDay::Text(text)) => match parse_claim_day(text.trim()) {
            Ok(day) => Ok(Some(day)),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable claim date");
                Ok(None)
            }
        },
        Some(RawClaimDay::Other(_)) => {
            warn!("ignoring claim date that is not a string");
            Ok(None)
        }
    }
}

fn parse_claim_day(text: &str) -> Result<NaiveDate, String> {
    if let Ok(day) = NaiveDate::parse_from_str(text, DAY_FORMAT) {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("unrecognised claim date: {text}"))
}
