//! Response envelope shared by the price and load reports.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, de};

use crate::api::FetchError;

/// Market-local timestamp format, for example `2024-01-01 00:00`.
const MARKET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Generic response.
///
/// The actual rows are nested in the `return` object under a report-specific key.
#[derive(Deserialize)]
pub struct Response<R> {
    #[serde(rename = "return")]
    body: Option<R>,
}

impl<R> From<Response<R>> for Result<R, FetchError> {
    fn from(response: Response<R>) -> Self {
        response.body.ok_or_else(|| FetchError::envelope("the `return` key is absent"))
    }
}

/// Unwrap an optional report, failing if the report key is absent.
pub fn require_report<T>(report: Option<Vec<T>>, key: &str) -> Result<Vec<T>, FetchError> {
    report.ok_or_else(|| FetchError::envelope(format!("the `{key}` report is absent")))
}

pub fn deserialize_market_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let timestamp = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&timestamp, MARKET_TIME_FORMAT).map_err(|_| {
        de::Error::invalid_value(de::Unexpected::Str(&timestamp), &"`YYYY-MM-DD HH:MM`")
    })
}
