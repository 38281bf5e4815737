use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::{analytics::AnalyticsReport, historical::HistoricalReport, point::PricePoint};

/// Mode-specific response.
#[must_use]
#[derive(Serialize)]
#[serde(untagged)]
pub enum Response {
    Raw(Vec<RawRow>),
    Analytics(Box<AnalyticsReport>),
    Historical(HistoricalReport),
}

/// Raw passthrough row, the enrichment fields are `null` when missing.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RawRow {
    pub ts: NaiveDateTime,
    pub price: f64,
    pub generation: Option<f64>,

    /// Alberta internal load.
    pub ail: Option<f64>,
}

impl From<PricePoint> for RawRow {
    fn from(point: PricePoint) -> Self {
        Self { ts: point.timestamp, price: point.price, generation: point.generation, ail: point.load }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_serialize_raw() -> crate::prelude::Result {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(13, 0, 0).unwrap();
        let point = PricePoint { load: Some(10_500.0), ..PricePoint::new(timestamp, 42.5) };
        let value = serde_json::to_value(Response::Raw(vec![point.into()]))?;
        assert_eq!(
            value,
            serde_json::json!([{
                "ts": "2024-01-01T13:00:00",
                "price": 42.5,
                "generation": null,
                "ail": 10_500.0
            }])
        );
        Ok(())
    }
}
