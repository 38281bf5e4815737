use chrono::NaiveDateTime;
use serde::Serialize;

/// Hourly pool price, optionally enriched with the load.
///
/// The timestamp is the market-local start of the hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,

    /// Dollars per megawatt-hour.
    pub price: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<f64>,
}

impl PricePoint {
    pub const fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price, load: None, generation: None }
    }
}

/// Auxiliary hourly values from the load report.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadRecord {
    pub timestamp: NaiveDateTime,
    pub load: Option<f64>,
    pub generation: Option<f64>,
}

/// Extract the bare prices preserving the order.
pub fn prices(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|point| point.price).collect()
}
