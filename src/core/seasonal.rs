use chrono::Datelike;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::{
    point::PricePoint,
    statistics::{mean, peak},
};

/// Share of the most expensive hours excluded from the trimmed mean.
const TRIMMED_FRACTION: f64 = 0.05;

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalSummary {
    pub season: Season,
    pub average: f64,
    pub peak: f64,

    /// Average price with the top 5% most expensive hours skipped.
    #[serde(rename = "uptime95Price")]
    pub uptime_95_price: f64,
}

/// Summarize each season present in the series, in calendar order starting with winter.
pub fn summarize_seasons(points: &[PricePoint]) -> Vec<SeasonalSummary> {
    let mut buckets = points
        .iter()
        .map(|point| (Season::from_month(point.timestamp.month()), point.price))
        .into_group_map();
    Season::ALL
        .into_iter()
        .filter_map(|season| {
            let prices = buckets.remove(&season)?;
            Some(SeasonalSummary {
                season,
                average: mean(&prices)?,
                peak: peak(&prices)?,
                uptime_95_price: trimmed_mean(&prices, TRIMMED_FRACTION)?,
            })
        })
        .collect()
}

/// Average after dropping `floor(n * top_fraction)` highest values.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn trimmed_mean(values: &[f64], top_fraction: f64) -> Option<f64> {
    let n_dropped = (values.len() as f64 * top_fraction).floor() as usize;
    let kept = values
        .iter()
        .copied()
        .sorted_unstable_by_key(|value| OrderedFloat(-value))
        .skip(n_dropped)
        .collect_vec();
    mean(&kept)
}
