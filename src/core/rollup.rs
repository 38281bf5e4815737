//! Chart rollups.

use std::collections::BTreeMap;

use average::Mean;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::{
    point::PricePoint,
    statistics::{mean, peak},
};

const MONTH_ABBREVIATIONS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Upper bounds of the distribution bands, the last band is open.
const BAND_UPPER_BOUNDS: [f64; 5] = [25.0, 50.0, 100.0, 250.0, 500.0];

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub average: f64,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,

    /// Month abbreviation, for example `Jan`.
    pub month: &'static str,

    pub average: f64,
    pub peak: f64,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub average: f64,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBand {
    /// Inclusive.
    pub min: Option<f64>,

    /// Exclusive.
    pub max: Option<f64>,

    pub count: usize,

    /// Share of all hours, from 0 to 1.
    pub share: f64,
}

pub fn daily_averages(points: &[PricePoint]) -> Vec<DailyAverage> {
    group_prices_by(points, |timestamp| timestamp.date())
        .into_iter()
        .filter_map(|(date, prices)| Some(DailyAverage { date, average: mean(&prices)? }))
        .collect()
}

pub fn monthly_summaries(points: &[PricePoint]) -> Vec<MonthlySummary> {
    group_prices_by(points, |timestamp| (timestamp.year(), timestamp.month0()))
        .into_iter()
        .filter_map(|((year, month0), prices)| {
            Some(MonthlySummary {
                year,
                month: MONTH_ABBREVIATIONS[month0 as usize],
                average: mean(&prices)?,
                peak: peak(&prices)?,
            })
        })
        .collect()
}

/// Average price per hour of day, ignoring the date. Hours without points are [`None`].
pub fn hourly_averages(points: &[PricePoint]) -> [Option<f64>; 24] {
    let mut estimates: [Mean; 24] = std::array::from_fn(|_| Mean::new());
    for (hour, prices) in group_prices_by(points, |timestamp| timestamp.hour()) {
        estimates[hour as usize] = prices.into_iter().collect();
    }
    estimates.map(|estimate| (!estimate.is_empty()).then(|| estimate.mean()))
}

/// Hours of day with the highest average price, most expensive first.
pub fn peak_hours(hourly_averages: &[Option<f64>; 24], limit: usize) -> Vec<HourlyAverage> {
    hourly_averages
        .iter()
        .zip(0..)
        .filter_map(|(average, hour)| average.map(|average| HourlyAverage { hour, average }))
        .sorted_by_key(|hourly| OrderedFloat(-hourly.average))
        .take(limit)
        .collect()
}

/// Count the hours in the fixed price bands.
#[expect(clippy::cast_precision_loss)]
pub fn distribution(prices: &[f64]) -> Vec<PriceBand> {
    let mut counts = [0_usize; BAND_UPPER_BOUNDS.len() + 1];
    for price in prices {
        let band = BAND_UPPER_BOUNDS.iter().take_while(|upper| *price >= **upper).count();
        counts[band] += 1;
    }
    let lower_bounds = [None, Some(25.0), Some(50.0), Some(100.0), Some(250.0), Some(500.0)];
    let upper_bounds = BAND_UPPER_BOUNDS.into_iter().map(Some).chain([None]);
    lower_bounds
        .into_iter()
        .zip(upper_bounds)
        .zip(counts)
        .map(|((min, max), count)| PriceBand {
            min,
            max,
            count,
            share: if prices.is_empty() { 0.0 } else { count as f64 / prices.len() as f64 },
        })
        .collect()
}

fn group_prices_by<K: Ord>(
    points: &[PricePoint],
    key: impl Fn(&NaiveDateTime) -> K,
) -> BTreeMap<K, Vec<f64>> {
    let mut groups = BTreeMap::<K, Vec<f64>>::new();
    for point in points {
        groups.entry(key(&point.timestamp)).or_default().push(point.price);
    }
    groups
}
