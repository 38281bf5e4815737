//! Explainable short-horizon price forecast.
//!
//! Exponentially weighted average of the trailing week, scaled by the hour of day.

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::core::point::PricePoint;

/// Trailing window: one week of hourly points.
pub const HISTORY_LEN: usize = 168;

pub const HORIZON_HOURS: u32 = 24;

/// Weight of the `i`-th most recent point is `exp(-i * DECAY)`.
const DECAY: f64 = 0.1;

const MIN_CONFIDENCE: f64 = 0.6;

/// Confidence lost per hour of the horizon.
const CONFIDENCE_STEP: f64 = 0.03;

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub hour_offset: u32,
    pub timestamp: NaiveDateTime,
    pub predicted_price: f64,
    pub confidence: f64,
}

/// Predict the next [`HORIZON_HOURS`] hours after the last point.
///
/// Returns nothing for an empty history.
pub fn forecast(points: &[PricePoint]) -> Vec<Prediction> {
    let history = &points[points.len().saturating_sub(HISTORY_LEN)..];
    let (Some(last), Some(base_price)) = (history.last(), weighted_average(history)) else {
        return Vec::new();
    };
    (1..=HORIZON_HOURS)
        .map(|hour_offset| {
            let timestamp = last.timestamp + TimeDelta::hours(i64::from(hour_offset));
            Prediction {
                hour_offset,
                timestamp,
                predicted_price: base_price * hour_factor(timestamp.hour()),
                confidence: confidence(hour_offset),
            }
        })
        .collect()
}

/// The most recent point has the weight of 1.
fn weighted_average(history: &[PricePoint]) -> Option<f64> {
    let (weighted_sum, total_weight) = history.iter().rev().zip(0_i32..).fold(
        (0.0, 0.0),
        |(weighted_sum, total_weight), (point, i)| {
            let weight = (-f64::from(i) * DECAY).exp();
            (weighted_sum + point.price * weight, total_weight + weight)
        },
    );
    (total_weight > 0.0).then(|| weighted_sum / total_weight)
}

/// Evening peak is more expensive, the night is cheaper.
#[must_use]
pub const fn hour_factor(hour: u32) -> f64 {
    match hour {
        16..=20 => 1.3,
        23 | 0..=6 => 0.8,
        _ => 1.0,
    }
}

#[must_use]
pub fn confidence(hour_offset: u32) -> f64 {
    CONFIDENCE_STEP.mul_add(-f64::from(hour_offset), 1.0).max(MIN_CONFIDENCE)
}
