use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::core::point::PricePoint;

/// Keep the cheapest hours a load with the given uptime would operate in.
///
/// The result holds `floor(len * uptime / 100)` points sorted by ascending price.
/// At 100% the points are returned unchanged, in chronological order.
pub fn filter_by_uptime(points: &[PricePoint], uptime_percent: f64) -> Vec<PricePoint> {
    if uptime_percent >= 100.0 {
        return points.to_vec();
    }
    points
        .iter()
        .copied()
        .sorted_by_key(|point| OrderedFloat(point.price))
        .take(n_operating_hours(points.len(), uptime_percent))
        .collect()
}

#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn n_operating_hours(n_hours: usize, uptime_percent: f64) -> usize {
    (n_hours as f64 * uptime_percent.clamp(0.0, 100.0) / 100.0).floor() as usize
}
