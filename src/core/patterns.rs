use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::statistics::Moments;

/// Spikes are prices above `mean + SPIKE_SIGMAS * std_dev`.
const SPIKE_SIGMAS: f64 = 2.0;

const SUSTAINED_HIGH_PERCENTILE: f64 = 0.75;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    PriceSpikes,
    SustainedHigh,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatternFlag {
    #[serde(rename = "type")]
    pub kind: PatternKind,

    pub threshold: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    pub description: String,
}

/// Flag statistical spikes and the sustained-high threshold.
pub fn detect_patterns(prices: &[f64]) -> Vec<PatternFlag> {
    let Some(Moments { mean, std_dev }) = Moments::try_from_values(prices) else {
        return Vec::new();
    };
    let mut flags = Vec::with_capacity(2);

    let spike_threshold = SPIKE_SIGMAS.mul_add(std_dev, mean);
    let n_spikes = prices.iter().filter(|price| **price > spike_threshold).count();
    if n_spikes != 0 {
        flags.push(PatternFlag {
            kind: PatternKind::PriceSpikes,
            threshold: spike_threshold,
            count: Some(n_spikes),
            description: format!(
                "{n_spikes} hour(s) priced above ${spike_threshold:.2}/MWh, two standard deviations over the mean"
            ),
        });
    }

    if let Some(threshold) = percentile(prices, SUSTAINED_HIGH_PERCENTILE) {
        flags.push(PatternFlag {
            kind: PatternKind::SustainedHigh,
            threshold,
            count: None,
            description: format!(
                "a quarter of the hours are priced at or above ${threshold:.2}/MWh"
            ),
        });
    }

    flags
}

/// Nearest-rank percentile: the value at `ceil(fraction * n) - 1` in ascending order.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn percentile(values: &[f64], fraction: f64) -> Option<f64> {
    let sorted = values.iter().copied().map(OrderedFloat).sorted_unstable().collect_vec();
    let rank = (fraction * sorted.len() as f64).ceil() as usize;
    sorted.get(rank.saturating_sub(1)).map(|value| value.0)
}
