use average::{Max, Mean, Min, Variance};
use serde::Serialize;

/// Relative change between the first and the last quartile means to call it a trend.
const TREND_THRESHOLD: f64 = 0.05;

#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

/// Summary statistics of a price series.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    pub average: f64,
    pub peak: f64,
    pub low: f64,

    /// Population standard deviation relative to the average, in percent.
    pub volatility_percent: f64,

    pub trend: Trend,
}

impl SeriesStatistics {
    /// Calculate the statistics, or [`None`] if the series is empty.
    pub fn try_from_prices(prices: &[f64]) -> Option<Self> {
        let Moments { mean, std_dev } = Moments::try_from_values(prices)?;
        let peak = prices.iter().copied().collect::<Max>().max();
        let low = prices.iter().copied().collect::<Min>().min();
        let volatility_percent = if mean == 0.0 { 0.0 } else { 100.0 * std_dev / mean };
        Some(Self { average: mean, peak, low, volatility_percent, trend: Trend::of(prices) })
    }
}

impl Trend {
    /// Compare the mean of the last quartile to the mean of the first quartile.
    pub fn of(prices: &[f64]) -> Self {
        let quartile_len = (prices.len() / 4).max(1);
        let (Some(first), Some(last)) = (
            mean(&prices[..quartile_len.min(prices.len())]),
            mean(&prices[prices.len().saturating_sub(quartile_len)..]),
        ) else {
            return Self::Stable;
        };
        let change = if first == 0.0 { last.signum() } else { (last - first) / first.abs() };
        if change > TREND_THRESHOLD {
            Self::Up
        } else if change < -TREND_THRESHOLD {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

/// Mean and population standard deviation.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std_dev: f64,
}

impl Moments {
    pub fn try_from_values(values: &[f64]) -> Option<Self> {
        let estimate: Variance = values.iter().copied().collect();
        if estimate.is_empty() {
            return None;
        }
        Some(Self { mean: estimate.mean(), std_dev: estimate.population_variance().sqrt() })
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    let estimate: Mean = values.iter().copied().collect();
    if estimate.is_empty() { None } else { Some(estimate.mean()) }
}

/// Highest value, [`None`] for an empty slice.
#[must_use]
pub fn peak(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().copied().collect::<Max>().max())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(SeriesStatistics::try_from_prices(&[]), None);
    }

    #[test]
    fn test_statistics() {
        let statistics =
            SeriesStatistics::try_from_prices(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_abs_diff_eq!(statistics.average, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(statistics.peak, 9.0);
        assert_abs_diff_eq!(statistics.low, 2.0);

        // Population standard deviation is exactly 2:
        assert_abs_diff_eq!(statistics.volatility_percent, 40.0, epsilon = 1e-9);
        assert_eq!(statistics.trend, Trend::Up);
    }

    #[test]
    fn test_moments_use_population_deviation() {
        let moments = Moments::try_from_values(&[1.0, 3.0]).unwrap();
        assert_abs_diff_eq!(moments.mean, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(moments.std_dev, 1.0, epsilon = 1e-9);
        assert_eq!(Moments::try_from_values(&[]), None);
        assert_eq!(peak(&[]), None);
        assert_eq!(peak(&[3.0, -1.0, 7.5]), Some(7.5));
    }

    #[test]
    fn test_volatility_of_constant_series() {
        let statistics = SeriesStatistics::try_from_prices(&[42.0; 10]).unwrap();
        assert_abs_diff_eq!(statistics.volatility_percent, 0.0);
        assert_eq!(statistics.trend, Trend::Stable);
    }

    #[test]
    fn test_volatility_of_zero_mean() {
        let statistics = SeriesStatistics::try_from_prices(&[-1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(statistics.volatility_percent, 0.0);
    }

    #[test]
    fn test_trend() {
        let prices = [100.0, 100.0, 100.0, 100.0, 104.0, 104.0, 104.0, 104.0];
        assert_eq!(Trend::of(&prices), Trend::Stable);
        assert_eq!(Trend::of(&[100.0, 100.0, 50.0, 50.0, 110.0, 110.0]), Trend::Up);
        assert_eq!(Trend::of(&[100.0, 100.0, 100.0, 94.0]), Trend::Down);
        assert_eq!(Trend::of(&[10.0]), Trend::Stable);
        assert_eq!(Trend::of(&[]), Trend::Stable);
    }
}
