//! Full analytics report for the named trailing timeframes.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::{
    PipelineError,
    forecast::{Prediction, forecast},
    patterns::{PatternFlag, detect_patterns},
    point::{PricePoint, prices},
    range::DateChunk,
    request::Timeframe,
    rollup::{
        DailyAverage,
        HourlyAverage,
        MonthlySummary,
        PriceBand,
        daily_averages,
        distribution,
        hourly_averages,
        monthly_summaries,
        peak_hours,
    },
    seasonal::{SeasonalSummary, summarize_seasons},
    statistics::SeriesStatistics,
    uptime::filter_by_uptime,
};

const N_PEAK_HOURS: usize = 5;

#[derive(Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Daily(Vec<DailyAverage>),
    Monthly(Vec<MonthlySummary>),
}

#[must_use]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub statistics: SeriesStatistics,

    /// Statistics of the cheapest hours when the uptime is below 100%.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_statistics: Option<SeriesStatistics>,

    pub uptime_percentage: f64,
    pub chart_data: ChartData,
    pub hourly_patterns: [Option<f64>; 24],
    pub peak_hours: Vec<HourlyAverage>,
    pub distribution: Vec<PriceBand>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_patterns: Option<Vec<SeasonalSummary>>,

    pub predictions: Vec<Prediction>,
    pub patterns: Vec<PatternFlag>,
    pub raw_hourly_data: Vec<PricePoint>,
    pub last_updated: DateTime<Local>,
}

impl AnalyticsReport {
    /// Run every analyzer over the assembled series.
    pub fn try_build(
        timeframe: Timeframe,
        range: DateChunk,
        points: Vec<PricePoint>,
        uptime_percent: f64,
        now: DateTime<Local>,
    ) -> Result<Self, PipelineError> {
        let all_prices = prices(&points);
        let statistics = SeriesStatistics::try_from_prices(&all_prices)
            .ok_or(PipelineError::EmptyResult { start: range.start, end: range.end })?;
        let uptime_statistics = (uptime_percent < 100.0).then(|| {
            let filtered = filter_by_uptime(&points, uptime_percent);
            SeriesStatistics::try_from_prices(&prices(&filtered)).unwrap_or_default()
        });
        let (chart_data, seasonal_patterns) = if timeframe == Timeframe::Yearly {
            (ChartData::Monthly(monthly_summaries(&points)), Some(summarize_seasons(&points)))
        } else {
            (ChartData::Daily(daily_averages(&points)), None)
        };
        let hourly_patterns = hourly_averages(&points);
        Ok(Self {
            statistics,
            uptime_statistics,
            uptime_percentage: uptime_percent,
            chart_data,
            hourly_patterns,
            peak_hours: peak_hours(&hourly_patterns, N_PEAK_HOURS),
            distribution: distribution(&all_prices),
            seasonal_patterns,
            predictions: forecast(&points),
            patterns: detect_patterns(&all_prices),
            raw_hourly_data: points,
            last_updated: now,
        })
    }
}
