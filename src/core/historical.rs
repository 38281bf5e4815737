//! Year-by-year summaries of the multi-year scan.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::{
    point::{PricePoint, prices},
    statistics::SeriesStatistics,
    uptime::filter_by_uptime,
};

/// Where the year's numbers come from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Real,

    /// The upstream answered, but with no rows.
    NoData,

    /// Every call for the year failed.
    FetchFailed,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub year: i32,
    pub average: f64,
    pub peak: f64,
    pub low: f64,
    pub volatility_percent: f64,
    pub data_point_count: usize,
    pub filtered_data_point_count: usize,
    pub uptime_percentage: f64,
    pub is_real: bool,
    pub data_status: DataStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl YearlySummary {
    /// Summarize the year's series after the uptime filter.
    ///
    /// An empty series gives a [`DataStatus::NoData`] entry.
    pub fn from_points(year: i32, points: &[PricePoint], uptime_percent: f64) -> Self {
        if points.is_empty() {
            return Self::degraded(
                year,
                uptime_percent,
                DataStatus::NoData,
                format!("the upstream returned no data for {year}"),
            );
        }
        let filtered = filter_by_uptime(points, uptime_percent);
        let statistics = SeriesStatistics::try_from_prices(&prices(&filtered)).unwrap_or_default();
        Self {
            year,
            average: statistics.average,
            peak: statistics.peak,
            low: statistics.low,
            volatility_percent: statistics.volatility_percent,
            data_point_count: points.len(),
            filtered_data_point_count: filtered.len(),
            uptime_percentage: uptime_percent,
            is_real: true,
            data_status: DataStatus::Real,
            error: None,
        }
    }

    pub fn degraded(year: i32, uptime_percent: f64, data_status: DataStatus, error: String) -> Self {
        Self {
            year,
            average: 0.0,
            peak: 0.0,
            low: 0.0,
            volatility_percent: 0.0,
            data_point_count: 0,
            filtered_data_point_count: 0,
            uptime_percentage: uptime_percent,
            is_real: false,
            data_status,
            error: Some(error),
        }
    }
}

#[must_use]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalReport {
    pub historical_years: Vec<YearlySummary>,
    pub total_years: usize,
    pub real_data_years: usize,
    pub uptime_percentage: f64,
    pub last_updated: DateTime<Local>,
}

impl HistoricalReport {
    pub fn new(
        historical_years: Vec<YearlySummary>,
        uptime_percent: f64,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            total_years: historical_years.len(),
            real_data_years: historical_years.iter().filter(|summary| summary.is_real).count(),
            historical_years,
            uptime_percentage: uptime_percent,
            last_updated: now,
        }
    }
}
