//! Request orchestration: planning, paced fetching, enrichment, and the mode-specific reports.

use std::time::Duration;

use bon::Builder;
use chrono::{DateTime, Datelike, Local};

use crate::{
    api::{FetchError, LoadSource, PriceSource},
    core::{
        PipelineError,
        analytics::AnalyticsReport,
        enrich::{EnrichmentSkipped, LoadLookup, check_window, fetch_lookup, merge},
        historical::{DataStatus, HistoricalReport, YearlySummary},
        pacer::Pacer,
        point::PricePoint,
        range::{DateChunk, RangePlanner},
        request::{Mode, Request},
        response::Response,
    },
    prelude::*,
};

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct EngineSettings {
    pub planner: RangePlanner,

    /// Fixed delay between successive upstream calls.
    pub chunk_delay: Duration,

    /// Widest window the load source accepts in one call.
    pub load_max_window_days: u32,

    /// Number of calendar years in the historical scan, including the current one.
    pub historical_years: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            planner: RangePlanner::default(),
            chunk_delay: Duration::from_millis(500),
            load_max_window_days: 31,
            historical_years: 8,
        }
    }
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Engine<'a> {
    prices: &'a dyn PriceSource,

    /// Enrichment is disabled without the load source.
    loads: Option<&'a dyn LoadSource>,

    #[builder(default)]
    settings: EngineSettings,
}

impl<S: engine_builder::IsComplete> EngineBuilder<'_, S> {
    pub async fn run(self, request: Request, now: DateTime<Local>) -> Result<Response, PipelineError> {
        self.build().run(request, now).await
    }
}

/// Concatenated chunks of a range.
struct Series {
    points: Vec<PricePoint>,

    /// First non-fatal chunk failure, if any.
    first_error: Option<FetchError>,
}

impl Engine<'_> {
    #[instrument(skip_all, fields(timeframe = ?request.timeframe))]
    async fn run(self, request: Request, now: DateTime<Local>) -> Result<Response, PipelineError> {
        let mut pacer = Pacer::new(self.settings.chunk_delay);
        let response = match request.try_into_mode(now.date_naive())? {
            Mode::Custom { range } => {
                let points = self.fetch_range(range, &mut pacer).await?;
                Response::Raw(points.into_iter().map(Into::into).collect())
            }
            Mode::Analytics { timeframe, range, uptime_percent } => {
                let points = self.fetch_range(range, &mut pacer).await?;
                let report =
                    AnalyticsReport::try_build(timeframe, range, points, uptime_percent, now)?;
                Response::Analytics(Box::new(report))
            }
            Mode::Historical { uptime_percent } => {
                Response::Historical(self.scan_history(uptime_percent, now, &mut pacer).await?)
            }
        };
        info!(n_calls = pacer.n_calls(), "done");
        Ok(response)
    }

    /// Fetch and enrich the whole range, failing when nothing came back.
    async fn fetch_range(
        &self,
        range: DateChunk,
        pacer: &mut Pacer,
    ) -> Result<Vec<PricePoint>, PipelineError> {
        let series = self.fetch_chunks(range, pacer, true).await?;
        if series.points.is_empty() {
            return Err(series.first_error.map_or(
                PipelineError::EmptyResult { start: range.start, end: range.end },
                PipelineError::from,
            ));
        }
        Ok(series.points)
    }

    /// Fetch the planned chunks one after another.
    ///
    /// Only an authentication failure stops the loop, other failures are logged and skipped.
    #[instrument(skip_all, fields(range = ?range))]
    async fn fetch_chunks(
        &self,
        range: DateChunk,
        pacer: &mut Pacer,
        enrich: bool,
    ) -> Result<Series, PipelineError> {
        let chunks = self.settings.planner.plan(range);
        info!(
            n_chunks = chunks.len(),
            max_window_days = self.settings.planner.max_window_days(),
            "fetching…"
        );

        let mut series = Series { points: Vec::new(), first_error: None };
        for chunk in chunks {
            pacer.wait().await;
            match self.prices.get_pool_prices(chunk).await {
                Ok(points) => {
                    let mut points: Vec<_> = points
                        .into_iter()
                        .filter(|point| chunk.contains(point.timestamp.date()))
                        .collect();
                    if enrich {
                        self.enrich(chunk, &mut points, pacer).await;
                    }
                    info!(?chunk, n_points = points.len(), "fetched");
                    series.points.extend(points);
                }
                Err(error) if error.is_authentication() => return Err(error.into()),
                Err(error) => {
                    warn!(?chunk, "failed to fetch the chunk: {error:#}");
                    series.first_error.get_or_insert(error);
                }
            }
        }
        Ok(series)
    }

    async fn enrich(&self, window: DateChunk, points: &mut [PricePoint], pacer: &mut Pacer) {
        match self.load_lookup(window, pacer).await {
            Ok(lookup) => {
                let n_matched = merge(points, &lookup);
                debug!(?window, n_records = lookup.len(), n_matched, "enriched");
            }
            Err(EnrichmentSkipped::Disabled) => {
                debug!(?window, "enrichment is disabled");
            }
            Err(skipped) => {
                warn!(?window, "skipping the enrichment: {skipped:#}");
            }
        }
    }

    async fn load_lookup(
        &self,
        window: DateChunk,
        pacer: &mut Pacer,
    ) -> Result<LoadLookup, EnrichmentSkipped> {
        let loads = self.loads.ok_or(EnrichmentSkipped::Disabled)?;
        check_window(window, self.settings.load_max_window_days)?;
        pacer.wait().await;
        fetch_lookup(loads, window).await
    }

    /// Summarize each of the last calendar years, tolerating the failed ones.
    #[instrument(skip_all, fields(n_years = self.settings.historical_years))]
    async fn scan_history(
        &self,
        uptime_percent: f64,
        now: DateTime<Local>,
        pacer: &mut Pacer,
    ) -> Result<HistoricalReport, PipelineError> {
        let today = now.date_naive();
        let last_year = today.year();
        let n_years = i32::try_from(self.settings.historical_years.max(1)).unwrap_or(i32::MAX);
        let first_year = last_year.saturating_sub(n_years - 1);

        let mut summaries = Vec::new();
        for year in first_year..=last_year {
            let Some(range) = DateChunk::calendar_year(year, today) else {
                continue;
            };
            let Series { points, first_error } = self.fetch_chunks(range, pacer, false).await?;
            let summary = match first_error {
                Some(error) if points.is_empty() => {
                    warn!(year, "failed to fetch the year: {error:#}");
                    YearlySummary::degraded(
                        year,
                        uptime_percent,
                        DataStatus::FetchFailed,
                        error.to_string(),
                    )
                }
                _ => YearlySummary::from_points(year, &points, uptime_percent),
            };
            info!(year, is_real = summary.is_real, n_points = summary.data_point_count, "summarized");
            summaries.push(summary);
        }

        if !summaries.iter().any(|summary| summary.is_real) {
            return Err(PipelineError::EmptyResult {
                start: DateChunk::calendar_year(first_year, today).map_or(today, |range| range.start),
                end: today,
            });
        }
        Ok(HistoricalReport::new(summaries, uptime_percent, now))
    }
}
