//! Best-effort load enrichment of the price series.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    api::{FetchError, LoadSource},
    core::{
        point::{LoadRecord, PricePoint},
        range::DateChunk,
    },
};

pub type LoadLookup = HashMap<NaiveDateTime, LoadRecord>;

/// Why the enrichment did not happen. None of these fail the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentSkipped {
    #[error("enrichment is disabled")]
    Disabled,

    #[error("the window spans {span_days} days, over the {limit_days}-day load limit")]
    WindowTooWide { span_days: i64, limit_days: u32 },

    #[error("failed to fetch the load: {0}")]
    Failed(#[from] FetchError),
}

/// Check that the load source accepts the window in a single call.
pub fn check_window(window: DateChunk, limit_days: u32) -> Result<(), EnrichmentSkipped> {
    let span_days = window.span_days();
    if span_days > i64::from(limit_days) {
        return Err(EnrichmentSkipped::WindowTooWide { span_days, limit_days });
    }
    Ok(())
}

/// Fetch the load and index it by timestamp. Later duplicates win.
pub async fn fetch_lookup(
    source: &dyn LoadSource,
    window: DateChunk,
) -> Result<LoadLookup, EnrichmentSkipped> {
    let records = source.get_load(window).await?;
    Ok(records.into_iter().map(|record| (record.timestamp, record)).collect())
}

/// Left-join the load onto the points by the exact timestamp.
///
/// Returns the number of matched points, the unmatched ones are left untouched.
pub fn merge(points: &mut [PricePoint], lookup: &LoadLookup) -> usize {
    let mut n_matched = 0;
    for point in points {
        if let Some(record) = lookup.get(&point.timestamp) {
            point.load = record.load;
            point.generation = record.generation;
            n_matched += 1;
        }
    }
    n_matched
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;

    struct FailingLoadSource;

    #[async_trait]
    impl LoadSource for FailingLoadSource {
        async fn get_load(&self, _window: DateChunk) -> Result<Vec<LoadRecord>, FetchError> {
            Err(FetchError::Status { status: 404, message: "no data for 2015".to_owned() })
        }
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_merge_left_join() {
        let mut points = vec![
            PricePoint::new(start(), 10.0),
            PricePoint::new(start() + TimeDelta::hours(1), 20.0),
        ];
        let lookup = LoadLookup::from([(
            start() + TimeDelta::hours(1),
            LoadRecord {
                timestamp: start() + TimeDelta::hours(1),
                load: Some(9500.0),
                generation: Some(10200.0),
            },
        )]);
        assert_eq!(merge(&mut points, &lookup), 1);
        assert_eq!(points[0].load, None);
        assert_eq!(points[0].generation, None);
        assert_eq!(points[1].load, Some(9500.0));
        assert_eq!(points[1].generation, Some(10200.0));
        assert_eq!(points[1].price, 20.0);
    }

    #[test]
    fn test_check_window() {
        let day = start().date();
        let window = DateChunk::try_new(day, day + TimeDelta::days(31)).unwrap();
        assert!(check_window(window, 31).is_ok());
        assert!(matches!(
            check_window(window, 30),
            Err(EnrichmentSkipped::WindowTooWide { span_days: 31, limit_days: 30 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_lookup_failure_is_a_skip() {
        let day = start().date();
        let window = DateChunk::try_new(day, day).unwrap();
        let result = fetch_lookup(&FailingLoadSource, window).await;
        assert!(matches!(result, Err(EnrichmentSkipped::Failed(FetchError::Status { .. }))));
    }
}
