use std::fmt::{Debug, Formatter};

use chrono::{Days, NaiveDate};

use crate::core::PipelineError;

/// Inclusive date window.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Debug for DateChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl DateChunk {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::validation(format!(
                "the start date {start} is after the end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar year, with the end clamped to `today`.
    ///
    /// Returns [`None`] for a year which has not started yet.
    #[must_use]
    pub fn calendar_year(year: i32, today: NaiveDate) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?.min(today);
        (start <= end).then_some(Self { start, end })
    }

    /// Number of days between the start and the end.
    #[must_use]
    pub fn span_days(self) -> i64 {
        (self.end - self.start).num_days()
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        (self.start <= date) && (date <= self.end)
    }
}

/// Splits a date range into upstream-compliant windows.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct RangePlanner {
    /// Hard upstream limit of `end - start` for a single call.
    max_window_days: u32,

    /// Days per planned chunk, kept below the hard limit.
    chunk_days: u32,
}

impl Default for RangePlanner {
    /// 366-day upstream window, planned in chunks of about 11 months.
    fn default() -> Self {
        Self::new(366, 334)
    }
}

impl RangePlanner {
    pub fn new(max_window_days: u32, chunk_days: u32) -> Self {
        Self { max_window_days, chunk_days: chunk_days.clamp(1, max_window_days.saturating_add(1)) }
    }

    #[must_use]
    pub const fn max_window_days(self) -> u32 {
        self.max_window_days
    }

    /// Walk the range forward producing contiguous chunks which cover it without gaps.
    ///
    /// A range which fits into the upstream window is not split.
    pub fn plan(self, range: DateChunk) -> Vec<DateChunk> {
        if range.span_days() <= i64::from(self.max_window_days) {
            return vec![range];
        }
        let step = Days::new(u64::from(self.chunk_days - 1));
        let mut chunks = Vec::new();
        let mut start = range.start;
        loop {
            let end = start.checked_add_days(step).map_or(range.end, |end| end.min(range.end));
            chunks.push(DateChunk { start, end });
            match end.succ_opt() {
                Some(next) if end < range.end => start = next,
                _ => break,
            }
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_try_new_rejects_reversed_range() {
        let result = DateChunk::try_new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_plan_single_day() -> Result<(), PipelineError> {
        let range = DateChunk::try_new(date(2024, 5, 5), date(2024, 5, 5))?;
        assert_eq!(RangePlanner::default().plan(range), [range]);
        Ok(())
    }

    #[test]
    fn test_plan_leap_year_fits() -> Result<(), PipelineError> {
        let range = DateChunk::try_new(date(2024, 1, 1), date(2024, 12, 31))?;
        assert_eq!(RangePlanner::default().plan(range), [range]);
        Ok(())
    }

    #[test]
    fn test_plan_multi_year() -> Result<(), PipelineError> {
        let range = DateChunk::try_new(date(2020, 1, 1), date(2022, 12, 31))?;
        let chunks = RangePlanner::default().plan(range);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], DateChunk::try_new(date(2020, 1, 1), date(2020, 11, 29))?);
        assert_eq!(chunks[1].start, date(2020, 11, 30));
        assert_eq!(chunks[3].end, date(2022, 12, 31));
        Ok(())
    }

    /// Chunks are contiguous, cover the range exactly, and never exceed the window.
    #[test]
    fn test_plan_coverage() -> Result<(), PipelineError> {
        let starts = [date(2019, 12, 31), date(2020, 2, 29), date(2023, 6, 15)];
        let lengths = [0, 1, 29, 333, 334, 335, 365, 366, 367, 731, 2000];
        let planners = [
            RangePlanner::default(),
            RangePlanner::new(366, 366),
            RangePlanner::new(30, 7),
            RangePlanner::new(1, 1),
            RangePlanner::new(0, 0),
        ];
        for (start, length, planner) in itertools::iproduct!(starts, lengths, planners) {
            let range =
                DateChunk::try_new(start, start.checked_add_days(Days::new(length)).unwrap())?;
            let chunks = planner.plan(range);
            assert_eq!(chunks.first().unwrap().start, range.start);
            assert_eq!(chunks.last().unwrap().end, range.end);
            for chunk in &chunks {
                assert!(chunk.start <= chunk.end);
                assert!(chunk.span_days() <= i64::from(planner.max_window_days()));
            }
            for (left, right) in chunks.iter().tuple_windows() {
                assert_eq!(left.end.succ_opt().unwrap(), right.start);
            }
        }
        Ok(())
    }

    #[test]
    fn test_calendar_year() {
        let today = date(2026, 10, 17);
        assert_eq!(
            DateChunk::calendar_year(2024, today),
            Some(DateChunk { start: date(2024, 1, 1), end: date(2024, 12, 31) })
        );
        assert_eq!(
            DateChunk::calendar_year(2026, today),
            Some(DateChunk { start: date(2026, 1, 1), end: today })
        );
        assert_eq!(DateChunk::calendar_year(2027, today), None);
    }
}
