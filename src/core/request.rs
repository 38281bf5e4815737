use chrono::{Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::core::{PipelineError, range::DateChunk};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trailing window of the monthly timeframe.
const MONTHLY_DAYS: i64 = 30;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Timeframe {
    #[serde(rename = "monthly")]
    Monthly,

    #[serde(rename = "yearly")]
    Yearly,

    #[serde(rename = "custom")]
    Custom,

    #[serde(rename = "historical-10year")]
    Historical,
}

/// Incoming request as it arrives from a caller.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub timeframe: Timeframe,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default)]
    pub uptime_percentage: Option<f64>,
}

/// Validated request.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// Trailing window with the full analytics.
    Analytics { timeframe: Timeframe, range: DateChunk, uptime_percent: f64 },

    /// Raw passthrough of an explicit range.
    Custom { range: DateChunk },

    /// Year-by-year summaries.
    Historical { uptime_percent: f64 },
}

impl Request {
    pub const fn new(timeframe: Timeframe) -> Self {
        Self { timeframe, start_date: None, end_date: None, uptime_percentage: None }
    }

    /// Validate the request against the current date.
    pub fn try_into_mode(self, today: NaiveDate) -> Result<Mode, PipelineError> {
        let uptime_percent = parse_uptime(self.uptime_percentage)?;
        match self.timeframe {
            Timeframe::Monthly => Ok(Mode::Analytics {
                timeframe: self.timeframe,
                range: DateChunk::try_new(today - TimeDelta::days(MONTHLY_DAYS), today)?,
                uptime_percent,
            }),
            Timeframe::Yearly => {
                let start = today.checked_sub_months(Months::new(12)).ok_or_else(|| {
                    PipelineError::validation(format!("cannot go back a year from {today}"))
                })?;
                Ok(Mode::Analytics {
                    timeframe: self.timeframe,
                    range: DateChunk::try_new(start, today)?,
                    uptime_percent,
                })
            }
            Timeframe::Custom => {
                let start = parse_date("startDate", self.start_date.as_deref())?;
                let end = parse_date("endDate", self.end_date.as_deref())?;
                Ok(Mode::Custom { range: DateChunk::try_new(start, end)? })
            }
            Timeframe::Historical => Ok(Mode::Historical { uptime_percent }),
        }
    }
}

fn parse_date(name: &str, value: Option<&str>) -> Result<NaiveDate, PipelineError> {
    let value = value.ok_or_else(|| PipelineError::validation(format!("`{name}` is required")))?;
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|error| {
        PipelineError::validation(format!("`{name}` is not a valid date ({value:?}): {error}"))
    })
}

/// Defaults to 100%, which disables the uptime filter.
fn parse_uptime(uptime_percentage: Option<f64>) -> Result<f64, PipelineError> {
    match uptime_percentage {
        None => Ok(100.0),
        Some(uptime) if (0.0..=100.0).contains(&uptime) => Ok(uptime),
        Some(uptime) => Err(PipelineError::validation(format!(
            "`uptimePercentage` must be between 0 and 100, got {uptime}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_deserialize_request() -> crate::prelude::Result {
        // language=JSON
        const REQUEST: &str = r#"
            {
                "timeframe": "historical-10year",
                "uptimePercentage": 95
            }
        "#;
        let request = serde_json::from_str::<Request>(REQUEST)?;
        assert_eq!(request.timeframe, Timeframe::Historical);
        assert_eq!(request.try_into_mode(today())?, Mode::Historical { uptime_percent: 95.0 });
        Ok(())
    }

    #[test]
    fn test_monthly_range() -> Result<(), PipelineError> {
        let Mode::Analytics { range, uptime_percent, .. } =
            Request::new(Timeframe::Monthly).try_into_mode(today())?
        else {
            panic!("analytics mode expected");
        };
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 9, 17).unwrap());
        assert_eq!(range.end, today());
        assert_eq!(uptime_percent, 100.0);
        Ok(())
    }

    #[test]
    fn test_yearly_range() -> Result<(), PipelineError> {
        let Mode::Analytics { range, .. } =
            Request::new(Timeframe::Yearly).try_into_mode(today())?
        else {
            panic!("analytics mode expected");
        };
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 10, 17).unwrap());
        Ok(())
    }

    #[test]
    fn test_custom_requires_dates() {
        let result = Request::new(Timeframe::Custom).try_into_mode(today());
        assert!(matches!(result, Err(PipelineError::Validation(message)) if message.contains("startDate")));
    }

    #[test]
    fn test_custom_rejects_malformed_date() {
        let request = Request {
            start_date: Some("2024/01/01".to_owned()),
            end_date: Some("2024-02-01".to_owned()),
            ..Request::new(Timeframe::Custom)
        };
        assert!(matches!(request.try_into_mode(today()), Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_custom_rejects_reversed_range() {
        let request = Request {
            start_date: Some("2024-03-01".to_owned()),
            end_date: Some("2024-02-01".to_owned()),
            ..Request::new(Timeframe::Custom)
        };
        assert!(matches!(request.try_into_mode(today()), Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_uptime_bounds() -> Result<(), PipelineError> {
        for uptime in [0.0, 100.0] {
            let request = Request {
                uptime_percentage: Some(uptime),
                ..Request::new(Timeframe::Historical)
            };
            assert_eq!(request.try_into_mode(today())?, Mode::Historical { uptime_percent: uptime });
        }
        for uptime in [-0.5, -5.0, 100.5, f64::NAN] {
            let request = Request {
                uptime_percentage: Some(uptime),
                ..Request::new(Timeframe::Historical)
            };
            assert!(matches!(request.try_into_mode(today()), Err(PipelineError::Validation(_))));
        }
        Ok(())
    }
}
