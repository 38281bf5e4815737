use chrono::NaiveDate;
use serde::Serialize;

use crate::api::FetchError;

/// Fatal pipeline failure.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("no historical data available for {start}..={end}")]
    EmptyResult { start: NaiveDate, end: NaiveDate },

    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication_failed",
            Self::Validation(_) => "validation_failed",
            Self::EmptyResult { .. } => "no_data",
            Self::Upstream(_) => "upstream_failed",
        }
    }

    /// Human-readable explanation including a remediation hint where one exists.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Authentication(_) => format!(
                "{self}. Check the API key configuration (`--api-key` or `AESO_API_KEY`) and that the key is subscribed to the pool price and load APIs"
            ),
            Self::Validation(_) => format!(
                "{self}. Dates must be formatted as `YYYY-MM-DD`, the start must not be after the end, and a single upstream call may span at most 366 days"
            ),
            Self::EmptyResult { .. } | Self::Upstream(_) => self.to_string(),
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Authentication { .. } => Self::Authentication(error.to_string()),
            FetchError::Validation { .. } | FetchError::Envelope { .. } => {
                Self::Validation(error.to_string())
            }
            FetchError::Status { .. } | FetchError::Transport(_) => {
                Self::Upstream(error.to_string())
            }
        }
    }
}

/// Structured error body returned instead of a response.
#[must_use]
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub details: String,
}

impl From<&PipelineError> for ErrorBody {
    fn from(error: &PipelineError) -> Self {
        Self { error: error.category(), details: error.details() }
    }
}
