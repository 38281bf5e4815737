use reqwest::StatusCode;

/// Classified failure of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("upstream rejected the API key (HTTP {status})")]
    Authentication { status: u16 },

    #[error("upstream rejected the request (HTTP 400): {message}")]
    Validation { message: String },

    /// The response does not have the expected shape.
    #[error("unexpected response envelope: {message}")]
    Envelope { message: String },

    #[error("upstream responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Authentication { status: status.as_u16() }
            }
            StatusCode::BAD_REQUEST => Self::Validation { message },
            _ => Self::Status { status: status.as_u16(), message },
        }
    }

    pub fn envelope(message: impl Into<String>) -> Self {
        Self::Envelope { message: message.into() }
    }

    /// Rate limiting, server-side failures and transport errors may succeed on a later attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Authentication { .. } | Self::Validation { .. } | Self::Envelope { .. } => false,
        }
    }

    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
