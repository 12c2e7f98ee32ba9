use thiserror::Error;

/// Fatal conditions a run can end with. Everything else travels as a plain
/// `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration invalid: {0}")]
    Configuration(String),
    #[error("request to {url} failed with status {status}")]
    RequestFailed { url: String, status: u16 },
    #[error("rate limited by the site, try again in {wait}")]
    RateLimited { wait: String },
    #[error("unknown response from the site: {0}")]
    UnknownResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayErrorCode {
    E001Configuration,
    E002RequestFailed,
    E003RateLimited,
    E004UnknownResponse,
}

impl RelayErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001Configuration => "E001_CONFIGURATION",
            Self::E002RequestFailed => "E002_REQUEST_FAILED",
            Self::E003RateLimited => "E003_RATE_LIMITED",
            Self::E004UnknownResponse => "E004_UNKNOWN_RESPONSE",
        }
    }
}

impl RelayError {
    pub fn code(&self) -> RelayErrorCode {
        match self {
            Self::Configuration(_) => RelayErrorCode::E001Configuration,
            Self::RequestFailed { .. } => RelayErrorCode::E002RequestFailed,
            Self::RateLimited { .. } => RelayErrorCode::E003RateLimited,
            Self::UnknownResponse(_) => RelayErrorCode::E004UnknownResponse,
        }
    }
}
