use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("could not reach the daemon: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid daemon url: {0}")]
    UrlParse(#[from] url::ParseError),
    /// The daemon answered with a non-success status; `message` is the
    ///  `error` field of its JSON body when present
    #[error("daemon rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::UrlParse(_) => None,
        }
    }

    /// Storage was unavailable or the daemon could not be reached
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Rejected { status, .. } => *status == StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Transport(e) => e.is_connect() || e.is_timeout(),
            ApiError::UrlParse(_) => false,
        }
    }
}
