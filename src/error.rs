use thiserror::Error;

/// Failure modes of a collection run. None of them are recovered locally.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("no search hits for artist '{artist}'")]
    NotFound { artist: String },

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("page structure not recognised: {0}")]
    Extraction(String),

    #[error("malformed {endpoint} response: {source}")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CollectError {
    /// Network and HTTP failures; the rest are structural.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }

    /// Transport failures, server errors and rate limiting. Client errors
    /// such as 401 or 404 will not change on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn status(code: StatusCode) -> CollectError {
        CollectError::HttpStatus {
            url: "https://genius.com/song-lyrics".to_string(),
            status: code,
        }
    }

    #[test]
    fn test_only_transient_statuses_are_retryable() {
        assert!(status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!status(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!status(StatusCode::NOT_FOUND).is_retryable());
        assert!(status(StatusCode::NOT_FOUND).is_fetch());
        assert!(!CollectError::Extraction("x".to_string()).is_retryable());
    }
}
