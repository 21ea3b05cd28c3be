//! Error taxonomy for the I/O-adjacent edges of the engine
//!
//! Pure components (metrics, explorer) never fail; only fetching and artifact
//! generation can, and every such failure carries enough shape for the
//! notification classifier to pick severity and messaging.

use thiserror::Error;

/// Broad failure category used for user-facing messaging and retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No response at all (DNS, refused connection, timeout)
    Connection,
    /// HTTP 4xx
    Client,
    /// HTTP 5xx
    Server,
    /// Anything else that only carries a message
    Application,
}

/// A failed remote fetch, classified by what came back (or didn't)
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unable to connect to MovieMetrics servers: {0}")]
    Connection(String),

    #[error("The request was invalid: {0}")]
    InvalidInput(String),

    #[error("Access denied (HTTP {status})")]
    Permission { status: u16 },

    #[error("The requested data could not be found: {0}")]
    NotFound(String),

    #[error("Too many requests, the API is rate limiting us")]
    RateLimited,

    #[error("Server error (HTTP {status}), try again later")]
    Server { status: u16 },

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Application(String),
}

impl FetchError {
    /// Classify an HTTP response status into an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => FetchError::InvalidInput(message),
            401 | 403 => FetchError::Permission { status },
            404 => FetchError::NotFound(message),
            429 => FetchError::RateLimited,
            500..=599 => FetchError::Server { status },
            _ => FetchError::Http { status, message },
        }
    }

    /// Classify a transport-level failure (no HTTP response received)
    pub fn from_transport(err: &reqwest::Error) -> Self {
        FetchError::Connection(err.to_string())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchError::Connection(_) => ErrorCategory::Connection,
            FetchError::InvalidInput(_)
            | FetchError::Permission { .. }
            | FetchError::NotFound(_)
            | FetchError::RateLimited => ErrorCategory::Client,
            FetchError::Server { .. } => ErrorCategory::Server,
            FetchError::Http { .. } | FetchError::Application(_) => ErrorCategory::Application,
        }
    }

    /// Whether retrying the same request can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Connection(_) | FetchError::RateLimited | FetchError::Server { .. }
        )
    }
}

/// A failed artifact generation; the export is abandoned, nothing partial is
/// left behind
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No movies match the current filters, nothing to export")]
    NothingToExport,

    #[error("CSV generation failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            FetchError::from_status(400, "bad"),
            FetchError::InvalidInput(_)
        ));
        assert!(matches!(
            FetchError::from_status(401, ""),
            FetchError::Permission { status: 401 }
        ));
        assert!(matches!(
            FetchError::from_status(403, ""),
            FetchError::Permission { status: 403 }
        ));
        assert!(matches!(
            FetchError::from_status(404, "movies"),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            FetchError::from_status(429, ""),
            FetchError::RateLimited
        ));
        assert!(matches!(
            FetchError::from_status(500, ""),
            FetchError::Server { status: 500 }
        ));
        assert!(matches!(
            FetchError::from_status(503, ""),
            FetchError::Server { status: 503 }
        ));
        assert!(matches!(
            FetchError::from_status(302, "moved"),
            FetchError::Http { status: 302, .. }
        ));
    }

    #[test]
    fn test_categories_and_retryability() {
        assert_eq!(
            FetchError::Connection("refused".into()).category(),
            ErrorCategory::Connection
        );
        assert_eq!(FetchError::RateLimited.category(), ErrorCategory::Client);
        assert_eq!(
            FetchError::Server { status: 502 }.category(),
            ErrorCategory::Server
        );
        assert_eq!(
            FetchError::Application("boom".into()).category(),
            ErrorCategory::Application
        );

        assert!(FetchError::Connection("refused".into()).is_retryable());
        assert!(FetchError::RateLimited.is_retryable());
        assert!(FetchError::Server { status: 500 }.is_retryable());
        assert!(!FetchError::InvalidInput("bad".into()).is_retryable());
        assert!(!FetchError::Permission { status: 403 }.is_retryable());
    }
}
