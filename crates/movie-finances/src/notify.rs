//! Transient user notifications and fetch-failure classification
//!
//! The `Notifier` is an explicit service object constructed once per session
//! (not ambient global state): callers enqueue messages, timers expire them,
//! users dismiss them. Expiry and dismissal race benignly because removal is
//! idempotent.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::constants;
use crate::error::FetchError;

/// Message severity, mirrored by console styling at the CLI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Default display duration; errors stay longer since they are
    /// higher-value to read
    pub fn default_duration(self) -> Duration {
        let ms = match self {
            Severity::Success => constants::TOAST_SUCCESS_MS,
            Severity::Info | Severity::Warning => constants::TOAST_DEFAULT_MS,
            Severity::Error => constants::TOAST_ERROR_MS,
        };
        Duration::from_millis(ms)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// One transient message. `duration: None` means sticky (dismissal only).
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub title: Option<String>,
    pub text: String,
    pub severity: Severity,
    pub duration: Option<Duration>,
    pub created: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    active: Vec<Notification>,
}

/// Notification service: enqueue, auto-expire, dismiss
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<Mutex<Inner>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message and arm its expiry timer. Returns the message id.
    pub fn push(
        &self,
        severity: Severity,
        title: Option<String>,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> u64 {
        let id = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.active.push(Notification {
                id,
                title,
                text: text.into(),
                severity,
                duration,
                created: Utc::now(),
            });
            id
        };

        // Arm the auto-expiry timer when a duration is set and a runtime is
        // available. Expiry after an explicit dismissal is a no-op.
        if let Some(duration) = duration {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    inner.lock().unwrap().active.retain(|n| n.id != id);
                });
            }
        }

        id
    }

    pub fn success(&self, text: impl Into<String>) -> u64 {
        let severity = Severity::Success;
        self.push(
            severity,
            Some("Success".to_string()),
            text,
            Some(severity.default_duration()),
        )
    }

    pub fn info(&self, text: impl Into<String>) -> u64 {
        let severity = Severity::Info;
        self.push(severity, None, text, Some(severity.default_duration()))
    }

    pub fn warning(&self, text: impl Into<String>) -> u64 {
        let severity = Severity::Warning;
        self.push(
            severity,
            Some("Warning".to_string()),
            text,
            Some(severity.default_duration()),
        )
    }

    pub fn error(&self, text: impl Into<String>) -> u64 {
        let severity = Severity::Error;
        self.push(
            severity,
            Some("Error".to_string()),
            text,
            Some(severity.default_duration()),
        )
    }

    /// Remove a message by id. Idempotent: a no-op if the id is already gone.
    pub fn dismiss(&self, id: u64) {
        self.inner.lock().unwrap().active.retain(|n| n.id != id);
    }

    /// Snapshot of currently displayed messages in insertion order
    pub fn active(&self) -> Vec<Notification> {
        self.inner.lock().unwrap().active.clone()
    }

    /// Classify a fetch failure and enqueue the resulting message
    pub fn report_fetch_error(&self, err: &FetchError, context: &str) -> u64 {
        let classified = classify(err);
        let text = if context.is_empty() {
            classified.message
        } else {
            format!("{}: {}", context, classified.message)
        };
        self.push(
            classified.severity,
            Some(classified.title.to_string()),
            text,
            Some(classified.duration),
        )
    }
}

/// How a fetch failure should be presented to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub severity: Severity,
    pub title: &'static str,
    pub message: String,
    pub duration: Duration,
    pub retryable: bool,
}

/// Pure mapping from error shape to user-facing messaging.
/// Rate limiting is deliberately a warning, not an error, and suggests retry.
pub fn classify(err: &FetchError) -> ClassifiedError {
    let error_duration = Duration::from_millis(constants::TOAST_ERROR_MS);

    match err {
        FetchError::Connection(_) => ClassifiedError {
            severity: Severity::Error,
            title: "Connection Error",
            message: "Unable to connect to MovieMetrics servers. Please check your internet connection.".to_string(),
            duration: error_duration,
            retryable: true,
        },
        FetchError::InvalidInput(detail) => ClassifiedError {
            severity: Severity::Error,
            title: "Invalid Request",
            message: if detail.is_empty() {
                "The request was invalid. Please check your input.".to_string()
            } else {
                detail.clone()
            },
            duration: error_duration,
            retryable: false,
        },
        FetchError::Permission { status: 401 } => ClassifiedError {
            severity: Severity::Error,
            title: "Authentication Required",
            message: "Please log in to access this feature.".to_string(),
            duration: error_duration,
            retryable: false,
        },
        FetchError::Permission { .. } => ClassifiedError {
            severity: Severity::Error,
            title: "Access Denied",
            message: "You don't have permission to access this resource.".to_string(),
            duration: error_duration,
            retryable: false,
        },
        FetchError::NotFound(_) => ClassifiedError {
            severity: Severity::Error,
            title: "Not Found",
            message: "The requested data could not be found.".to_string(),
            duration: error_duration,
            retryable: false,
        },
        FetchError::RateLimited => ClassifiedError {
            severity: Severity::Warning,
            title: "Rate Limited",
            message: "Too many requests. Please wait a moment and try again.".to_string(),
            duration: error_duration,
            retryable: true,
        },
        FetchError::Server { status: 503 } => ClassifiedError {
            severity: Severity::Error,
            title: "Service Unavailable",
            message: "The service is temporarily unavailable. Please try again later.".to_string(),
            duration: error_duration,
            retryable: true,
        },
        FetchError::Server { .. } => ClassifiedError {
            severity: Severity::Error,
            title: "Server Error",
            message: "Our servers are experiencing issues. Please try again later.".to_string(),
            duration: error_duration,
            retryable: true,
        },
        FetchError::Http { status, message } => ClassifiedError {
            severity: Severity::Error,
            title: "Network Error",
            message: if message.is_empty() {
                format!("Request failed with status {}", status)
            } else {
                message.clone()
            },
            duration: error_duration,
            retryable: false,
        },
        FetchError::Application(message) => ClassifiedError {
            severity: Severity::Error,
            title: "Application Error",
            message: message.clone(),
            duration: error_duration,
            retryable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_per_status() {
        let rate_limited = classify(&FetchError::from_status(429, ""));
        assert_eq!(rate_limited.severity, Severity::Warning);
        assert!(rate_limited.retryable);
        assert_eq!(rate_limited.duration, Duration::from_millis(6000));

        let server = classify(&FetchError::from_status(500, ""));
        assert_eq!(server.severity, Severity::Error);
        assert_eq!(server.title, "Server Error");
        assert!(server.retryable);
        assert_eq!(server.duration, Duration::from_millis(6000));

        let unavailable = classify(&FetchError::from_status(503, ""));
        assert_eq!(unavailable.title, "Service Unavailable");

        let auth = classify(&FetchError::from_status(401, ""));
        assert_eq!(auth.title, "Authentication Required");
        assert!(!auth.retryable);

        let denied = classify(&FetchError::from_status(403, ""));
        assert_eq!(denied.title, "Access Denied");

        let missing = classify(&FetchError::from_status(404, "movies"));
        assert_eq!(missing.title, "Not Found");

        let transport = classify(&FetchError::Connection("refused".into()));
        assert_eq!(transport.title, "Connection Error");
        assert!(transport.retryable);

        let app = classify(&FetchError::Application("boom".into()));
        assert_eq!(app.title, "Application Error");
        assert_eq!(app.message, "boom");
    }

    #[test]
    fn test_severity_default_durations() {
        assert_eq!(
            Severity::Success.default_duration(),
            Duration::from_millis(3000)
        );
        assert_eq!(
            Severity::Info.default_duration(),
            Duration::from_millis(4000)
        );
        assert_eq!(
            Severity::Warning.default_duration(),
            Duration::from_millis(4000)
        );
        assert_eq!(
            Severity::Error.default_duration(),
            Duration::from_millis(6000)
        );
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let notifier = Notifier::new();
        // No runtime here, so no expiry timer is armed
        let id = notifier.push(Severity::Info, None, "hello", None);
        assert_eq!(notifier.active().len(), 1);

        notifier.dismiss(id);
        assert!(notifier.active().is_empty());

        // Second dismissal of the same id is a no-op
        notifier.dismiss(id);
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_sticky_message_has_no_duration() {
        let notifier = Notifier::new();
        notifier.push(Severity::Error, Some("Fatal".into()), "sticky", None);
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert!(active[0].duration.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_expiry() {
        let notifier = Notifier::new();
        let short = notifier.push(
            Severity::Info,
            None,
            "short",
            Some(Duration::from_millis(100)),
        );
        let long = notifier.push(
            Severity::Info,
            None,
            "long",
            Some(Duration::from_millis(10_000)),
        );
        assert_eq!(notifier.active().len(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, long);

        // Dismiss before its timer fires; the late expiry must be a no-op
        notifier.dismiss(long);
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert!(notifier.active().is_empty());
        let _ = short;
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_insert_while_expiring() {
        let notifier = Notifier::new();
        notifier.push(
            Severity::Success,
            None,
            "first",
            Some(Duration::from_millis(50)),
        );
        tokio::time::sleep(Duration::from_millis(40)).await;
        notifier.push(
            Severity::Info,
            None,
            "second",
            Some(Duration::from_millis(500)),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "second");
    }
}
