//! Concurrent dashboard fetch with partial-failure handling
//!
//! Movies and the analytics aggregate are fetched in parallel and settled
//! independently: a failure on one side never discards what the other side
//! returned. Every failure is routed through the notifier; the caller gets a
//! three-way outcome so the UI can choose between "show data with warning"
//! and "show error screen".

use crate::api;
use crate::config::Config;
use crate::error::FetchError;
use crate::metrics::{annotate, AnnotatedMovie};
use crate::model::AnalyticsSummary;
use crate::notify::Notifier;

/// Whatever the two fetches produced, independently optional
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub movies: Option<Vec<AnnotatedMovie>>,
    pub analytics: Option<AnalyticsSummary>,
}

/// Presentable state of one dashboard fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// Both fetches succeeded
    Full(DashboardData),
    /// Some data present, error recorded
    Partial { data: DashboardData, error: String },
    /// No data at all
    Failed { error: String },
}

impl FetchOutcome {
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            FetchOutcome::Full(data) | FetchOutcome::Partial { data, .. } => Some(data),
            FetchOutcome::Failed { .. } => None,
        }
    }
}

/// Retry bookkeeping for one logical fetch operation. Lives only as long as
/// the orchestrator; nothing here is persisted.
#[derive(Debug, Default)]
pub struct RetrySession {
    pub attempts: u32,
    pub last_error: Option<FetchError>,
    pub last_partial: Option<DashboardData>,
}

/// Wraps the concurrent fetches and tracks manual retries
pub struct Orchestrator {
    config: Config,
    notifier: Notifier,
    session: RetrySession,
}

impl Orchestrator {
    pub fn new(config: Config, notifier: Notifier) -> Self {
        Self {
            config,
            notifier,
            session: RetrySession::default(),
        }
    }

    /// Retry count so far (manual retries only)
    pub fn attempts(&self) -> u32 {
        self.session.attempts
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.session.last_error.as_ref()
    }

    /// Initial fetch; does not count as a retry
    pub async fn fetch_dashboard(&mut self) -> FetchOutcome {
        self.run().await
    }

    /// Explicit user-triggered retry
    pub async fn retry(&mut self) -> FetchOutcome {
        self.session.attempts += 1;
        self.notifier
            .success("Reconnecting to the movie database...");
        self.run().await
    }

    async fn run(&mut self) -> FetchOutcome {
        // Both futures run to completion regardless of the other's result
        let (movies, analytics) = tokio::join!(
            api::fetch_movies(&self.config),
            api::fetch_analytics(&self.config),
        );

        settle(movies, analytics, &self.notifier, &mut self.session)
    }
}

/// Fold the two settled results into one outcome, recording errors in the
/// session and surfacing each one as a notification.
fn settle(
    movies: Result<Vec<crate::model::MovieRecord>, FetchError>,
    analytics: Result<AnalyticsSummary, FetchError>,
    notifier: &Notifier,
    session: &mut RetrySession,
) -> FetchOutcome {
    let mut first_error: Option<String> = None;

    let movies = match movies {
        Ok(records) => Some(annotate(records)),
        Err(err) => {
            notifier.report_fetch_error(&err, "Movie database fetch failed");
            first_error = Some(err.to_string());
            session.last_error = Some(err);
            None
        }
    };

    let analytics = match analytics {
        Ok(summary) => Some(summary),
        Err(err) => {
            notifier.report_fetch_error(&err, "Analytics fetch failed");
            if first_error.is_none() {
                first_error = Some(err.to_string());
                session.last_error = Some(err);
            }
            None
        }
    };

    let data = DashboardData { movies, analytics };

    match (&data.movies, &data.analytics, first_error) {
        (Some(_), Some(_), _) => {
            // Success discards the session
            *session = RetrySession::default();
            FetchOutcome::Full(data)
        }
        (None, None, Some(error)) => FetchOutcome::Failed { error },
        (_, _, Some(error)) => {
            session.last_partial = Some(data.clone());
            FetchOutcome::Partial { data, error }
        }
        // Unreachable: at least one side failed if we are not Full
        (_, _, None) => FetchOutcome::Full(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieRecord;
    use crate::notify::Severity;

    fn movie(id: i64) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {}", id),
            studio_name: None,
            release_year: None,
            release_date: None,
            budget: Some(10_000_000.0),
            revenue: Some(20_000_000.0),
            genres: Vec::new(),
        }
    }

    #[test]
    fn test_full_success_resets_session() {
        let notifier = Notifier::new();
        let mut session = RetrySession {
            attempts: 2,
            ..Default::default()
        };

        let outcome = settle(
            Ok(vec![movie(1)]),
            Ok(AnalyticsSummary::default()),
            &notifier,
            &mut session,
        );

        assert!(matches!(outcome, FetchOutcome::Full(_)));
        assert_eq!(session.attempts, 0);
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_partial_keeps_surviving_side() {
        let notifier = Notifier::new();
        let mut session = RetrySession::default();

        let outcome = settle(
            Ok(vec![movie(1), movie(2)]),
            Err(FetchError::from_status(500, "")),
            &notifier,
            &mut session,
        );

        match outcome {
            FetchOutcome::Partial { data, .. } => {
                assert_eq!(data.movies.as_ref().map(Vec::len), Some(2));
                assert!(data.analytics.is_none());
            }
            other => panic!("expected partial, got {:?}", other),
        }

        assert!(session.last_error.is_some());
        assert!(session.last_partial.is_some());
        // The server failure reached the notification layer
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].severity, Severity::Error);
    }

    #[test]
    fn test_total_failure_collapses_to_failed() {
        let notifier = Notifier::new();
        let mut session = RetrySession::default();

        let outcome = settle(
            Err(FetchError::Connection("refused".into())),
            Err(FetchError::from_status(503, "")),
            &notifier,
            &mut session,
        );

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        // Both failures were surfaced independently
        assert_eq!(notifier.active().len(), 2);
        // The first failure is the one kept for diagnostics
        assert!(matches!(
            session.last_error,
            Some(FetchError::Connection(_))
        ));
    }

    #[test]
    fn test_rate_limit_surfaces_as_warning() {
        let notifier = Notifier::new();
        let mut session = RetrySession::default();

        settle(
            Err(FetchError::from_status(429, "")),
            Ok(AnalyticsSummary::default()),
            &notifier,
            &mut session,
        );

        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].severity, Severity::Warning);
    }
}
