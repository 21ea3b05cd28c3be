//! Fetching movie and analytics data from the MovieMetrics API

use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::constants;
use crate::error::FetchError;
use crate::model::{AnalyticsSummary, MovieRecord, MoviesEnvelope};

/// GET a JSON resource with retry and exponential backoff.
/// Retryable failures (transport, 429, 5xx) are retried up to the limit;
/// everything else returns immediately.
async fn get_json<T: DeserializeOwned>(config: &Config, url: &str) -> Result<T, FetchError> {
    let client = reqwest::Client::new();
    let mut last_error = None;

    for attempt in 0..constants::MAX_FETCH_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(2u64.pow(attempt as u32));
            sleep(delay).await;
        }

        let mut request = client.get(url).header("Accept", "application/json");
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.json::<T>().await {
                        Ok(data) => return Ok(data),
                        Err(e) => {
                            last_error =
                                Some(FetchError::Application(format!("Parse error: {}", e)));
                        }
                    }
                } else {
                    let body = response.text().await.unwrap_or_default();
                    let err = FetchError::from_status(status.as_u16(), body);
                    if err.is_retryable() {
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            }
            Err(e) => {
                last_error = Some(FetchError::from_transport(&e));
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        FetchError::Application(format!(
            "Failed after {} attempts",
            constants::MAX_FETCH_RETRIES
        ))
    }))
}

/// Fetch the full movie collection
pub async fn fetch_movies(config: &Config) -> Result<Vec<MovieRecord>, FetchError> {
    let envelope: MoviesEnvelope = get_json(config, &config.movies_url()).await?;
    Ok(envelope.into_records())
}

/// Fetch the portfolio analytics aggregate
pub async fn fetch_analytics(config: &Config) -> Result<AnalyticsSummary, FetchError> {
    get_json(config, &config.analytics_url()).await
}
