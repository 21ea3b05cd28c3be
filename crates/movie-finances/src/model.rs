//! Wire types for the MovieMetrics API
//!
//! The movies endpoint may return either a paginated envelope with a `results`
//! key or a bare array. Financial fields arrive as JSON numbers or numeric
//! strings depending on the serializer version; anything unparseable is
//! treated as absent rather than failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number, a numeric string, null, or garbage; garbage becomes None
fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// A single movie investment record as served by the API
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub studio_name: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl MovieRecord {
    /// Release year, falling back to the year component of `release_date`
    pub fn year(&self) -> Option<i32> {
        self.release_year.or_else(|| {
            self.release_date
                .as_deref()
                .and_then(|d| d.get(..4))
                .and_then(|y| y.parse().ok())
        })
    }

    /// Studio name with the conventional fallback label
    pub fn studio(&self) -> &str {
        self.studio_name.as_deref().unwrap_or("Unknown")
    }
}

/// Movies endpoint envelope: paginated `results` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MoviesEnvelope {
    Paged { results: Vec<MovieRecord> },
    Bare(Vec<MovieRecord>),
}

impl MoviesEnvelope {
    pub fn into_records(self) -> Vec<MovieRecord> {
        match self {
            MoviesEnvelope::Paged { results } => results,
            MoviesEnvelope::Bare(records) => records,
        }
    }
}

/// Portfolio-wide aggregate served by the analytics endpoint.
///
/// Sections default to empty so a partially populated aggregate still parses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub financial_summary: FinancialSummary,
    #[serde(default)]
    pub profitability: Profitability,
    #[serde(default)]
    pub genre_insights: Vec<GenreInsight>,
    #[serde(default)]
    pub studio_insights: Vec<StudioInsight>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub total_movies: u64,
    /// Percentage of records with complete financial data (already 0-100)
    #[serde(default)]
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinancialSummary {
    #[serde(default)]
    pub total_budget: f64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub overall_roi: f64,
    #[serde(default)]
    pub average_roi: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profitability {
    #[serde(default)]
    pub profitable_movies: u64,
    #[serde(default)]
    pub loss_movies: u64,
    #[serde(default)]
    pub success_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreInsight {
    pub name: String,
    #[serde(default)]
    pub movie_count: u64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub avg_revenue: Option<f64>,
    #[serde(default)]
    pub avg_roi: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudioInsight {
    pub name: String,
    #[serde(default)]
    pub movie_count: u64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_roi: f64,
}

impl AnalyticsSummary {
    /// Percentage of movies with positive ROI, computed from the rollup counts
    pub fn success_rate(&self) -> f64 {
        if self.overview.total_movies == 0 {
            0.0
        } else {
            self.profitability.profitable_movies as f64 / self.overview.total_movies as f64 * 100.0
        }
    }
}
