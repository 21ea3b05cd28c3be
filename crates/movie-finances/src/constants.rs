//! Shared constants for the MovieMetrics analytics engine

/// Default MovieMetrics API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Movies collection endpoint (relative to the API base)
pub const MOVIES_ENDPOINT: &str = "/movies/";

/// Analytics aggregate endpoint (relative to the API base)
pub const ANALYTICS_ENDPOINT: &str = "/analytics/";

/// Max fetch attempts per request (including the first try)
pub const MAX_FETCH_RETRIES: usize = 3;

// -----------------------------------------------------------------------------
// Derived metric bands
// -----------------------------------------------------------------------------

/// ROI above this is "Excellent"; exactly on the boundary is "Good"
pub const ROI_EXCELLENT: f64 = 200.0;

/// ROI above this is "Good"
pub const ROI_GOOD: f64 = 50.0;

/// ROI at or above this is "Break Even"
pub const ROI_BREAK_EVEN: f64 = -10.0;

/// ROI at or above this is "Poor"; below is "Loss"
pub const ROI_POOR: f64 = -50.0;

/// Budget above this is "Blockbuster"
pub const BUDGET_BLOCKBUSTER: f64 = 200_000_000.0;

/// Budget at or above this is "High Budget"
pub const BUDGET_HIGH: f64 = 100_000_000.0;

/// Budget at or above this is "Mid Budget"
pub const BUDGET_MID: f64 = 50_000_000.0;

/// Budget at or above this is "Low Budget"; positive below is "Micro Budget"
pub const BUDGET_LOW: f64 = 10_000_000.0;

// -----------------------------------------------------------------------------
// Notifications
// -----------------------------------------------------------------------------

/// Default display duration for success messages (ms)
pub const TOAST_SUCCESS_MS: u64 = 3000;

/// Default display duration for info and warning messages (ms)
pub const TOAST_DEFAULT_MS: u64 = 4000;

/// Default display duration for error messages (errors stay longer)
pub const TOAST_ERROR_MS: u64 = 6000;

// -----------------------------------------------------------------------------
// Reports
// -----------------------------------------------------------------------------

/// Full dataset CSV filename prefix (date-stamped on write)
pub const DATASET_CSV_PREFIX: &str = "MovieMetrics-Full-Dataset";

/// Analytics summary CSV filename prefix
pub const SUMMARY_CSV_PREFIX: &str = "MovieMetrics-Analytics-Summary";

/// Executive report filename prefix
pub const REPORT_PREFIX: &str = "MovieMetrics-Executive-Report";

/// Ranked table size in the executive report
pub const REPORT_TOP_N: usize = 20;

/// Content lines per report page (header/footer not included)
pub const REPORT_PAGE_LINES: usize = 36;

/// Footer branding line on every report page
pub const REPORT_FOOTER: &str = "MovieMetrics Business Intelligence Platform";
