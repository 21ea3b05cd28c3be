//! Derived financial metrics for movie records
//!
//! Everything here is a pure function of a record's budget and revenue.
//! ROI is `None` (not zero, not infinity) whenever the budget cannot serve as
//! a denominator, and every consumer branches on that before formatting.

use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::model::MovieRecord;

/// Categorical ROI performance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceRating {
    Excellent,
    Good,
    BreakEven,
    Poor,
    Loss,
    Unknown,
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::Good => "Good",
            PerformanceRating::BreakEven => "Break Even",
            PerformanceRating::Poor => "Poor",
            PerformanceRating::Loss => "Loss",
            PerformanceRating::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for PerformanceRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "excellent" => Ok(PerformanceRating::Excellent),
            "good" => Ok(PerformanceRating::Good),
            "break even" | "breakeven" => Ok(PerformanceRating::BreakEven),
            "poor" => Ok(PerformanceRating::Poor),
            "loss" => Ok(PerformanceRating::Loss),
            "unknown" => Ok(PerformanceRating::Unknown),
            other => Err(format!("unknown performance rating: {}", other)),
        }
    }
}

/// Categorical budget size band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetCategory {
    Blockbuster,
    HighBudget,
    MidBudget,
    LowBudget,
    MicroBudget,
    Unknown,
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetCategory::Blockbuster => "Blockbuster",
            BudgetCategory::HighBudget => "High Budget",
            BudgetCategory::MidBudget => "Mid Budget",
            BudgetCategory::LowBudget => "Low Budget",
            BudgetCategory::MicroBudget => "Micro Budget",
            BudgetCategory::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for BudgetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "blockbuster" => Ok(BudgetCategory::Blockbuster),
            "high budget" | "high" => Ok(BudgetCategory::HighBudget),
            "mid budget" | "mid" => Ok(BudgetCategory::MidBudget),
            "low budget" | "low" => Ok(BudgetCategory::LowBudget),
            "micro budget" | "micro" => Ok(BudgetCategory::MicroBudget),
            "unknown" => Ok(BudgetCategory::Unknown),
            other => Err(format!("unknown budget category: {}", other)),
        }
    }
}

/// Metrics computed from a record's budget and revenue, never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub roi: Option<f64>,
    pub profit: Option<f64>,
    pub rating: PerformanceRating,
    pub category: BudgetCategory,
}

impl DerivedMetrics {
    /// Derive all metrics from optional budget and revenue
    pub fn derive(budget: Option<f64>, revenue: Option<f64>) -> Self {
        let roi = roi(budget, revenue);
        let profit = match (budget, revenue) {
            (Some(b), Some(r)) => Some(r - b),
            _ => None,
        };

        Self {
            roi,
            profit,
            rating: performance_rating(roi),
            category: budget_category(budget),
        }
    }

    /// Complete financial data: both inputs present and a classifiable ROI
    pub fn is_complete(&self) -> bool {
        self.roi.is_some() && self.rating != PerformanceRating::Unknown
    }
}

/// Return on investment in percent. Undefined for an absent, zero, or
/// negative budget; the denominator is never allowed to poison the result.
pub fn roi(budget: Option<f64>, revenue: Option<f64>) -> Option<f64> {
    match (budget, revenue) {
        (Some(b), Some(r)) if b > 0.0 => Some((r - b) / b * 100.0),
        _ => None,
    }
}

/// Classify an ROI value, top-down on the first matching band.
/// Bands are contiguous: (200, inf] Excellent, (50, 200] Good,
/// [-10, 50] Break Even, [-50, -10) Poor, (-inf, -50) Loss.
pub fn performance_rating(roi: Option<f64>) -> PerformanceRating {
    let Some(roi) = roi else {
        return PerformanceRating::Unknown;
    };

    if roi > constants::ROI_EXCELLENT {
        PerformanceRating::Excellent
    } else if roi > constants::ROI_GOOD {
        PerformanceRating::Good
    } else if roi >= constants::ROI_BREAK_EVEN {
        PerformanceRating::BreakEven
    } else if roi >= constants::ROI_POOR {
        PerformanceRating::Poor
    } else {
        PerformanceRating::Loss
    }
}

/// Classify a budget by absolute size, inclusive on each band's lower bound
pub fn budget_category(budget: Option<f64>) -> BudgetCategory {
    let Some(budget) = budget else {
        return BudgetCategory::Unknown;
    };

    if budget > constants::BUDGET_BLOCKBUSTER {
        BudgetCategory::Blockbuster
    } else if budget >= constants::BUDGET_HIGH {
        BudgetCategory::HighBudget
    } else if budget >= constants::BUDGET_MID {
        BudgetCategory::MidBudget
    } else if budget >= constants::BUDGET_LOW {
        BudgetCategory::LowBudget
    } else if budget > 0.0 {
        BudgetCategory::MicroBudget
    } else {
        BudgetCategory::Unknown
    }
}

/// Format a dollar amount by magnitude, one decimal place.
/// The single source of truth for how money looks everywhere: console KPIs,
/// the explorer table, and the executive report all go through here.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();

    if magnitude >= 1e9 {
        format!("{}${:.1}B", sign, magnitude / 1e9)
    } else if magnitude >= 1e6 {
        format!("{}${:.1}M", sign, magnitude / 1e6)
    } else if magnitude >= 1e3 {
        format!("{}${:.1}K", sign, magnitude / 1e3)
    } else {
        format!("{}${:.1}", sign, magnitude)
    }
}

/// Format a percentage to one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// A movie record with its derived metrics attached
#[derive(Debug, Clone)]
pub struct AnnotatedMovie {
    pub record: MovieRecord,
    pub metrics: DerivedMetrics,
}

/// Annotate every record with its derived metrics
pub fn annotate(records: Vec<MovieRecord>) -> Vec<AnnotatedMovie> {
    records
        .into_iter()
        .map(|record| {
            let metrics = DerivedMetrics::derive(record.budget, record.revenue);
            AnnotatedMovie { record, metrics }
        })
        .collect()
}
