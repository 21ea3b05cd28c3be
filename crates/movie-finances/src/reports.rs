//! Report generation (CSV exports and the paginated executive report)
//!
//! Both artifacts read every per-record number from the same
//! `DerivedMetrics`, so the flat file and the document can never disagree.
//! The CSV keeps plain machine-parseable numbers; the document goes through
//! the shared currency formatter.

use chrono::Utc;
use std::path::Path;

use crate::constants;
use crate::error::ExportError;
use crate::explorer::{self, FilterCriteria, PageSpec, SortDirection, SortField, SortSpec};
use crate::metrics::{format_currency, format_percent, AnnotatedMovie};
use crate::model::AnalyticsSummary;

/// Bundled report inputs to reduce function argument counts
pub struct ReportData<'a> {
    pub movies: &'a [AnnotatedMovie],
    pub analytics: &'a AnalyticsSummary,
}

/// Current date in the form used by every artifact filename
fn date_stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn dataset_csv_filename() -> String {
    format!("{}-{}.csv", constants::DATASET_CSV_PREFIX, date_stamp())
}

pub fn analytics_csv_filename() -> String {
    format!("{}-{}.csv", constants::SUMMARY_CSV_PREFIX, date_stamp())
}

pub fn report_filename() -> String {
    format!("{}-{}.txt", constants::REPORT_PREFIX, date_stamp())
}

/// Generate the full dataset CSV payload: one row per record, plain numbers,
/// quote-escaping handled by the writer. Empty input is an explicit error,
/// never a silent header-only file.
pub fn dataset_csv(movies: &[&AnnotatedMovie]) -> Result<Vec<u8>, ExportError> {
    if movies.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record([
        "Title",
        "Budget ($)",
        "Revenue ($)",
        "ROI (%)",
        "Performance Rating",
        "Studio",
        "Release Year",
        "Profit/Loss ($)",
        "Budget Category",
    ])?;

    for movie in movies {
        let record = &movie.record;
        let metrics = &movie.metrics;

        wtr.write_record([
            record.title.clone(),
            record.budget.unwrap_or(0.0).to_string(),
            record.revenue.unwrap_or(0.0).to_string(),
            format!("{:.2}", metrics.roi.unwrap_or(0.0)),
            metrics.rating.to_string(),
            record.studio().to_string(),
            record
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            metrics.profit.unwrap_or(0.0).to_string(),
            metrics.category.to_string(),
        ])?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))
}

/// Generate the analytics summary CSV: one row per KPI with a description
pub fn analytics_csv(analytics: &AnalyticsSummary) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let rows = [
        (
            "Total Revenue",
            format_currency(analytics.financial_summary.total_revenue),
            "Total box office revenue across all movies",
        ),
        (
            "Overall ROI",
            format!("{:.2}%", analytics.financial_summary.overall_roi),
            "Average return on investment",
        ),
        (
            "Total Movies",
            analytics.overview.total_movies.to_string(),
            "Number of movies in portfolio",
        ),
        (
            "Profitable Movies",
            analytics.profitability.profitable_movies.to_string(),
            "Movies with positive ROI",
        ),
        (
            "Success Rate",
            format!("{:.2}%", analytics.success_rate()),
            "Percentage of profitable movies",
        ),
        (
            "Data Completion",
            format!("{:.2}%", analytics.overview.completion_rate),
            "Percentage of complete financial records",
        ),
    ];

    wtr.write_record(["Metric", "Value", "Description"])?;
    for (metric, value, description) in rows {
        wtr.write_record([metric, value.as_str(), description])?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))
}

/// Narrative insight sentences generated from threshold rules on the summary
fn insights(data: &ReportData) -> Vec<String> {
    let financial = &data.analytics.financial_summary;
    let overview = &data.analytics.overview;

    let performance = if financial.overall_roi > 50.0 {
        "strong"
    } else if financial.overall_roi > 0.0 {
        "moderate"
    } else {
        "poor"
    };

    let quality = if overview.completion_rate > 80.0 {
        "High data quality"
    } else {
        "Moderate data quality"
    };

    let recommendation = if financial.overall_roi > 100.0 {
        "Continue current investment strategy"
    } else if financial.overall_roi > 0.0 {
        "Optimize investment selection criteria"
    } else {
        "Review and restructure investment approach"
    };

    vec![
        format!(
            "- Portfolio Health: {} of movies generated positive ROI",
            format_percent(data.analytics.success_rate())
        ),
        format!(
            "- Investment Performance: Average ROI of {} indicates {} portfolio performance",
            format_percent(financial.overall_roi),
            performance
        ),
        format!(
            "- Revenue Generation: Total portfolio revenue of {} across {} productions",
            format_currency(financial.total_revenue),
            overview.total_movies
        ),
        format!(
            "- Risk Assessment: {} with {} complete financial records",
            quality,
            format_percent(overview.completion_rate)
        ),
        format!("- Recommendation: {}", recommendation),
    ]
}

/// The top-N ranked table, ROI descending, currency-formatted via the shared
/// formatter. Incomplete records never rank.
fn ranked_table(movies: &[AnnotatedMovie]) -> Vec<String> {
    let sort = SortSpec {
        field: SortField::Roi,
        direction: SortDirection::Descending,
    };
    let page = PageSpec {
        page: 0,
        size: constants::REPORT_TOP_N,
    };
    let (top, _) = explorer::apply(movies, &FilterCriteria::default(), &sort, &page);

    let mut lines = vec![format!(
        "{:<32} {:>10} {:>10} {:>9} {:<12} {:<20} {:>5} {:>10} {:<12}",
        "Title", "Budget", "Revenue", "ROI", "Rating", "Studio", "Year", "Profit", "Category"
    )];
    lines.push("-".repeat(128));

    for movie in top {
        let record = &movie.record;
        let metrics = &movie.metrics;
        lines.push(format!(
            "{:<32} {:>10} {:>10} {:>9} {:<12} {:<20} {:>5} {:>10} {:<12}",
            truncate(&record.title, 32),
            format_currency(record.budget.unwrap_or(0.0)),
            format_currency(record.revenue.unwrap_or(0.0)),
            format_percent(metrics.roi.unwrap_or(0.0)),
            metrics.rating.to_string(),
            truncate(record.studio(), 20),
            record
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            format_currency(metrics.profit.unwrap_or(0.0)),
            metrics.category.to_string(),
        ));
    }

    lines
}

/// Genre and studio rollups drawn from the aggregate
fn rollup_lines(analytics: &AnalyticsSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !analytics.genre_insights.is_empty() {
        lines.push("Top genres by average revenue:".to_string());
        for genre in analytics.genre_insights.iter().take(5) {
            lines.push(format!(
                "  {:<24} {:>4} movies   avg ROI {:>8}   avg revenue {}",
                truncate(&genre.name, 24),
                genre.movie_count,
                format_percent(genre.avg_roi),
                format_currency(genre.avg_revenue.unwrap_or(0.0)),
            ));
        }
    }

    if !analytics.studio_insights.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Top studios by total revenue:".to_string());
        for studio in analytics.studio_insights.iter().take(5) {
            lines.push(format!(
                "  {:<24} {:>4} movies   avg ROI {:>8}   total revenue {}",
                truncate(&studio.name, 24),
                studio.movie_count,
                format_percent(studio.avg_roi),
                format_currency(studio.total_revenue.unwrap_or(0.0)),
            ));
        }
    }

    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn section_heading(title: &str) -> Vec<String> {
    vec![String::new(), title.to_string(), "=".repeat(title.len())]
}

/// Generate the multi-section executive report as paginated plain text.
/// The header and a numbered footer repeat on every page.
pub fn executive_report(data: &ReportData) -> Result<String, ExportError> {
    if data.movies.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let financial = &data.analytics.financial_summary;
    let overview = &data.analytics.overview;

    let mut content: Vec<String> = Vec::new();

    content.push(format!(
        "Generated: {}",
        Utc::now().format("%B %-d, %Y %H:%M UTC")
    ));
    content.push("Report Period: Full Portfolio Analysis".to_string());

    content.extend(section_heading("EXECUTIVE SUMMARY"));
    let kpis = [
        (
            "Total Portfolio Revenue",
            format_currency(financial.total_revenue),
        ),
        ("Overall ROI", format_percent(financial.overall_roi)),
        (
            "Total Movies Analyzed",
            overview.total_movies.to_string(),
        ),
        (
            "Portfolio Success Rate",
            format_percent(data.analytics.success_rate()),
        ),
        (
            "Data Completion Rate",
            format_percent(overview.completion_rate),
        ),
        (
            "Profitable Movies",
            data.analytics.profitability.profitable_movies.to_string(),
        ),
    ];
    for (label, value) in kpis {
        content.push(format!("  {:<28} {}", format!("{}:", label), value));
    }

    content.extend(section_heading("KEY BUSINESS INSIGHTS"));
    content.extend(insights(data));

    let rollups = rollup_lines(data.analytics);
    if !rollups.is_empty() {
        content.extend(section_heading("GENRE & STUDIO PERFORMANCE"));
        content.extend(rollups);
    }

    content.extend(section_heading("TOP PERFORMING MOVIES"));
    content.extend(ranked_table(data.movies));

    Ok(paginate(&content))
}

/// Chunk content lines into numbered pages, repeating the report header and
/// the branded footer on each
fn paginate(content: &[String]) -> String {
    let pages: Vec<&[String]> = content.chunks(constants::REPORT_PAGE_LINES).collect();
    let total = pages.len();
    let mut out = String::new();

    for (index, page) in pages.iter().enumerate() {
        out.push_str("MovieMetrics — Executive Business Intelligence Report\n");
        out.push_str(&"-".repeat(72));
        out.push('\n');

        for line in *page {
            out.push_str(line);
            out.push('\n');
        }

        out.push_str(&"-".repeat(72));
        out.push('\n');
        out.push_str(&format!(
            "{} | Page {} of {} | Confidential Business Report\n",
            constants::REPORT_FOOTER,
            index + 1,
            total
        ));
        if index + 1 < total {
            out.push('\n');
        }
    }

    out
}

/// Write every artifact into the output directory
pub fn write_reports(output_dir: &Path, data: &ReportData) -> Result<(), ExportError> {
    let all: Vec<&AnnotatedMovie> = data.movies.iter().collect();

    let csv_path = output_dir.join(dataset_csv_filename());
    std::fs::write(&csv_path, dataset_csv(&all)?)?;
    println!("  Generated: {}", csv_path.display());

    let summary_path = output_dir.join(analytics_csv_filename());
    std::fs::write(&summary_path, analytics_csv(data.analytics)?)?;
    println!("  Generated: {}", summary_path.display());

    let report_path = output_dir.join(report_filename());
    std::fs::write(&report_path, executive_report(data)?)?;
    println!("  Generated: {}", report_path.display());

    Ok(())
}
