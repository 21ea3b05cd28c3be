//! MovieMetrics Portfolio Analytics
//!
//! Fetches the movie catalog and the portfolio aggregate from the
//! MovieMetrics API, derives per-record financial metrics, and offers a
//! filterable explorer view plus CSV and executive-report exports.

mod api;
mod config;
mod constants;
mod error;
mod explorer;
mod metrics;
mod model;
mod notify;
mod orchestrator;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tabled::{Table, Tabled};

use config::{Config, FileConfig};
use explorer::{FilterCriteria, PageSpec, SortDirection, SortField, SortSpec};
use metrics::{format_currency, format_percent, AnnotatedMovie, BudgetCategory, PerformanceRating};
use model::AnalyticsSummary;
use notify::Notifier;
use orchestrator::{DashboardData, FetchOutcome, Orchestrator};
use reports::ReportData;

/// Load config file if present, otherwise fall back to defaults
fn load_config_file(path: &PathBuf) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    FileConfig::load(path)
}

/// Which artifacts to generate on export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Summary,
    Report,
    All,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "summary" => Ok(ExportFormat::Summary),
            "report" => Ok(ExportFormat::Report),
            "all" => Ok(ExportFormat::All),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "movie-finances")]
#[command(about = "Financial analytics and reporting for the MovieMetrics movie portfolio")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// API base URL override
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Manual retry attempts after a total fetch failure
    #[arg(long, default_value_t = 0, global = true)]
    retries: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explore the catalog: filter, sort, and page through movies
    Explore {
        /// Substring match against title or studio (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Performance rating filter (e.g. "excellent", "break-even")
        #[arg(long)]
        rating: Option<PerformanceRating>,

        /// Budget category filter (e.g. "blockbuster", "micro-budget")
        #[arg(long)]
        category: Option<BudgetCategory>,

        /// Include records without complete financial data
        #[arg(long)]
        include_incomplete: bool,

        /// Sort field: title, studio, year, budget, revenue, roi, profit
        #[arg(long, default_value = "revenue")]
        sort_by: SortField,

        /// Sort ascending (default is descending)
        #[arg(long)]
        ascending: bool,

        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Page size
        #[arg(long, default_value_t = 10)]
        page_size: usize,

        /// Also export the filtered results as CSV
        #[arg(long)]
        export: bool,

        /// Output directory for the exported CSV
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,
    },

    /// Generate CSV and executive report artifacts
    Export {
        /// Artifacts to generate: csv, summary, report, or all
        #[arg(long, default_value = "all")]
        format: ExportFormat,

        /// Output directory for generated artifacts
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = load_config_file(&args.config)?;
    let config = Config::from_file(&file_config, args.api_url.clone());
    let api_base = config.api_base.clone();

    let notifier = Notifier::new();
    let mut orchestrator = Orchestrator::new(config, notifier.clone());

    println!("Fetching MovieMetrics data from {} ...", api_base);
    let mut outcome = orchestrator.fetch_dashboard().await;

    let mut retries_left = args.retries;
    while matches!(outcome, FetchOutcome::Failed { .. }) && retries_left > 0 {
        retries_left -= 1;
        outcome = orchestrator.retry().await;
    }

    let data = match outcome {
        FetchOutcome::Failed { error } => {
            print_notifications(&notifier);
            eprintln!("\nMovie database unavailable. This could be due to:");
            eprintln!("  - Network connectivity issues");
            eprintln!("  - Server maintenance in progress");
            eprintln!("  - Database synchronization delay");
            if orchestrator.attempts() > 0 {
                eprintln!("\nGave up after {} retry attempt(s).", orchestrator.attempts());
            }
            anyhow::bail!("fetch failed: {}", error);
        }
        FetchOutcome::Partial { data, error } => {
            notifier.warning(format!(
                "Showing partial data. Some data may be incomplete or outdated ({}).",
                error
            ));
            data
        }
        FetchOutcome::Full(data) => data,
    };

    match args.command {
        None => run_summary(&data, &notifier),
        Some(Command::Explore {
            search,
            rating,
            category,
            include_incomplete,
            sort_by,
            ascending,
            page,
            page_size,
            export,
            output_dir,
        }) => {
            let criteria = FilterCriteria {
                search,
                rating,
                category,
                include_incomplete,
            };
            let sort = SortSpec {
                field: sort_by,
                direction: if ascending {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                },
            };
            let page = PageSpec {
                page,
                size: page_size,
            };
            run_explore(&data, &notifier, &criteria, &sort, &page, export, &output_dir)
        }
        Some(Command::Export { format, output_dir }) => {
            run_export(&data, &notifier, format, &output_dir)
        }
    }?;

    print_notifications(&notifier);
    Ok(())
}

/// Print the portfolio KPI summary to the console
fn run_summary(data: &DashboardData, notifier: &Notifier) -> Result<()> {
    println!("\n============================================================");
    println!("              MOVIEMETRICS PORTFOLIO SUMMARY");
    println!("============================================================");

    if let Some(movies) = &data.movies {
        let complete = movies.iter().filter(|m| m.metrics.is_complete()).count();
        println!("\nCATALOG:");
        println!("  Movies loaded:        {:>10}", movies.len());
        println!("  Complete records:     {:>10}", complete);
    }

    match &data.analytics {
        Some(analytics) => {
            let financial = &analytics.financial_summary;
            println!("\nFINANCIALS:");
            println!(
                "  Total Budget:         {:>10}",
                format_currency(financial.total_budget)
            );
            println!(
                "  Total Revenue:        {:>10}",
                format_currency(financial.total_revenue)
            );
            println!(
                "  Overall ROI:          {:>10}",
                format_percent(financial.overall_roi)
            );
            println!(
                "  Average ROI:          {:>10}",
                format_percent(financial.average_roi)
            );

            println!("\nPROFITABILITY:");
            println!(
                "  Profitable Movies:    {:>10}",
                analytics.profitability.profitable_movies
            );
            println!(
                "  Loss Movies:          {:>10}",
                analytics.profitability.loss_movies
            );
            println!(
                "  Success Rate:         {:>10}",
                format_percent(analytics.success_rate())
            );
            println!(
                "  Data Completion:      {:>10}",
                format_percent(analytics.overview.completion_rate)
            );
        }
        None => {
            notifier.warning("Analytics aggregate unavailable, portfolio KPIs omitted.");
        }
    }

    println!("============================================================");
    Ok(())
}

/// One row of the explorer console table
#[derive(Tabled)]
struct ExplorerRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "ROI")]
    roi: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Studio")]
    studio: String,
    #[tabled(rename = "Year")]
    year: String,
}

impl ExplorerRow {
    fn from_movie(movie: &AnnotatedMovie) -> Self {
        let record = &movie.record;
        let metrics = &movie.metrics;
        Self {
            title: record.title.clone(),
            budget: record.budget.map(format_currency).unwrap_or_else(|| "N/A".to_string()),
            revenue: record
                .revenue
                .map(format_currency)
                .unwrap_or_else(|| "N/A".to_string()),
            roi: metrics
                .roi
                .map(format_percent)
                .unwrap_or_else(|| "N/A".to_string()),
            rating: metrics.rating.to_string(),
            studio: record.studio().to_string(),
            year: record
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_explore(
    data: &DashboardData,
    notifier: &Notifier,
    criteria: &FilterCriteria,
    sort: &SortSpec,
    page: &PageSpec,
    export: bool,
    output_dir: &PathBuf,
) -> Result<()> {
    let Some(movies) = &data.movies else {
        anyhow::bail!("movie catalog unavailable, cannot explore");
    };

    // Data quality warnings when the incomplete gate is on
    if !criteria.include_incomplete {
        let complete = movies.iter().filter(|m| m.metrics.is_complete()).count();
        if complete == 0 {
            notifier.warning(
                "No movies with complete financial data found. \
                 Try --include-incomplete to see partial records.",
            );
        } else if complete * 2 < movies.len() {
            notifier.push(
                notify::Severity::Warning,
                Some("Warning".to_string()),
                format!(
                    "Only {} of {} movies have complete data. \
                     Consider --include-incomplete for the full view.",
                    complete,
                    movies.len()
                ),
                Some(std::time::Duration::from_millis(constants::TOAST_ERROR_MS)),
            );
        }
    }

    let (page_of_movies, total) = explorer::apply(movies, criteria, sort, page);

    let rows: Vec<ExplorerRow> = page_of_movies.iter().map(|m| ExplorerRow::from_movie(m)).collect();
    if rows.is_empty() {
        println!("No movies on page {} ({} match the filters).", page.page, total);
    } else {
        println!("{}", Table::new(rows));
        println!(
            "Showing {} of {} movies (page {})",
            page_of_movies.len(),
            total,
            page.page
        );
    }

    if export {
        let (all_matches, _) = explorer::apply(
            movies,
            criteria,
            sort,
            &PageSpec {
                page: 0,
                size: usize::MAX,
            },
        );

        match reports::dataset_csv(&all_matches) {
            Ok(payload) => {
                std::fs::create_dir_all(output_dir)?;
                let path = output_dir.join(reports::dataset_csv_filename());
                std::fs::write(&path, payload)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("  Generated: {}", path.display());
                notifier.success(format!(
                    "Successfully exported {} movies to CSV!",
                    all_matches.len()
                ));
            }
            Err(error::ExportError::NothingToExport) => {
                notifier.warning(
                    "No movies match your current filters. Please adjust your search criteria.",
                );
            }
            Err(e) => {
                notifier.error(format!("Failed to export movie data: {}", e));
                return Err(e).context("export failed");
            }
        }
    }

    Ok(())
}

fn run_export(
    data: &DashboardData,
    notifier: &Notifier,
    format: ExportFormat,
    output_dir: &PathBuf,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let movies = data.movies.as_deref().unwrap_or(&[]);
    let fallback = AnalyticsSummary::default();
    let analytics = match &data.analytics {
        Some(analytics) => analytics,
        None => {
            if format != ExportFormat::Csv {
                notifier.warning("Analytics aggregate unavailable, KPI values default to zero.");
            }
            &fallback
        }
    };
    let report_data = ReportData { movies, analytics };

    if format == ExportFormat::All {
        match reports::write_reports(output_dir, &report_data) {
            Ok(()) => {
                notifier.success("Successfully generated export artifacts!");
            }
            Err(error::ExportError::NothingToExport) => {
                notifier.warning(
                    "No movies match your current filters. Please adjust your search criteria.",
                );
            }
            Err(e) => return Err(e).context("export failed"),
        }
        return Ok(());
    }

    let mut generated = 0usize;

    if format == ExportFormat::Csv {
        let refs: Vec<&AnnotatedMovie> = movies.iter().collect();
        match reports::dataset_csv(&refs) {
            Ok(payload) => {
                let path = output_dir.join(reports::dataset_csv_filename());
                std::fs::write(&path, payload)?;
                println!("  Generated: {}", path.display());
                generated += 1;
            }
            Err(error::ExportError::NothingToExport) => {
                notifier.warning("No movie data to export.");
            }
            Err(e) => return Err(e).context("dataset CSV export failed"),
        }
    }

    if format == ExportFormat::Summary {
        let path = output_dir.join(reports::analytics_csv_filename());
        std::fs::write(&path, reports::analytics_csv(analytics)?)?;
        println!("  Generated: {}", path.display());
        generated += 1;
    }

    if format == ExportFormat::Report {
        match reports::executive_report(&report_data) {
            Ok(payload) => {
                let path = output_dir.join(reports::report_filename());
                std::fs::write(&path, payload)?;
                println!("  Generated: {}", path.display());
                generated += 1;
            }
            Err(error::ExportError::NothingToExport) => {
                notifier.warning("No movie data to report on.");
            }
            Err(e) => return Err(e).context("executive report export failed"),
        }
    }

    if generated > 0 {
        notifier.success(format!("Successfully generated {} artifact(s)!", generated));
    }

    Ok(())
}

/// Print the notification log the way the UI would stack toasts
fn print_notifications(notifier: &Notifier) {
    let active = notifier.active();
    if active.is_empty() {
        return;
    }

    println!();
    for message in active {
        match &message.title {
            Some(title) => println!(
                "[{}] {} — {}",
                message.severity.label(),
                title,
                message.text
            ),
            None => println!("[{}] {}", message.severity.label(), message.text),
        }
    }
}
