mod config;
mod corpus;
mod error;
mod loader;
mod metrics;
mod model;
mod platform;
mod ranker;
mod scoring;

use crate::config::CONFIG;
use crate::corpus::{Corpus, LearningPaths};
use crate::error::{AppError, Result};
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::model::{CourseRecord, Level};
use crate::ranker::RankedCourse;
use crate::scoring::ScoringTable;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "course-scout", version)]
#[command(about = "Course discovery: search, recommend and rate online courses")]
struct Cli {
    /// Output format (text, json)
    #[arg(long, short = 'o', global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search courses by keyword
    Search {
        query: String,

        /// Difficulty filter (beginner, intermediate)
        #[arg(long, short = 'l')]
        level: Option<Level>,

        /// Platform filter (Udemy, Coursera, ...)
        #[arg(long, short = 'p')]
        platform: Option<String>,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Recommend courses for an interest at a difficulty level
    Recommend {
        interest: String,

        /// Difficulty level (beginner, intermediate)
        #[arg(long, short = 'l')]
        level: Level,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// List free courses, best-rated first
    Free {
        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show the learning-path split
    Paths,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();

    let cli = Cli::parse();

    info!("Starting course scout");
    info!(
        csv_files = CONFIG.sources.csv_files.len(),
        include_curated = CONFIG.sources.include_curated,
        result_limit = CONFIG.ranker.result_limit,
        rayon_threads = CONFIG.analyzer.rayon_threads,
        "Configuration loaded"
    );

    if let Err(e) = scoring::init_rayon_pool(CONFIG.analyzer.rayon_threads) {
        warn!(error = %e, "Rayon pool was already initialized");
    }

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, initiating graceful shutdown");
                shutdown_token.cancel();
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for shutdown signal");
            }
        }
    });

    let metrics = Metrics::new();
    let loader = Loader::new(cancel_token.clone(), metrics.clone());

    info!("Loading courses from all sources");

    let mut sources = loader.load_csv_sources(&CONFIG.sources.csv_files).await;
    if CONFIG.sources.include_curated {
        sources.push(loader.curated_courses());
    }

    if cancel_token.is_cancelled() {
        info!("Shutdown requested, cleaning up");
        return Ok(());
    }

    let mut rows = Vec::new();
    for (source, results) in sources {
        for result in results {
            match result {
                Ok(row) => {
                    rows.push(row);
                    metrics.record_course_loaded();
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "Failed to load course row");
                    metrics.record_course_failed();
                }
            }
        }
    }

    if rows.is_empty() {
        warn!("No course rows loaded from any source, serving empty results");
    }

    let table = ScoringTable::final_2025()?;
    info!(
        table_version = table.version(),
        row_count = rows.len(),
        "Building corpus"
    );

    let build_metrics = metrics.clone();
    let corpus = tokio::task::spawn_blocking(move || Corpus::build(rows, &table, &build_metrics))
        .await
        .map_err(|e| AppError::ScoringError(format!("Corpus build task panicked: {e}")))?;

    if cancel_token.is_cancelled() {
        info!("Shutdown requested after corpus build");
        return Ok(());
    }

    info!(
        course_count = corpus.len(),
        table_version = corpus.table_version(),
        "Corpus ready"
    );

    run_command(&cli, &corpus)?;

    metrics.log_summary();
    info!("Application completed successfully");
    Ok(())
}

fn run_command(cli: &Cli, corpus: &Corpus) -> Result<()> {
    let default_limit = CONFIG.ranker.result_limit;
    let json = cli.format.eq_ignore_ascii_case("json");

    match &cli.command {
        Commands::Search {
            query,
            level,
            platform,
            limit,
        } => {
            let results = ranker::rank(
                corpus,
                query,
                *level,
                platform.as_deref(),
                limit.unwrap_or(default_limit),
            );
            if json {
                print_json(!corpus.is_empty(), &results)
            } else {
                display_ranked("SEARCH RESULTS", &results, corpus.is_empty());
                Ok(())
            }
        }
        Commands::Recommend { interest, level, limit } => {
            let results = ranker::recommend(corpus, interest, *level, limit.unwrap_or(default_limit));
            if json {
                print_json(!corpus.is_empty(), &results)
            } else {
                display_ranked("RECOMMENDED COURSES", &results, corpus.is_empty());
                Ok(())
            }
        }
        Commands::Free { limit } => {
            let results = corpus.free_courses(limit.unwrap_or(default_limit));
            if json {
                print_json(!corpus.is_empty(), &results)
            } else {
                display_courses("FREE COURSES", &results, corpus.is_empty());
                Ok(())
            }
        }
        Commands::Paths => {
            let paths = corpus.learning_paths();
            if json {
                print_json(!corpus.is_empty(), &paths)
            } else {
                display_paths(&paths, corpus.is_empty());
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize>(data_available: bool, results: &T) -> Result<()> {
    let payload = serde_json::json!({
        "data_available": data_available,
        "results": results,
    });
    let rendered = serde_json::to_string_pretty(&payload)
        .map_err(|e| AppError::parse_error("json output", e))?;
    println!("{rendered}");
    Ok(())
}

fn print_heading(heading: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{heading:^80}");
    println!("{}", "=".repeat(80));
}

fn print_course_lines(course: &CourseRecord) {
    println!("   Platform: {}", course.platform());
    println!("   URL: {}", course.url());
    if let Some(subscribers) = course.subscribers() {
        println!("   Subscribers: {subscribers}");
    }
    if let Some(price) = course.price() {
        if price == 0.0 {
            println!("   Price: free");
        } else {
            println!("   Price: ${price:.2}");
        }
    }
    println!("{}", "-".repeat(80));
}

fn display_ranked(heading: &str, results: &[RankedCourse], data_unavailable: bool) {
    print_heading(heading);

    if data_unavailable {
        println!("\nCourse data unavailable.");
        return;
    }
    if results.is_empty() {
        println!("\nNo matching courses.");
        return;
    }

    for (i, item) in results.iter().enumerate() {
        let course = item.course();
        println!(
            "\n{}. {} [{}/5 | Score: {:.3}]",
            i + 1,
            course.title(),
            course.star_rating(),
            item.final_score()
        );
        print_course_lines(course);
    }
}

fn display_courses(heading: &str, results: &[&CourseRecord], data_unavailable: bool) {
    print_heading(heading);

    if data_unavailable {
        println!("\nCourse data unavailable.");
        return;
    }
    if results.is_empty() {
        println!("\nNo matching courses.");
        return;
    }

    for (i, course) in results.iter().enumerate() {
        println!("\n{}. {} [{}/5]", i + 1, course.title(), course.star_rating());
        print_course_lines(course);
    }
}

fn display_paths(paths: &LearningPaths<'_>, data_unavailable: bool) {
    print_heading("LEARNING PATH");

    if data_unavailable {
        println!("\nCourse data unavailable.");
        return;
    }

    for (track, courses) in [
        ("Foundation track", paths.foundation()),
        ("Advanced track", paths.advanced()),
    ] {
        println!("\n{} ({} courses)", track, courses.len());
        println!("{}", "-".repeat(80));
        for course in courses {
            println!("  {} [{}/5] - {}", course.title(), course.star_rating(), course.platform());
        }
    }
}
