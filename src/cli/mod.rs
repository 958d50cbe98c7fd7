//! # CLI Module
//!
//! Command-line interface for the visual match engine.
//!
//! ## Usage
//! ```bash
//! # Rank every image in a directory against a photo
//! visual-match search photo.jpg ~/lost-items
//!
//! # Stricter threshold, more results, keypoint features
//! visual-match search photo.jpg ~/lost-items --threshold 0.6 --limit 20 --strategy keypoint
//!
//! # JSON output
//! visual-match search photo.jpg ~/lost-items --output json
//!
//! # Score two images directly
//! visual-match compare a.jpg b.jpg
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use visual_match::core::features::{StrategyConfig, StrategyKind};
use visual_match::core::ranking::{Query, SimilarityEngine};
use visual_match::core::search::{SearchReport, VisualSearch, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use visual_match::core::store::{BlobStore, DirectoryStore};
use visual_match::error::{Result, StoreError};
use visual_match::events::{Event, EventChannel, RankEvent};

/// Visual Match - find lost items that look like your photo
#[derive(Parser, Debug)]
#[command(name = "visual-match")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the images in a directory by similarity to a photo
    Search {
        /// The photo to search for
        query: PathBuf,

        /// Directory of candidate images
        directory: PathBuf,

        /// Minimum score for a match (exclusive, 0.0-1.0)
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Maximum number of matches to show
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Feature strategy to use
        #[arg(short, long, default_value = "histogram")]
        strategy: Strategy,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the similarity score of two images
    Compare {
        /// First image
        first: PathBuf,

        /// Second image
        second: PathBuf,

        /// Feature strategy to use
        #[arg(short, long, default_value = "histogram")]
        strategy: Strategy,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Colour histogram - robust to resizing (default)
    Histogram,
    /// Keypoint matching - robust to recolouring
    Keypoint,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Histogram => StrategyKind::Histogram,
            Strategy::Keypoint => StrategyKind::Keypoint,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (ids only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            directory,
            threshold,
            limit,
            strategy,
            output,
            verbose,
        } => run_search(
            &query,
            &directory,
            threshold,
            limit,
            strategy.into(),
            output,
            verbose,
        ),
        Commands::Compare {
            first,
            second,
            strategy,
        } => run_compare(&first, &second, strategy.into()),
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        }
        .into()
    })
}

fn run_search(
    query_path: &Path,
    directory: &Path,
    threshold: f64,
    limit: usize,
    strategy: StrategyKind,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Visual Match").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let query_bytes = read_image(query_path)?;

    let root = fs::canonicalize(directory).map_err(|_| StoreError::RootNotFound {
        path: directory.to_path_buf(),
    })?;
    let store = DirectoryStore::open(root)?;

    // The query may live inside the searched directory
    let query_id = fs::canonicalize(query_path)
        .ok()
        .and_then(|path| store.id_for_path(&path));

    let search = VisualSearch::builder()
        .strategy(strategy)
        .threshold(threshold)
        .limit(limit)
        .build()?;

    let candidate_ids = store.ids()?;
    let query = match &query_id {
        Some(id) => Query::with_id(id, &query_bytes),
        None => Query::new(&query_bytes),
    };

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(candidate_ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Rank(RankEvent::Progress(p)) => {
                    pb.set_position(p.scored as u64);
                }
                Event::Rank(RankEvent::CandidateSkipped { id, .. }) if verbose => {
                    pb.set_message(format!("skipped {}", id));
                }
                Event::Rank(RankEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let report = search.search_with_events(&store, query, &candidate_ids, &sender);

    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, strategy, verbose),
        OutputFormat::Json => print_json_results(&report, strategy)?,
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    Ok(())
}

fn run_compare(first: &Path, second: &Path, strategy: StrategyKind) -> Result<()> {
    let engine = SimilarityEngine::new(StrategyConfig::new().kind(strategy).build()?);
    let score = engine.compare(&read_image(first)?, &read_image(second)?);

    println!("{:.4}", score);
    Ok(())
}

fn print_pretty_results(term: &Term, report: &SearchReport, strategy: StrategyKind, verbose: bool) {
    term.write_line(&format!("{} Search Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images compared in {:.1}s ({} features)",
        style(report.candidates_considered).cyan(),
        report.duration_ms as f64 / 1000.0,
        strategy
    ))
    .ok();

    if !report.skipped.is_empty() {
        term.write_line(&format!(
            "  {} images could not be loaded",
            style(report.skipped.len()).yellow()
        ))
        .ok();
        if verbose {
            for id in &report.skipped {
                term.write_line(&format!("    {} {}", style("○").dim(), id)).ok();
            }
        }
    }

    term.write_line("").ok();

    if report.matches.is_empty() {
        term.write_line("  No similar items found.").ok();
        return;
    }

    term.write_line(&format!("{}", style("Matches:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (rank, result) in report.matches.iter().enumerate() {
        term.write_line(&format!(
            "  {} {:>6.2}%  {}  {}",
            style(format!("{:>2}.", rank + 1)).bold(),
            result.score * 100.0,
            style(format!("{:<14}", result.strength().to_string())).yellow(),
            result.id
        ))
        .ok();
    }

    term.write_line("").ok();
}

fn print_json_results(report: &SearchReport, strategy: StrategyKind) -> Result<()> {
    let output = serde_json::json!({
        "strategy": strategy.to_string(),
        "candidates_considered": report.candidates_considered,
        "skipped": report.skipped,
        "duration_ms": report.duration_ms,
        "count": report.matches.len(),
        "matches": report.matches.iter().map(|m| {
            serde_json::json!({
                "id": m.id,
                "score": m.score,
                "strength": m.strength().to_string(),
            })
        }).collect::<Vec<_>>()
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_minimal_results(report: &SearchReport) {
    for result in &report.matches {
        println!("{}", result.id);
    }
}
