//! Pipeline functions for programmatic use by the CLI.
//!
//! Each operation takes a config struct, runs load → normalize → order →
//! (rate) → export, and returns a summary string instead of printing.

use anyhow::{Context, Result};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::elo::EloModel;
use crate::normalize::{normalize_sets, Match};
use crate::ratings::RatingBook;
use crate::round_order::sort_by_round_structure;
use crate::sets::load_sets;
use crate::table::{export_matches, export_rated_matches, read_match_table};
use crate::workbook::{write_workbook, PoolMatches, TournamentInfo, WorkbookContent};

/// Which ordering to apply after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundOrder {
    /// Identifier length, then case-insensitive text
    #[default]
    Default,
    /// Single letters first, then letter-by-letter ranks
    Structured,
}

impl fmt::Display for RoundOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOrder::Default => f.write_str("default"),
            RoundOrder::Structured => f.write_str("structured"),
        }
    }
}

impl FromStr for RoundOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "length" => Ok(RoundOrder::Default),
            "structured" | "strict" => Ok(RoundOrder::Structured),
            other => Err(format!(
                "Unknown order '{}' (expected default or structured)",
                other
            )),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

fn pool_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("(unknown)")
        .to_string()
}

fn is_match_table(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Load one pool.
///
/// JSON files hold raw sets and are normalized then ordered. CSV files are
/// match tables written by a previous export and keep their row order.
pub fn load_pool(path: &Path, order: RoundOrder) -> Result<PoolMatches> {
    let matches: Vec<Match> = if is_match_table(path) {
        read_match_table(path)?
            .iter()
            .enumerate()
            .map(|(i, row)| row.to_match(&(i + 1).to_string()))
            .collect()
    } else {
        let sets = load_sets(path)?;
        let mut matches = normalize_sets(&sets);
        if order == RoundOrder::Structured {
            sort_by_round_structure(&mut matches);
        }
        log::debug!(
            "{}: {} of {} sets are matches",
            path.display(),
            matches.len(),
            sets.len()
        );
        matches
    };

    Ok(PoolMatches {
        pool: pool_name(path),
        matches,
    })
}

/// Load pools in order. A pool that fails to load is logged and skipped.
pub fn load_pools(inputs: &[PathBuf], order: RoundOrder) -> Result<Vec<PoolMatches>> {
    let mut pools = Vec::new();
    for path in inputs {
        match load_pool(path, order) {
            Ok(pool) => pools.push(pool),
            Err(e) => log::warn!("Skipping pool {}: {:#}", path.display(), e),
        }
    }
    if pools.is_empty() && !inputs.is_empty() {
        return Err(anyhow::anyhow!("None of the {} pool(s) could be loaded", inputs.len()));
    }
    Ok(pools)
}

fn flatten(pools: &[PoolMatches]) -> Vec<Match> {
    pools.iter().flat_map(|p| p.matches.iter().cloned()).collect()
}

// ============================================================================
// Show
// ============================================================================

/// List a pool's matches, one per line.
pub fn format_pool(pool: &PoolMatches) -> String {
    let mut out = String::new();
    if pool.matches.is_empty() {
        out.push_str("No matches found for the selected pool.\n");
        return out;
    }
    for m in &pool.matches {
        let _ = writeln!(out, "{}", m);
    }
    out
}

/// Listing of every input pool with a heading per pool.
pub fn show_pools(inputs: &[PathBuf], order: RoundOrder) -> Result<String> {
    let pools = load_pools(inputs, order)?;
    let mut out = String::new();
    for pool in &pools {
        let _ = writeln!(out, "=== {} ===", pool.pool);
        out.push_str(&format_pool(pool));
    }
    Ok(out)
}

// ============================================================================
// Export
// ============================================================================

/// Configuration for the export operation.
pub struct ExportConfig {
    /// Pool files (raw set JSON), processed in order
    pub inputs: Vec<PathBuf>,
    /// Output CSV path
    pub output: PathBuf,
    pub order: RoundOrder,
}

/// Export all pools to one match table. Returns a summary string.
pub fn export_pools(config: &ExportConfig) -> Result<String> {
    let pools = load_pools(&config.inputs, config.order)?;
    let matches = flatten(&pools);
    export_matches(&matches, &config.output)?;
    Ok(format!(
        "Data successfully exported to {} ({} matches from {} pool(s))",
        config.output.display(),
        matches.len(),
        pools.len()
    ))
}

// ============================================================================
// Rate
// ============================================================================

/// Configuration for the rate operation.
pub struct RateConfig {
    /// Pool files (raw set JSON or exported match tables), processed in order
    pub inputs: Vec<PathBuf>,
    /// Ratings CSV; missing file means everyone starts at the initial rating
    pub ratings: PathBuf,
    pub k_factor: f64,
    pub initial_rating: f64,
    pub order: RoundOrder,
    /// Where to write the rated match table
    pub output: Option<PathBuf>,
    /// Write updated ratings back to `ratings`
    pub save_ratings: bool,
    /// Number of leaderboard entries in the summary
    pub top_n: usize,
}

fn load_book(ratings: &Path, k_factor: f64, initial_rating: f64) -> Result<RatingBook> {
    let model = EloModel::with_k_factor(k_factor);
    Ok(RatingBook::load_or_default(ratings, model)?.with_default_rating(initial_rating))
}

/// Run every known-score match through the Elo engine in order.
/// Returns a summary with the top of the leaderboard.
pub fn rate_pools(config: &RateConfig) -> Result<String> {
    let pools = load_pools(&config.inputs, config.order)?;
    let matches = flatten(&pools);

    let mut book = load_book(&config.ratings, config.k_factor, config.initial_rating)?;
    let rated = book.apply(&matches);

    if let Some(output) = &config.output {
        export_rated_matches(&rated, output)?;
    }
    if config.save_ratings {
        book.save(&config.ratings)
            .with_context(|| format!("Failed to save ratings to {}", config.ratings.display()))?;
    }

    let mut summary = format!(
        "Rated {} of {} matches ({} skipped with unknown scores)\n",
        rated.len(),
        matches.len(),
        matches.len() - rated.len()
    );
    let _ = writeln!(summary, "\n{:<30} {:>10} {:>8}", "Player", "Rating", "Matches");
    let _ = writeln!(summary, "{}", "-".repeat(50));
    for (_, entry) in book.leaderboard().into_iter().take(config.top_n) {
        let _ = writeln!(
            summary,
            "{:<30} {:>10.1} {:>8}",
            entry.name, entry.rating, entry.matches
        );
    }
    Ok(summary)
}

// ============================================================================
// Package
// ============================================================================

/// Configuration for the package (xlsx) operation.
pub struct PackageConfig {
    pub inputs: Vec<PathBuf>,
    /// Output xlsx path
    pub output: PathBuf,
    pub order: RoundOrder,
    pub info: TournamentInfo,
    /// Ratings CSV; when set, matches are rated and rating sheets added
    pub ratings: Option<PathBuf>,
    pub k_factor: f64,
    pub initial_rating: f64,
}

/// Create a workbook from all pools. Returns a summary string.
pub fn package_workbook(config: &PackageConfig) -> Result<String> {
    let pools = load_pools(&config.inputs, config.order)?;

    let book = match &config.ratings {
        Some(path) => {
            let mut book = load_book(path, config.k_factor, config.initial_rating)?;
            let rated = book.apply(&flatten(&pools));
            Some((book, rated))
        }
        None => None,
    };

    let content = WorkbookContent {
        info: &config.info,
        pools: &pools,
        rated: book.as_ref().map(|(_, r)| r.as_slice()).unwrap_or(&[]),
        ratings: book.as_ref().map(|(b, _)| b),
    };
    write_workbook(&content, &config.output)
}
