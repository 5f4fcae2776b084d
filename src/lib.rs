//! AutoElo
//!
//! Turns bracket-set records from a tournament service into an ordered
//! table of one-on-one matches, rates them with Elo, and exports the result
//! to CSV or an xlsx workbook.
//!
//! This library provides:
//! - `score`: display-score parsing into game counts
//! - `normalize`: raw sets to canonical matches, default ordering
//! - `round_order`: structured ordering over round identifiers
//! - `elo`: stateless Elo update for a single match
//! - `ratings`: caller-side rating ledger that drives the Elo engine
//! - `table` / `workbook`: CSV and xlsx sinks
//!
//! Binaries:
//! - `autoelo`: show, export, rate and package pools of sets

pub mod elo;
pub mod normalize;
pub mod pipeline;
pub mod ratings;
pub mod round_order;
pub mod sanitize;
pub mod score;
pub mod sets;
pub mod table;
pub mod workbook;

// Re-export the types most callers need
pub use normalize::Match;
pub use score::MatchScore;
pub use sets::{EntrantId, RawSet};
