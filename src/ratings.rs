//! Rating ledger kept by the calling application
//!
//! The Elo engine never stores anything. A [`RatingBook`] holds the current
//! rating of every entrant seen so far, feeds pairs of ratings to the engine
//! match by match, and records what changed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::elo::EloModel;
use crate::normalize::Match;
use crate::sanitize::sanitize_float;
use crate::sets::EntrantId;

/// Starting rating for entrants without a stored rating
pub const DEFAULT_RATING: f64 = 1500.0;

/// Stored state for one entrant
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub name: String,
    pub rating: f64,
    pub matches: u32,
}

/// A match that went through the Elo engine
#[derive(Debug, Clone, PartialEq)]
pub struct RatedMatch {
    pub game: Match,
    /// Ratings before the match
    pub rating1: f64,
    pub rating2: f64,
    pub delta1: f64,
    pub delta2: f64,
}

/// One line of a ratings file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RatingRow {
    #[serde(rename = "Player ID")]
    id: String,
    #[serde(rename = "Player Name")]
    name: String,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Matches", default)]
    matches: u32,
}

/// Current ratings keyed by entrant id
#[derive(Debug, Clone)]
pub struct RatingBook {
    entries: BTreeMap<EntrantId, RatingEntry>,
    model: EloModel,
    default_rating: f64,
}

impl Default for RatingBook {
    fn default() -> Self {
        Self::new(EloModel::default())
    }
}

impl RatingBook {
    pub fn new(model: EloModel) -> Self {
        Self {
            entries: BTreeMap::new(),
            model,
            default_rating: DEFAULT_RATING,
        }
    }

    pub fn with_default_rating(mut self, rating: f64) -> Self {
        self.default_rating = rating;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current rating, or the default for an unseen entrant
    pub fn rating(&self, id: &EntrantId) -> f64 {
        self.entries
            .get(id)
            .map(|e| e.rating)
            .unwrap_or(self.default_rating)
    }

    pub fn entry(&self, id: &EntrantId) -> Option<&RatingEntry> {
        self.entries.get(id)
    }

    pub fn set_rating(&mut self, id: EntrantId, name: &str, rating: f64) {
        let entry = self.entries.entry(id).or_insert_with(|| RatingEntry {
            name: name.to_string(),
            rating,
            matches: 0,
        });
        entry.rating = rating;
    }

    fn record(&mut self, id: &EntrantId, name: &str, rating: f64) {
        let entry = self
            .entries
            .entry(id.clone())
            .or_insert_with(|| RatingEntry {
                name: String::new(),
                rating,
                matches: 0,
            });
        entry.name = name.to_string();
        entry.rating = rating;
        entry.matches += 1;
    }

    /// Rate one match; `None` if its score is unknown.
    pub fn apply_match(&mut self, game: &Match) -> Option<RatedMatch> {
        let Some((score1, score2)) = game.score.games() else {
            log::debug!(
                "Not rating {} ({} vs {}): score unknown",
                game.round_identifier,
                game.player1_name,
                game.player2_name
            );
            return None;
        };

        let rating1 = self.rating(&game.player1_id);
        let rating2 = self.rating(&game.player2_id);
        let update = self.model.update(rating1, rating2, score1, score2);

        self.record(&game.player1_id, &game.player1_name, update.new_rating1);
        self.record(&game.player2_id, &game.player2_name, update.new_rating2);

        Some(RatedMatch {
            game: game.clone(),
            rating1,
            rating2,
            delta1: update.delta1,
            delta2: update.delta2,
        })
    }

    /// Rate matches in the order given, skipping unknown scores.
    pub fn apply(&mut self, matches: &[Match]) -> Vec<RatedMatch> {
        matches.iter().filter_map(|m| self.apply_match(m)).collect()
    }

    /// Sorted leaderboard: (id, entry), highest rating first
    pub fn leaderboard(&self) -> Vec<(&EntrantId, &RatingEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            b.1.rating
                .partial_cmp(&a.1.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries
    }

    /// Load ratings from a CSV file with `Player ID, Player Name, Rating[, Matches]`.
    pub fn load(path: &Path, model: EloModel) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open ratings file {}", path.display()))?;
        let mut book = Self::new(model);
        for (row_num, result) in reader.deserialize::<RatingRow>().enumerate() {
            let row = result
                .with_context(|| format!("Invalid rating on line {}", row_num + 2))?;
            if !row.rating.is_finite() {
                return Err(anyhow::anyhow!(
                    "Rating for '{}' on line {} is not a finite number",
                    row.id,
                    row_num + 2
                ));
            }
            book.entries.insert(
                EntrantId::from_field(&row.id),
                RatingEntry {
                    name: row.name,
                    rating: row.rating,
                    matches: row.matches,
                },
            );
        }
        log::info!("Loaded {} ratings from {}", book.len(), path.display());
        Ok(book)
    }

    /// Load ratings if the file exists, otherwise start empty.
    pub fn load_or_default(path: &Path, model: EloModel) -> Result<Self> {
        if path.exists() {
            Self::load(path, model)
        } else {
            log::info!(
                "No ratings file at {}; starting from {}",
                path.display(),
                DEFAULT_RATING
            );
            Ok(Self::new(model))
        }
    }

    /// Write ratings to a CSV file, highest rating first.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create ratings file {}", path.display()))?;
        for (id, entry) in self.leaderboard() {
            writer.serialize(RatingRow {
                id: id.key().into_owned(),
                name: entry.name.clone(),
                rating: sanitize_float(entry.rating),
                matches: entry.matches,
            })?;
        }
        writer.flush().context("Failed to flush ratings file")?;
        Ok(())
    }
}
