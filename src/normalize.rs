//! Match normalization
//!
//! Turns raw bracket sets into canonical [`Match`] records and provides the
//! default display ordering.

use std::fmt;

use crate::score::{parse_score, MatchScore};
use crate::sets::{EntrantId, RawEntrant, RawSet};

/// Round label used when a set carries no identifier
pub const UNKNOWN_ROUND: &str = "Unknown Round";

/// A single one-on-one match between two entrants.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Bracket round / pool slot label (e.g. "A", "B1", "WF")
    pub round_identifier: String,
    pub player1_name: String,
    pub player1_id: EntrantId,
    pub player2_name: String,
    pub player2_id: EntrantId,
    pub score: MatchScore,
}

impl Match {
    pub fn player1_score(&self) -> Option<u64> {
        self.score.games().map(|(p1, _)| p1)
    }

    pub fn player2_score(&self) -> Option<u64> {
        self.score.games().map(|(_, p2)| p2)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} vs {} - Score: {}",
            self.round_identifier, self.player1_name, self.player2_name, self.score
        )
    }
}

/// Normalize a pool's raw sets into matches, sorted by the default order.
///
/// Sets that do not have exactly two slots (byes, walkovers, placeholders)
/// are dropped silently. Sets with two slots but an incomplete entrant are
/// dropped with a warning.
pub fn normalize_sets(sets: &[RawSet]) -> Vec<Match> {
    let mut matches: Vec<Match> = sets.iter().filter_map(normalize_set).collect();
    sort_default(&mut matches);
    matches
}

/// Normalize a single set; `None` if it is not a playable two-entrant match.
pub fn normalize_set(set: &RawSet) -> Option<Match> {
    if set.slots.len() != 2 {
        log::debug!(
            "Skipping set {} with {} slot(s)",
            set.identifier.as_deref().unwrap_or(UNKNOWN_ROUND),
            set.slots.len()
        );
        return None;
    }

    let round_identifier = set
        .identifier
        .clone()
        .unwrap_or_else(|| UNKNOWN_ROUND.to_string());

    let entrants = (
        set.slots[0].entrant.as_ref().and_then(entrant_parts),
        set.slots[1].entrant.as_ref().and_then(entrant_parts),
    );
    let (Some((player1_name, player1_id)), Some((player2_name, player2_id))) = entrants else {
        log::warn!(
            "Dropping set {}: entrant name or id missing",
            round_identifier
        );
        return None;
    };

    // A missing display score never reaches the parser
    let score = match set.display_score.as_deref() {
        Some(display) => parse_score(display),
        None => MatchScore::Unknown,
    };

    Some(Match {
        round_identifier,
        player1_name,
        player1_id,
        player2_name,
        player2_id,
        score,
    })
}

fn entrant_parts(entrant: &RawEntrant) -> Option<(String, EntrantId)> {
    Some((entrant.name.clone()?, entrant.id.clone()?))
}

/// Default ordering key: identifier length first, then case-insensitive text.
pub fn default_order_key(identifier: &str) -> (usize, String) {
    (identifier.chars().count(), identifier.to_uppercase())
}

/// Sort matches by [`default_order_key`]; stable for equal keys.
pub fn sort_default(matches: &mut [Match]) {
    matches.sort_by_cached_key(|m| default_order_key(&m.round_identifier));
}
