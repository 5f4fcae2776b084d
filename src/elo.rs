//! Elo rating updates for a single match
//!
//! The engine is stateless: it takes two current ratings and a result and
//! returns the new ratings. Storing ratings is up to the caller
//! (see [`crate::ratings::RatingBook`]).

use serde::{Deserialize, Serialize};

/// K-factor for Elo updates (higher = more volatile)
pub const K_FACTOR: f64 = 30.0;

/// Outcome of a match from player 1's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Player1Win,
    Player2Win,
    Draw,
}

impl Outcome {
    pub fn from_games(score1: u64, score2: u64) -> Self {
        match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => Outcome::Player1Win,
            std::cmp::Ordering::Less => Outcome::Player2Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Actual scores (1 for win, 0.5 for draw, 0 for loss) for both sides
    pub fn actual_scores(self) -> (f64, f64) {
        match self {
            Outcome::Player1Win => (1.0, 0.0),
            Outcome::Player2Win => (0.0, 1.0),
            Outcome::Draw => (0.5, 0.5),
        }
    }
}

/// New ratings and signed changes produced by one update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub new_rating1: f64,
    pub new_rating2: f64,
    pub delta1: f64,
    pub delta2: f64,
}

/// Expected score for a player rated `rating` against `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// Elo model with a configurable K-factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloModel {
    pub k_factor: f64,
}

impl Default for EloModel {
    fn default() -> Self {
        Self { k_factor: K_FACTOR }
    }
}

impl EloModel {
    pub fn with_k_factor(k_factor: f64) -> Self {
        Self { k_factor }
    }

    /// Update both ratings from a completed match's game counts.
    ///
    /// Both scores must be known; callers filter out matches whose result
    /// could not be determined.
    pub fn update(&self, rating1: f64, rating2: f64, score1: u64, score2: u64) -> RatingUpdate {
        let expected1 = expected_score(rating1, rating2);
        let expected2 = expected_score(rating2, rating1);
        let (actual1, actual2) = Outcome::from_games(score1, score2).actual_scores();

        let new_rating1 = rating1 + self.k_factor * (actual1 - expected1);
        let new_rating2 = rating2 + self.k_factor * (actual2 - expected2);

        RatingUpdate {
            new_rating1,
            new_rating2,
            delta1: new_rating1 - rating1,
            delta2: new_rating2 - rating2,
        }
    }
}

/// Update two ratings with the standard K-factor of 30.
pub fn update_ratings(rating1: f64, rating2: f64, score1: u64, score2: u64) -> RatingUpdate {
    EloModel::default().update(rating1, rating2, score1, score2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATING_PAIRS: [(f64, f64); 6] = [
        (1500.0, 1500.0),
        (1500.0, 1700.0),
        (2100.0, 1200.0),
        (1000.0, 1000.5),
        (0.0, 3000.0),
        (1623.7, 1588.1),
    ];

    const RESULTS: [(u64, u64); 4] = [(2, 0), (0, 3), (1, 1), (3, 2)];

    #[test]
    fn test_expected_scores_sum_to_one() {
        for (r1, r2) in RATING_PAIRS {
            let sum = expected_score(r1, r2) + expected_score(r2, r1);
            assert!((sum - 1.0).abs() < 1e-9, "{} vs {}: {}", r1, r2, sum);
        }
    }

    #[test]
    fn test_equal_ratings_expect_half() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_delta_matches_formula() {
        for (r1, r2) in RATING_PAIRS {
            for (s1, s2) in RESULTS {
                let update = update_ratings(r1, r2, s1, s2);
                let (a1, a2) = Outcome::from_games(s1, s2).actual_scores();
                assert_eq!(update.delta1, update.new_rating1 - r1);
                assert_eq!(update.delta2, update.new_rating2 - r2);
                assert!((update.delta1 - K_FACTOR * (a1 - expected_score(r1, r2))).abs() < 1e-9);
                assert!((update.delta2 - K_FACTOR * (a2 - expected_score(r2, r1))).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_tie_between_equals_changes_nothing() {
        let update = update_ratings(1500.0, 1500.0, 1, 1);
        assert_eq!(update.delta1, 0.0);
        assert_eq!(update.delta2, 0.0);
        assert_eq!(update.new_rating1, 1500.0);
        assert_eq!(update.new_rating2, 1500.0);
    }

    #[test]
    fn test_winner_gains_loser_loses() {
        for (r1, r2) in RATING_PAIRS {
            let update = update_ratings(r1, r2, 2, 1);
            assert!(update.delta1 >= 0.0);
            assert!(update.delta2 <= 0.0);

            let update = update_ratings(r1, r2, 0, 2);
            assert!(update.delta1 <= 0.0);
            assert!(update.delta2 >= 0.0);
        }
    }

    #[test]
    fn test_even_match_win() {
        let update = update_ratings(1500.0, 1500.0, 2, 0);
        assert!((update.delta1 - 15.0).abs() < 1e-9);
        assert!((update.delta2 + 15.0).abs() < 1e-9);
        assert!((update.new_rating1 - 1515.0).abs() < 1e-9);
    }

    #[test]
    fn test_upset_moves_more() {
        let favourite_wins = update_ratings(1800.0, 1400.0, 2, 0);
        let underdog_wins = update_ratings(1800.0, 1400.0, 0, 2);
        assert!(underdog_wins.delta2 > favourite_wins.delta1);
    }

    #[test]
    fn test_custom_k_factor() {
        let model = EloModel::with_k_factor(10.0);
        let update = model.update(1500.0, 1500.0, 3, 0);
        assert!((update.delta1 - 5.0).abs() < 1e-9);
        assert_eq!(EloModel::default().k_factor, 30.0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            update_ratings(1612.0, 1490.0, 1, 2),
            update_ratings(1612.0, 1490.0, 1, 2)
        );
    }
}
