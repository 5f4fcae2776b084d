//! Score string parsing
//!
//! Bracket services report a set's result as a display string such as
//! `"Alice 2 - Bob 1"`. This module turns that into a pair of game counts.

use std::fmt;

/// Separator between the two sides of a display score
const SIDE_SEPARATOR: &str = " - ";

/// Text used wherever a score cannot be determined
pub const UNKNOWN_MARKER: &str = "N/A";

/// Game counts for both sides of a match.
///
/// Either both sides are known or neither is; a failure on one side
/// voids the whole score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchScore {
    Known { player1: u64, player2: u64 },
    Unknown,
}

impl MatchScore {
    /// Both game counts, if known
    pub fn games(&self) -> Option<(u64, u64)> {
        match *self {
            MatchScore::Known { player1, player2 } => Some((player1, player2)),
            MatchScore::Unknown => None,
        }
    }

    /// Rebuild a score from two table fields (as written by the exporter).
    pub fn from_fields(player1: &str, player2: &str) -> Self {
        match (parse_game_count(player1), parse_game_count(player2)) {
            (Some(player1), Some(player2)) => MatchScore::Known { player1, player2 },
            _ => MatchScore::Unknown,
        }
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchScore::Known { player1, player2 } => write!(f, "{} - {}", player1, player2),
            MatchScore::Unknown => write!(f, "{} - {}", UNKNOWN_MARKER, UNKNOWN_MARKER),
        }
    }
}

/// Parse a display score of the form `"<anything> <n1> - <anything> <n2>"`.
///
/// The last space-delimited token of each side is the game count for that
/// side. Text after a second separator is ignored. Anything malformed
/// (no separator, non-numeric or signed count, empty input) yields
/// [`MatchScore::Unknown`].
pub fn parse_score(score: &str) -> MatchScore {
    let mut sides = score.split(SIDE_SEPARATOR);
    let (Some(first), Some(second)) = (sides.next(), sides.next()) else {
        return MatchScore::Unknown;
    };

    match (last_token(first), last_token(second)) {
        (Some(player1), Some(player2)) => MatchScore::Known { player1, player2 },
        _ => MatchScore::Unknown,
    }
}

fn last_token(side: &str) -> Option<u64> {
    side.rsplit(' ').next().and_then(parse_game_count)
}

fn parse_game_count(token: &str) -> Option<u64> {
    let token = token.trim();
    if token.is_empty() || token.starts_with('+') {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_best_of_three() {
        assert_eq!(
            parse_score("Best of 3 2 - 1"),
            MatchScore::Known {
                player1: 2,
                player2: 1
            }
        );
    }

    #[test]
    fn test_parse_player_names() {
        assert_eq!(
            parse_score("Mang0 3 - Armada 0"),
            MatchScore::Known {
                player1: 3,
                player2: 0
            }
        );
        assert_eq!(
            parse_score("Team Liquid | Hungrybox 1 - Leffen 3"),
            MatchScore::Known {
                player1: 1,
                player2: 3
            }
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_score(""), MatchScore::Unknown);
        assert_eq!(parse_score("garbage"), MatchScore::Unknown);
        assert_eq!(parse_score("DQ"), MatchScore::Unknown);
        assert_eq!(parse_score("Alice W - Bob L"), MatchScore::Unknown);
        assert_eq!(parse_score("Alice 2 -Bob 1"), MatchScore::Unknown);
        assert_eq!(parse_score("Alice -1 - Bob 2"), MatchScore::Unknown);
        // Trailing space leaves an empty last token
        assert_eq!(parse_score("Alice 2 - Bob 1 "), MatchScore::Unknown);
    }

    #[test]
    fn test_one_bad_side_voids_both() {
        assert_eq!(parse_score("Alice 2 - Bob DQ"), MatchScore::Unknown);
        assert_eq!(parse_score("Alice DQ - Bob 2"), MatchScore::Unknown);
    }

    #[test]
    fn test_extra_separator_ignored() {
        assert_eq!(
            parse_score("A-Team 2 - B-Team 1 - extra"),
            MatchScore::Known {
                player1: 2,
                player2: 1
            }
        );
    }

    #[test]
    fn test_well_formed_scores_parse_exactly() {
        for x in [0u64, 1, 2, 7, 15, 1000, 4_000_000] {
            for y in [0u64, 3, 42, 99_999] {
                let score = format!("Player One {} - Player Two {}", x, y);
                assert_eq!(
                    parse_score(&score),
                    MatchScore::Known {
                        player1: x,
                        player2: y
                    },
                    "failed on {:?}",
                    score
                );
            }
        }
    }

    #[test]
    fn test_counts_beyond_32_bits() {
        assert_eq!(
            parse_score("A 5000000000 - B 1"),
            MatchScore::Known {
                player1: 5_000_000_000,
                player2: 1
            }
        );
        assert_eq!(
            parse_score(&format!("A {} - B 0", u64::MAX)),
            MatchScore::Known {
                player1: u64::MAX,
                player2: 0
            }
        );
        assert_eq!(
            MatchScore::from_fields("4294967296", "2"),
            MatchScore::Known {
                player1: 4_294_967_296,
                player2: 2
            }
        );
    }

    #[test]
    fn test_plus_sign_rejected() {
        assert_eq!(parse_score("A +2 - B 1"), MatchScore::Unknown);
    }

    #[test]
    fn test_bare_numbers() {
        assert_eq!(
            parse_score("0 - 0"),
            MatchScore::Known {
                player1: 0,
                player2: 0
            }
        );
    }

    #[test]
    fn test_from_fields() {
        assert_eq!(
            MatchScore::from_fields("2", "0"),
            MatchScore::Known {
                player1: 2,
                player2: 0
            }
        );
        assert_eq!(MatchScore::from_fields("N/A", "N/A"), MatchScore::Unknown);
        assert_eq!(MatchScore::from_fields("2", "N/A"), MatchScore::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(parse_score("A 2 - B 1").to_string(), "2 - 1");
        assert_eq!(MatchScore::Unknown.to_string(), "N/A - N/A");
    }
}
