//! Structured ordering over round identifiers
//!
//! Single-letter identifiers come first, ranked by letter. Longer
//! identifiers are ranked by the letters they contain, in order, so a
//! subdivided slot like "AB" sorts after "AA" and every single letter.

use crate::normalize::Match;

/// Anything carrying a round identifier can be put in structured order.
pub trait RoundIdentified {
    fn round_identifier(&self) -> &str;
}

impl RoundIdentified for Match {
    fn round_identifier(&self) -> &str {
        &self.round_identifier
    }
}

impl RoundIdentified for String {
    fn round_identifier(&self) -> &str {
        self
    }
}

/// Sort key for a round identifier.
///
/// Compared tier first, then rank-by-rank; a shorter rank list that is a
/// prefix of a longer one sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoundKey {
    /// 1 for single-character identifiers, 2 otherwise
    pub tier: u8,
    pub ranks: Vec<i64>,
}

impl RoundKey {
    pub fn of(identifier: &str) -> Self {
        let mut chars = identifier.chars();
        match (chars.next(), chars.next()) {
            (Some(only), None) => RoundKey {
                tier: 1,
                ranks: vec![letter_offset(only)],
            },
            _ => RoundKey {
                tier: 2,
                ranks: identifier
                    .chars()
                    .filter(|c| c.is_alphabetic())
                    .map(|c| letter_offset(c) + 1)
                    .collect(),
            },
        }
    }
}

/// Zero-based distance of the uppercased character from 'A'.
///
/// Non-letters get their raw code point distance (possibly negative).
fn letter_offset(c: char) -> i64 {
    let upper = c.to_uppercase().next().unwrap_or(c);
    i64::from(u32::from(upper)) - i64::from(u32::from('A'))
}

/// Sort items into structured round order; stable for equal keys.
pub fn sort_by_round_structure<T: RoundIdentified>(items: &mut [T]) {
    items.sort_by_cached_key(|item| RoundKey::of(item.round_identifier()));
}
