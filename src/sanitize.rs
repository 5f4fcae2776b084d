//! Table cell values and numeric sanitation
//!
//! Every field that leaves the pipeline for a table or spreadsheet is a
//! [`Cell`]. Non-finite floats are coerced to `0` by [`sanitize`] before
//! they reach a sink.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::score::UNKNOWN_MARKER;

/// One field of an exported row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Score that could not be determined
    Unknown,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Unknown => f.write_str(UNKNOWN_MARKER),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(n) => serializer.serialize_i64(*n),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Integer(i64::from(value))
    }
}

impl From<u64> for Cell {
    /// Counts past `i64::MAX` are kept exact as text.
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Cell::Integer)
            .unwrap_or_else(|_| Cell::Text(value.to_string()))
    }
}

/// Replace a NaN or infinite float with the integer `0`.
///
/// All other values pass through unchanged.
pub fn sanitize(value: Cell) -> Cell {
    match value {
        Cell::Float(x) if !x.is_finite() => Cell::Integer(0),
        other => other,
    }
}

/// Float-only form of [`sanitize`] for typed fields.
pub fn sanitize_float(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sanitize every cell of a row in place.
pub fn sanitize_row(row: &mut [Cell]) {
    for cell in row.iter_mut() {
        if let Cell::Float(x) = cell {
            if !x.is_finite() {
                *cell = Cell::Integer(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(sanitize(Cell::Float(f64::NAN)), Cell::Integer(0));
        assert_eq!(sanitize(Cell::Float(f64::INFINITY)), Cell::Integer(0));
        assert_eq!(sanitize(Cell::Float(f64::NEG_INFINITY)), Cell::Integer(0));
    }

    #[test]
    fn test_other_values_unchanged() {
        assert_eq!(sanitize(Cell::Integer(5)), Cell::Integer(5));
        assert_eq!(sanitize(Cell::Float(12.5)), Cell::Float(12.5));
        assert_eq!(sanitize(Cell::Float(-0.0)), Cell::Float(-0.0));
        assert_eq!(sanitize(Cell::text("nan")), Cell::text("nan"));
        assert_eq!(sanitize(Cell::Unknown), Cell::Unknown);
    }

    #[test]
    fn test_sanitize_float() {
        assert_eq!(sanitize_float(f64::NAN), 0.0);
        assert_eq!(sanitize_float(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize_float(1489.25), 1489.25);
    }

    #[test]
    fn test_sanitize_row() {
        let mut row = vec![
            Cell::text("Alice"),
            Cell::Float(f64::NAN),
            Cell::Integer(3),
            Cell::Float(1512.5),
            Cell::Float(f64::INFINITY),
        ];
        sanitize_row(&mut row);
        assert_eq!(
            row,
            vec![
                Cell::text("Alice"),
                Cell::Integer(0),
                Cell::Integer(3),
                Cell::Float(1512.5),
                Cell::Integer(0),
            ]
        );
    }

    #[test]
    fn test_large_counts() {
        assert_eq!(Cell::from(5_000_000_000u64), Cell::Integer(5_000_000_000));
        assert_eq!(Cell::from(u64::MAX), Cell::text("18446744073709551615"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Unknown.to_string(), "N/A");
        assert_eq!(Cell::Integer(42).to_string(), "42");
        assert_eq!(Cell::Float(1515.25).to_string(), "1515.25");
    }
}
