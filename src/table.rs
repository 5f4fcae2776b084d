//! Tabular (CSV) export of matches
//!
//! The match table has six fixed columns. The round identifier is only used
//! for ordering and is not written. Rows are written in the order received.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io;
use std::path::Path;

use crate::normalize::Match;
use crate::ratings::RatedMatch;
use crate::sanitize::{sanitize_row, Cell};
use crate::score::MatchScore;
use crate::sets::EntrantId;

/// Header of the match table
pub const MATCH_HEADER: [&str; 6] = [
    "Player 1 Name",
    "Player 1 ID",
    "Player 1 Score",
    "Player 2 Name",
    "Player 2 ID",
    "Player 2 Score",
];

/// Extra columns appended for rated matches
pub const RATING_HEADER: [&str; 4] = [
    "Player 1 Rating",
    "Player 1 Change",
    "Player 2 Rating",
    "Player 2 Change",
];

fn id_cell(id: &EntrantId) -> Cell {
    match id {
        EntrantId::Number(n) => Cell::Integer(*n),
        EntrantId::Text(s) => Cell::text(s.as_str()),
    }
}

fn score_cell(score: Option<u64>) -> Cell {
    score.map(Cell::from).unwrap_or(Cell::Unknown)
}

/// The six match-table fields of one match, unsanitized
pub fn match_cells(m: &Match) -> Vec<Cell> {
    vec![
        Cell::text(m.player1_name.as_str()),
        id_cell(&m.player1_id),
        score_cell(m.player1_score()),
        Cell::text(m.player2_name.as_str()),
        id_cell(&m.player2_id),
        score_cell(m.player2_score()),
    ]
}

/// Rows ready for export: match fields, sanitized
pub fn match_rows(matches: &[Match]) -> Vec<Vec<Cell>> {
    matches
        .iter()
        .map(|m| {
            let mut row = match_cells(m);
            sanitize_row(&mut row);
            row
        })
        .collect()
}

/// Rows ready for export: match fields plus pre-match ratings and changes,
/// sanitized
pub fn rated_rows(rated: &[RatedMatch]) -> Vec<Vec<Cell>> {
    rated
        .iter()
        .map(|r| {
            let mut row = match_cells(&r.game);
            row.extend([
                Cell::Float(r.rating1),
                Cell::Float(r.delta1),
                Cell::Float(r.rating2),
                Cell::Float(r.delta2),
            ]);
            sanitize_row(&mut row);
            row
        })
        .collect()
}

/// Write a header and rows to any writer. Cells are written as-is.
pub fn write_rows<W: io::Write>(writer: W, header: &[&str], rows: &[Vec<Cell>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().context("Failed to flush table")?;
    Ok(())
}

fn write_rows_to_path(path: &Path, header: &[&str], rows: &[Vec<Cell>]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output CSV {}", path.display()))?;
    write_rows(file, header, rows)
        .with_context(|| format!("Failed to write output CSV {}", path.display()))
}

/// Export matches to a CSV file, creating or overwriting it.
pub fn export_matches(matches: &[Match], path: &Path) -> Result<()> {
    write_rows_to_path(path, &MATCH_HEADER, &match_rows(matches))?;
    log::info!("Exported {} matches to {}", matches.len(), path.display());
    Ok(())
}

/// Export rated matches (match columns plus rating columns) to a CSV file.
pub fn export_rated_matches(rated: &[RatedMatch], path: &Path) -> Result<()> {
    let header: Vec<&str> = MATCH_HEADER.iter().chain(RATING_HEADER.iter()).copied().collect();
    write_rows_to_path(path, &header, &rated_rows(rated))?;
    log::info!(
        "Exported {} rated matches to {}",
        rated.len(),
        path.display()
    );
    Ok(())
}

/// One row of a match table, as read back from disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchTableRow {
    #[serde(rename = "Player 1 Name")]
    pub player1_name: String,
    #[serde(rename = "Player 1 ID")]
    pub player1_id: String,
    #[serde(rename = "Player 1 Score")]
    pub player1_score: String,
    #[serde(rename = "Player 2 Name")]
    pub player2_name: String,
    #[serde(rename = "Player 2 ID")]
    pub player2_id: String,
    #[serde(rename = "Player 2 Score")]
    pub player2_score: String,
}

impl MatchTableRow {
    pub fn score(&self) -> MatchScore {
        MatchScore::from_fields(&self.player1_score, &self.player2_score)
    }

    /// Rebuild a match. The table carries no round identifier, so the row
    /// position is used in its place.
    pub fn to_match(&self, round_identifier: &str) -> Match {
        Match {
            round_identifier: round_identifier.to_string(),
            player1_name: self.player1_name.clone(),
            player1_id: EntrantId::from_field(&self.player1_id),
            player2_name: self.player2_name.clone(),
            player2_id: EntrantId::from_field(&self.player2_id),
            score: self.score(),
        }
    }
}

impl From<&Match> for MatchTableRow {
    fn from(m: &Match) -> Self {
        let cells: Vec<String> = match_cells(m).iter().map(Cell::to_string).collect();
        Self {
            player1_name: cells[0].clone(),
            player1_id: cells[1].clone(),
            player1_score: cells[2].clone(),
            player2_name: cells[3].clone(),
            player2_id: cells[4].clone(),
            player2_score: cells[5].clone(),
        }
    }
}

/// Read a match table written by [`export_matches`].
pub fn read_match_table(path: &Path) -> Result<Vec<MatchTableRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open match table {}", path.display()))?;
    let headers = reader.headers()?.clone();
    if headers.iter().take(MATCH_HEADER.len()).ne(MATCH_HEADER.iter().copied()) {
        return Err(anyhow::anyhow!(
            "{} is not a match table (unexpected header)",
            path.display()
        ));
    }
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read match table rows")
}
