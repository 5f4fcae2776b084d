//! Spreadsheet (xlsx) export
//!
//! Produces a workbook with a Summary sheet describing the tournament, a
//! Matches sheet with the fixed match columns and, when ratings were
//! computed, Rated Matches and Ratings sheets.

use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::normalize::Match;
use crate::ratings::{RatedMatch, RatingBook};
use crate::sanitize::{sanitize, Cell};
use crate::table::{match_rows, rated_rows, MATCH_HEADER, RATING_HEADER};

/// Whether a tournament was played online or at a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentType {
    Online,
    Offline,
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentType::Online => f.write_str("Online"),
            TournamentType::Offline => f.write_str("Offline"),
        }
    }
}

impl FromStr for TournamentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(TournamentType::Online),
            "offline" => Ok(TournamentType::Offline),
            other => Err(format!(
                "Unknown tournament type '{}' (expected online or offline)",
                other
            )),
        }
    }
}

/// Descriptive fields shown on the Summary sheet
#[derive(Debug, Clone)]
pub struct TournamentInfo {
    pub name: String,
    pub url: String,
    pub kind: TournamentType,
}

/// Matches of one pool, in export order
#[derive(Debug, Clone)]
pub struct PoolMatches {
    pub pool: String,
    pub matches: Vec<Match>,
}

/// Everything that goes into one workbook
pub struct WorkbookContent<'a> {
    pub info: &'a TournamentInfo,
    pub pools: &'a [PoolMatches],
    pub rated: &'a [RatedMatch],
    pub ratings: Option<&'a RatingBook>,
}

/// Write a cell. Numeric cells are sanitized first.
fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match sanitize(cell.clone()) {
        Cell::Text(s) => sheet.write_string(row, col, s)?,
        Cell::Integer(n) => sheet.write_number(row, col, n as f64)?,
        Cell::Float(x) => sheet.write_number(row, col, x)?,
        Cell::Unknown => sheet.write_string(row, col, cell.to_string())?,
    };
    Ok(())
}

fn write_table(
    sheet: &mut Worksheet,
    header: &[&str],
    rows: &[Vec<Cell>],
    header_fmt: &Format,
) -> Result<()> {
    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header_fmt)?;
        sheet.set_column_width(col as u16, 18)?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, i as u32 + 1, col as u16, cell)?;
        }
    }
    sheet.set_freeze_panes(1, 0)?;
    if !rows.is_empty() {
        sheet.autofilter(0, 0, rows.len() as u32, header.len() as u16 - 1)?;
    }
    Ok(())
}

/// Build and save the workbook, creating the output directory if needed.
///
/// Returns a summary string on success.
pub fn write_workbook(content: &WorkbookContent<'_>, output: &Path) -> Result<String> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let all_matches: Vec<Match> = content
        .pools
        .iter()
        .flat_map(|p| p.matches.iter().cloned())
        .collect();

    // -- Summary --
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
        let fields: [(&str, Cell); 6] = [
            ("Tournament", Cell::text(content.info.name.as_str())),
            ("URL", Cell::text(content.info.url.as_str())),
            ("Type", Cell::text(content.info.kind.to_string())),
            ("Matches", Cell::Integer(all_matches.len() as i64)),
            ("Rated Matches", Cell::Integer(content.rated.len() as i64)),
            ("Generated", Cell::text(generated)),
        ];
        for (row, (label, value)) in fields.iter().enumerate() {
            sheet.write_string_with_format(row as u32, 0, *label, &bold)?;
            write_cell(sheet, row as u32, 1, value)?;
        }

        let pools_row = fields.len() as u32 + 1;
        sheet.write_string_with_format(pools_row, 0, "Pool", &bold)?;
        sheet.write_string_with_format(pools_row, 1, "Matches", &bold)?;
        for (i, pool) in content.pools.iter().enumerate() {
            let row = pools_row + 1 + i as u32;
            sheet.write_string(row, 0, pool.pool.as_str())?;
            sheet.write_number(row, 1, pool.matches.len() as f64)?;
        }
        sheet.set_column_width(0, 16)?;
        sheet.set_column_width(1, 50)?;
    }

    // -- Matches --
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_table(sheet, &MATCH_HEADER, &match_rows(&all_matches), &bold)?;
    }

    if !content.rated.is_empty() {
        let header: Vec<&str> = MATCH_HEADER.iter().chain(RATING_HEADER.iter()).copied().collect();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rated Matches")?;
        write_table(sheet, &header, &rated_rows(content.rated), &bold)?;
    }

    if let Some(book) = content.ratings {
        let rows: Vec<Vec<Cell>> = book
            .leaderboard()
            .into_iter()
            .map(|(id, entry)| {
                vec![
                    Cell::text(id.to_string()),
                    Cell::text(entry.name.as_str()),
                    Cell::Float(entry.rating),
                    Cell::from(entry.matches),
                ]
            })
            .collect();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Ratings")?;
        write_table(
            sheet,
            &["Player ID", "Player Name", "Rating", "Matches"],
            &rows,
            &bold,
        )?;
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    workbook
        .save(output)
        .map_err(|e| anyhow::anyhow!("Failed to save workbook: {}", e))?;

    let mut summary = format!(
        "Workbook created: {}\n  Pools: {}\n  Matches: {}",
        output.display(),
        content.pools.len(),
        all_matches.len(),
    );
    if !content.rated.is_empty() {
        summary.push_str(&format!("\n  Rated matches: {}", content.rated.len()));
    }
    Ok(summary)
}
