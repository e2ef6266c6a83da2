//! GitHub-flavoured Markdown pipe tables.
//!
//! The grammar lives in [`grammar`] and works on a single line at a byte
//! offset inside a larger string, so the same code serves the standalone
//! document scanner in [`extract`] and the block-parser extension in
//! `formats::markdown::table_extension`.
//!
//! Ambiguous inputs follow what GitHub's renderer does:
//!
//! - an escaped pipe is cell content, never a boundary;
//! - a row that starts with a space is never a table row;
//! - a delimiter cell needs at least one hyphen, colons are optional on either side;
//! - a header and delimiter row with different cell counts is not a table.

pub mod extract;
pub mod grammar;

use serde::{Deserialize, Serialize};

pub use extract::{extract_tables_from_document, DocumentSegment, ExtractedTable, TableSegments};
pub use grammar::{parse_delimiters, parse_table_row};

/// Column alignment declared by a delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    #[default]
    None,
}

impl Alignment {
    pub(crate) fn from_flags(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::None => "none",
        }
    }
}

/// A parsed table row: trimmed cells plus the offset just past the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub end: usize,
}

/// A parsed delimiter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRow {
    pub alignments: Vec<Alignment>,
    pub end: usize,
}

/// Pad or truncate `cells` to exactly `columns` entries.
pub(crate) fn normalize_width(mut cells: Vec<String>, columns: usize) -> Vec<String> {
    cells.resize(columns, String::new());
    cells
}
