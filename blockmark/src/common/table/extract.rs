//! Document-level table extraction.
//!
//! Splits a Markdown document into literal spans and parsed tables without
//! going through a full Markdown parser. Only lines that start with `|` are
//! considered as table starts.

use super::grammar::{line_end, next_line_start, parse_delimiters, parse_table_row};
use super::{normalize_width, Alignment};
use serde::Serialize;

/// A table recognised by [`extract_tables_from_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTable<'a> {
    pub headers: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
    /// The exact source span of the table, including its final line break.
    pub source: &'a str,
}

/// One piece of a scanned document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentSegment<'a> {
    Literal { text: &'a str },
    Table(ExtractedTable<'a>),
}

impl<'a> DocumentSegment<'a> {
    /// The source text this segment covers.
    pub fn source(&self) -> &'a str {
        match self {
            DocumentSegment::Literal { text } => text,
            DocumentSegment::Table(table) => table.source,
        }
    }
}

/// Lazily split `markdown` into literal and table segments.
///
/// The iterator does at most one line of work past the segment it returns,
/// and concatenating [`DocumentSegment::source`] of every segment yields the
/// input unchanged. Empty literal spans are never emitted.
pub fn extract_tables_from_document(markdown: &str) -> TableSegments<'_> {
    TableSegments {
        text: markdown,
        pos: 0,
        literal_start: 0,
        queued: None,
    }
}

/// Iterator returned by [`extract_tables_from_document`].
#[derive(Debug)]
pub struct TableSegments<'a> {
    text: &'a str,
    pos: usize,
    literal_start: usize,
    queued: Option<ExtractedTable<'a>>,
}

impl<'a> TableSegments<'a> {
    fn table_at(&self, start: usize) -> Option<ExtractedTable<'a>> {
        let text = self.text;
        let header = parse_table_row(text, start)?;

        let delimiter_start = next_line_start(text, header.end);
        if delimiter_start == header.end {
            return None;
        }
        let delimiters = parse_delimiters(text, delimiter_start)?;
        if delimiters.alignments.len() != header.cells.len() {
            return None;
        }

        let columns = header.cells.len();
        let mut rows = Vec::new();
        let mut end = next_line_start(text, delimiters.end);
        while end < text.len() {
            let Some(row) = parse_table_row(text, end) else {
                break;
            };
            rows.push(normalize_width(row.cells, columns));
            end = next_line_start(text, row.end);
        }

        Some(ExtractedTable {
            headers: header.cells,
            alignments: delimiters.alignments,
            rows,
            source: &text[start..end],
        })
    }
}

impl<'a> Iterator for TableSegments<'a> {
    type Item = DocumentSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(table) = self.queued.take() {
            return Some(DocumentSegment::Table(table));
        }

        let text = self.text;
        while self.pos < text.len() {
            let line_start = self.pos;
            if text.as_bytes()[line_start] == b'|' {
                if let Some(table) = self.table_at(line_start) {
                    let literal = &text[self.literal_start..line_start];
                    let table_end = line_start + table.source.len();
                    self.pos = table_end;
                    self.literal_start = table_end;

                    if literal.is_empty() {
                        return Some(DocumentSegment::Table(table));
                    }
                    self.queued = Some(table);
                    return Some(DocumentSegment::Literal { text: literal });
                }
            }
            self.pos = next_line_start(text, line_end(text, line_start));
        }

        if self.literal_start < text.len() {
            let literal = &text[self.literal_start..];
            self.literal_start = text.len();
            return Some(DocumentSegment::Literal { text: literal });
        }
        None
    }
}
