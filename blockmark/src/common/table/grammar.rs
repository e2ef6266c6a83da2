//! Row and delimiter-row grammar.
//!
//! Both parsers take the whole text and a byte offset, and stop at the end of
//! the line (`\n`, `\r\n` or end of input). A row that isn't part of a table is
//! an ordinary outcome while scanning a document, so failure is `None`.

use super::{Alignment, AlignmentRow, TableRow};

/// How backslash escapes inside a row are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeMode {
    /// Every `\x` becomes a literal `x`.
    Resolve,
    /// Only `\|` is resolved; other escapes are left for an inline parser.
    PipesOnly,
}

/// Parse a single table row starting at byte offset `at`.
///
/// Cells are trimmed and every backslash escape is resolved. A row must
/// contain at least one `|`; a leading pipe only marks the row start.
pub fn parse_table_row(text: &str, at: usize) -> Option<TableRow> {
    scan_row(text, at, EscapeMode::Resolve)
}

pub(crate) fn scan_row(text: &str, at: usize, mode: EscapeMode) -> Option<TableRow> {
    let bytes = text.as_bytes();
    if at >= bytes.len() || !text.is_char_boundary(at) {
        return None;
    }
    if matches!(bytes[at], b' ' | b'\t') {
        return None;
    }

    let mut pos = at;
    let mut pipes = 0usize;
    let mut cells = Vec::new();
    let mut current = String::new();

    if bytes[pos] == b'|' {
        pipes += 1;
        pos = skip_spaces(bytes, pos + 1);
        if is_line_end(bytes, pos) {
            return None;
        }
    }

    while !is_line_end(bytes, pos) {
        let ch = char_at(text, pos);
        match ch {
            '|' => {
                pipes += 1;
                cells.push(current.trim().to_string());
                current.clear();
                pos = skip_spaces(bytes, pos + 1);
                if is_line_end(bytes, pos) {
                    return finish_row(cells, pos);
                }
                continue;
            }
            '\\' if !is_line_end(bytes, pos + 1) => {
                let escaped = char_at(text, pos + 1);
                if mode == EscapeMode::PipesOnly && escaped != '|' {
                    current.push('\\');
                }
                current.push(escaped);
                pos += 1 + escaped.len_utf8();
                continue;
            }
            _ => current.push(ch),
        }
        pos += ch.len_utf8();
    }

    if pipes == 0 {
        return None;
    }
    cells.push(current.trim().to_string());
    finish_row(cells, pos)
}

fn finish_row(cells: Vec<String>, end: usize) -> Option<TableRow> {
    if cells.is_empty() {
        None
    } else {
        Some(TableRow { cells, end })
    }
}

/// Parse a delimiter row (`| :--- | :---: | ---: |`) starting at `at`.
///
/// Leading spaces are tolerated only in front of a leading pipe; a cell is an
/// optional `:`, one or more `-`, and an optional `:`.
pub fn parse_delimiters(text: &str, at: usize) -> Option<AlignmentRow> {
    let bytes = text.as_bytes();
    if at >= bytes.len() {
        return None;
    }

    let mut pos = skip_spaces(bytes, at);
    let indented = pos > at;
    if pos < bytes.len() && bytes[pos] == b'|' {
        pos = skip_spaces(bytes, pos + 1);
    } else if indented {
        return None;
    }

    let mut alignments = Vec::new();
    loop {
        let mut left = false;
        if pos < bytes.len() && bytes[pos] == b':' {
            left = true;
            pos += 1;
        }

        let hyphens_start = pos;
        while pos < bytes.len() && bytes[pos] == b'-' {
            pos += 1;
        }
        if pos == hyphens_start {
            return None;
        }

        let mut right = false;
        if pos < bytes.len() && bytes[pos] == b':' {
            right = true;
            pos += 1;
        }
        alignments.push(Alignment::from_flags(left, right));

        pos = skip_spaces(bytes, pos);
        if is_line_end(bytes, pos) {
            break;
        }
        if bytes[pos] != b'|' {
            return None;
        }
        pos = skip_spaces(bytes, pos + 1);
        if is_line_end(bytes, pos) {
            break;
        }
    }

    if alignments.is_empty() {
        None
    } else {
        Some(AlignmentRow {
            alignments,
            end: pos,
        })
    }
}

/// Offset of the first byte of the line following the line that ends at `end`.
pub(crate) fn next_line_start(text: &str, end: usize) -> usize {
    let bytes = text.as_bytes();
    match bytes.get(end) {
        Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => end + 2,
        Some(b'\r') | Some(b'\n') => end + 1,
        _ => end.min(bytes.len()),
    }
}

/// Offset of the end of the line containing `at` (the newline or end of text).
pub(crate) fn line_end(text: &str, at: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = at;
    while !is_line_end(bytes, pos) {
        pos += 1;
    }
    pos
}

fn is_line_end(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos) {
        None | Some(b'\n') => true,
        Some(b'\r') => matches!(bytes.get(pos + 1), None | Some(b'\n')),
        _ => false,
    }
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }
    pos
}

fn char_at(text: &str, pos: usize) -> char {
    text[pos..].chars().next().unwrap_or('\0')
}
