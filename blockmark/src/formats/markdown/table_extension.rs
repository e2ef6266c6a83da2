//! GFM tables as a [`BlockExtension`].
//!
//! The header row is consumed before its alignments are known. If the next
//! line is not a matching delimiter row the header line is handed back to the
//! host, which then reads it as paragraph text. Once the delimiter row is
//! accepted every following line that parses as a row becomes a body row; the
//! first line that doesn't ends the table.
//!
//! Cell text is passed to the host with only `\|` resolved, so inline
//! formatting (including escapes) is left for comrak's inline parser, which
//! runs after cell boundaries are fixed.

use super::host::{BlockExtension, Continuation, ExtensionNode, ExtensionNodeKind};
use crate::common::table::grammar::{parse_delimiters, scan_row, EscapeMode};
use crate::common::table::{normalize_width, Alignment};
use std::mem;

#[derive(Debug, Default)]
enum TableState {
    #[default]
    Idle,
    Header {
        line: String,
        cells: Vec<String>,
    },
    Body {
        header: Vec<String>,
        alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
}

/// Block extension recognising pipe tables.
#[derive(Debug, Default)]
pub struct TableExtension {
    state: TableState,
}

impl TableExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockExtension for TableExtension {
    fn name(&self) -> &str {
        "table"
    }

    fn might_start(&self, line: &str) -> bool {
        line.starts_with('|')
    }

    fn start(&mut self, line: &str) -> bool {
        match scan_row(line, 0, EscapeMode::PipesOnly) {
            Some(row) => {
                self.state = TableState::Header {
                    line: line.to_string(),
                    cells: row.cells,
                };
                true
            }
            None => false,
        }
    }

    fn continue_line(&mut self, line: &str) -> Continuation {
        match mem::take(&mut self.state) {
            TableState::Header {
                line: header_line,
                cells,
            } => match parse_delimiters(line, 0) {
                Some(delimiters) if delimiters.alignments.len() == cells.len() => {
                    self.state = TableState::Body {
                        header: cells,
                        alignments: delimiters.alignments,
                        rows: Vec::new(),
                    };
                    Continuation::Matched
                }
                _ => Continuation::Reinterpret(vec![header_line]),
            },
            TableState::Body {
                header,
                alignments,
                mut rows,
            } => {
                let continuation = match scan_row(line, 0, EscapeMode::PipesOnly) {
                    Some(row) => {
                        rows.push(normalize_width(row.cells, header.len()));
                        Continuation::Matched
                    }
                    None => Continuation::Finished,
                };
                self.state = TableState::Body {
                    header,
                    alignments,
                    rows,
                };
                continuation
            }
            TableState::Idle => {
                panic!("table extension was continued without a started table")
            }
        }
    }

    fn end_of_input(&mut self) -> Continuation {
        match mem::take(&mut self.state) {
            TableState::Header { line, .. } => Continuation::Reinterpret(vec![line]),
            state => {
                self.state = state;
                Continuation::Finished
            }
        }
    }

    fn finalize(&mut self) -> Option<ExtensionNode> {
        let TableState::Body {
            header,
            alignments,
            rows,
        } = mem::take(&mut self.state)
        else {
            return None;
        };

        let mut children = Vec::with_capacity(rows.len() + 1);
        children.push(row_node(
            ExtensionNodeKind::HeaderRow,
            ExtensionNodeKind::HeaderCell,
            header,
        ));
        for row in rows {
            children.push(row_node(
                ExtensionNodeKind::BodyRow,
                ExtensionNodeKind::BodyCell,
                row,
            ));
        }
        Some(ExtensionNode::container(
            ExtensionNodeKind::Table { alignments },
            children,
        ))
    }

    fn can_contain(&self, parent: &ExtensionNodeKind, child: &ExtensionNodeKind) -> bool {
        matches!(
            (parent, child),
            (
                ExtensionNodeKind::Table { .. },
                ExtensionNodeKind::HeaderRow | ExtensionNodeKind::BodyRow
            ) | (ExtensionNodeKind::HeaderRow, ExtensionNodeKind::HeaderCell)
                | (ExtensionNodeKind::BodyRow, ExtensionNodeKind::BodyCell)
        )
    }

    fn parses_inlines(&self, kind: &ExtensionNodeKind) -> bool {
        matches!(
            kind,
            ExtensionNodeKind::HeaderCell | ExtensionNodeKind::BodyCell
        )
    }
}

fn row_node(row: ExtensionNodeKind, cell: ExtensionNodeKind, cells: Vec<String>) -> ExtensionNode {
    ExtensionNode::container(
        row,
        cells
            .into_iter()
            .map(|text| ExtensionNode::leaf(cell.clone(), text))
            .collect(),
    )
}
