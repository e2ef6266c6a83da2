//! Tests for the standalone table grammar and the document-level extractor.

use blockmark::{
    extract_tables_from_document, parse_delimiters, parse_table_row, Alignment, DocumentSegment,
};
use proptest::prelude::*;

fn cells(text: &str) -> Option<Vec<String>> {
    parse_table_row(text, 0).map(|row| row.cells)
}

/// Write cells back as a row, escaping what the grammar would otherwise read
/// as syntax.
fn join_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|cell| cell.replace('\\', "\\\\").replace('|', "\\|"))
        .collect();
    format!("| {} |", escaped.join(" | "))
}

#[test]
fn test_escaped_pipes_stay_in_the_cell() {
    assert_eq!(
        cells("|le\\|ft|right|"),
        Some(vec!["le|ft".to_string(), "right".to_string()])
    );
}

#[test]
fn test_indented_rows_fail() {
    assert_eq!(cells("   | -- -- | ---- |"), None);
    assert_eq!(cells(" a | b"), None);
}

#[test]
fn test_rows_need_a_pipe() {
    assert_eq!(cells("just text"), None);
    assert_eq!(cells("a | b"), Some(vec!["a".to_string(), "b".to_string()]));
}

#[test]
fn test_offsets_past_the_end_fail() {
    assert!(parse_table_row("| a |", 5).is_none());
    assert!(parse_table_row("| a |", 50).is_none());
    assert!(parse_delimiters("|---|", 9).is_none());
}

#[test]
fn test_row_end_offset_points_at_the_line_break() {
    let text = "| a |\n| b |\n";
    let first = parse_table_row(text, 0).unwrap();
    assert_eq!(first.end, 5);
    let second = parse_table_row(text, first.end + 1).unwrap();
    assert_eq!(second.cells, vec!["b"]);
}

#[test]
fn test_delimiter_alignments() {
    let row = parse_delimiters(":----:|:----|----:|-----", 0).unwrap();
    assert_eq!(
        row.alignments,
        vec![
            Alignment::Center,
            Alignment::Left,
            Alignment::Right,
            Alignment::None
        ]
    );
}

#[test]
fn test_delimiter_pipe_combinations() {
    for text in ["| --- | --- |", "| --- | ---", "--- | --- |", "---|---"] {
        let row = parse_delimiters(text, 0).unwrap_or_else(|| panic!("{text:?} should parse"));
        assert_eq!(row.alignments.len(), 2, "{text:?}");
    }
}

#[test]
fn test_delimiter_rejections() {
    assert!(parse_delimiters(":", 0).is_none());
    assert!(parse_delimiters("::", 0).is_none());
    assert!(parse_delimiters("| --- | --- ||", 0).is_none());
    assert!(parse_delimiters("| --- | -x- |", 0).is_none());
    assert!(parse_delimiters("  --- | --- |", 0).is_none());
    assert!(parse_delimiters("  | --- | --- |", 0).is_some());
}

#[test]
fn test_extract_text_table_text() {
    let doc = "Some intro.\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\nAnd after.\n";
    let segments: Vec<_> = extract_tables_from_document(doc).collect();

    assert_eq!(segments.len(), 3);
    assert!(matches!(segments[0], DocumentSegment::Literal { .. }));
    assert!(matches!(segments[2], DocumentSegment::Literal { .. }));
    let DocumentSegment::Table(table) = &segments[1] else {
        panic!("expected a table segment, got {:?}", segments[1]);
    };
    assert_eq!(table.headers, vec!["a", "b"]);
    assert_eq!(table.rows, vec![vec!["1", "2"]]);

    let rebuilt: String = segments.iter().map(DocumentSegment::source).collect();
    assert_eq!(rebuilt, doc);
}

#[test]
fn test_extract_stops_at_ragged_row() {
    let doc = "| a | b |\n| - | - |\n| 1 | 2 |\n  | 3 | 4 |\n| 5 | 6 |\n";
    let segments: Vec<_> = extract_tables_from_document(doc).collect();

    let DocumentSegment::Table(table) = &segments[0] else {
        panic!("expected a table first");
    };
    assert_eq!(table.rows.len(), 1);
    match &segments[1] {
        DocumentSegment::Literal { text } => assert!(text.starts_with("  | 3 | 4 |")),
        other => panic!("expected literal text, got {other:?}"),
    }
}

#[test]
fn test_extract_is_lazy() {
    let doc = "| a |\n| - |\n\ntext\n\n| b |\n| - |\n";
    let mut segments = extract_tables_from_document(doc);
    let first = segments.next().unwrap();
    assert!(matches!(first, DocumentSegment::Table(_)));
    assert_eq!(segments.count(), 2);
}

#[test]
fn test_extract_serializes_segments() {
    let doc = "x\n| a |\n| :-: |\n";
    let json: Vec<_> = extract_tables_from_document(doc)
        .map(|segment| serde_json::to_value(segment).unwrap())
        .collect();
    assert_eq!(json[0]["kind"], "literal");
    assert_eq!(json[1]["kind"], "table");
    assert_eq!(json[1]["alignments"][0], "center");
}

proptest! {
    #[test]
    fn prop_row_cells_survive_rejoining(line in "[a-z |\\\\]{1,24}") {
        if let Some(row) = parse_table_row(&line, 0) {
            let rejoined = join_row(&row.cells);
            prop_assert_eq!(cells(&rejoined), Some(row.cells));
        }
    }

    #[test]
    fn prop_written_cells_parse_back(
        written in prop::collection::vec("[a-z0-9_*|\\\\]{0,6}", 1..5)
    ) {
        let expected: Vec<String> = written.iter().map(|c| c.trim().to_string()).collect();
        prop_assert_eq!(cells(&join_row(&expected)), Some(expected));
    }
}
