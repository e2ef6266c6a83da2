use blockmark::blocks::nodes::{PARAGRAPH, TABLE};
use blockmark::blocks::{CellTag, TableCell, TableContent};
use blockmark::format::Format;
use blockmark::formats::MarkdownFormat;
use blockmark::{blocks_to_markdown, markdown_to_blocks, Alignment};
use insta::assert_snapshot;

fn table_content(md: &str) -> TableContent {
    let blocks = markdown_to_blocks(md);
    let table = blocks
        .iter()
        .find(|block| block.name == TABLE)
        .expect("Should have table");
    TableContent::from_block(table)
}

#[test]
fn test_table_round_trip() {
    let md = r#"| Header 1 | Header 2 |
| :--- | :---: |
| Cell 1 | Cell 2 |
| Cell 3 | Cell 4 |
"#;

    let format = MarkdownFormat::default();
    let blocks = format.parse(md).expect("Failed to parse markdown");
    let output = format
        .serialize(&blocks)
        .expect("Failed to serialize markdown");

    assert_snapshot!(output, @r###"
    | Header 1 | Header 2 |
    | :------- | :------: |
    | Cell 1   | Cell 2   |
    | Cell 3   | Cell 4   |
    "###);
}

#[test]
fn test_table_alignment_import() {
    let content = table_content(
        "| Left | Center | Right | None |\n| :--- | :----: | ----: | ---- |\n| L | C | R | N |\n",
    );

    let aligns: Vec<Alignment> = content.head[0].iter().map(TableCell::alignment).collect();
    assert_eq!(
        aligns,
        vec![
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::None
        ]
    );
    assert!(content.head[0].iter().all(|cell| cell.tag == CellTag::Th));
    assert!(content.body[0].iter().all(|cell| cell.tag == CellTag::Td));
    assert_eq!(content.body[0][2].alignment(), Alignment::Right);
}

#[test]
fn test_header_only_table() {
    let content = table_content("| A | B |\n| - | - |\n");
    assert_eq!(content.head.len(), 1);
    assert!(content.body.is_empty());

    let out = blocks_to_markdown(&[content.clone().into_block()]).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert_eq!(table_content(&out), content);
}

#[test]
fn test_inline_formatting_in_cells() {
    let content = table_content("| a | b |\n|---|---|\n| **bold** | `x\\|y` |\n");
    assert_eq!(content.body[0][0].content, "<strong>bold</strong>");
    assert_eq!(content.body[0][1].content, "<code>x|y</code>");
}

#[test]
fn test_link_pipes_split_cells_unless_escaped() {
    let content = table_content("| a | b |\n|---|---|\n| [x\\|y](u) | z |\n");
    assert_eq!(content.body[0][0].content, "<a href=\"u\">x|y</a>");
    assert_eq!(content.body[0][1].content, "z");
}

#[test]
fn test_ragged_rows_are_normalized() {
    let content = table_content("| a | b |\n|---|---|\n| 1 |\n| 1 | 2 | 3 |\n");
    assert_eq!(content.body.len(), 2);
    assert_eq!(content.body[0].len(), 2);
    assert_eq!(content.body[0][1].content, "");
    assert_eq!(content.body[1].len(), 2);
}

#[test]
fn test_mismatched_delimiter_is_not_a_table() {
    let blocks = markdown_to_blocks("| a | b |\n| --- |\n");
    assert!(blocks.iter().all(|block| block.name != TABLE));
    assert_eq!(blocks[0].name, PARAGRAPH);
}

#[test]
fn test_table_ends_at_first_non_row() {
    let blocks = markdown_to_blocks("| a |\n|---|\n| 1 |\nplain text\n");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].name, TABLE);
    assert_eq!(blocks[1].content(), "plain text");
}

#[test]
fn test_cell_pipes_are_escaped_on_export() {
    let content = TableContent {
        head: vec![vec![TableCell::new("a|b", CellTag::Th, Alignment::None)]],
        body: vec![],
    };
    let out = blocks_to_markdown(&[content.clone().into_block()]).unwrap();
    assert_eq!(out, "| a\\|b |\n| ---- |\n");
    assert_eq!(table_content(&out), content);
}
