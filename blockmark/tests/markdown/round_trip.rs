//! Round trips through Markdown.
//!
//! Serializing a tree, parsing the output and serializing again must give the
//! same Markdown. Trees here are built the way the parser builds them, so the
//! second pass has nothing left to normalize.

use blockmark::blocks::nodes::{
    CODE, HEADING, HTML, IMAGE, LIST, LIST_ITEM, PARAGRAPH, QUOTE, SEPARATOR,
};
use blockmark::blocks::{CellTag, TableCell, TableContent};
use blockmark::{blocks_to_markdown, markdown_to_blocks, Alignment, Block};
use proptest::prelude::*;

fn paragraph(content: &str) -> Block {
    Block::new(PARAGRAPH).with_attr("content", content)
}

fn item(content: &str) -> Block {
    Block::new(LIST_ITEM).with_attr("content", content)
}

fn assert_idempotent(blocks: &[Block]) {
    let first = blocks_to_markdown(blocks).unwrap();
    let reparsed = markdown_to_blocks(&first);
    let second = blocks_to_markdown(&reparsed).unwrap();
    assert_eq!(first, second, "markdown changed on the second pass");
}

fn kitchen_sink() -> Vec<Block> {
    vec![
        Block::new(HEADING)
            .with_attr("level", 2)
            .with_attr("content", "Setup <strong>guide</strong>"),
        paragraph("Call <code>add_action( 'admin_notices', ... )</code> from a_plugin*.<br>Then reload."),
        Block::new(LIST)
            .with_attr("ordered", true)
            .with_attr("start", 4)
            .with_children(vec![
                item("install"),
                item("configure").with_children(vec![Block::new(LIST)
                    .with_attr("ordered", false)
                    .with_children(vec![item("<em>nested</em>"), item("more")])]),
                item("run"),
            ]),
        Block::new(QUOTE).with_children(vec![
            paragraph("quoted"),
            Block::new(LIST)
                .with_attr("ordered", false)
                .with_children(vec![item("inside")]),
        ]),
        Block::new(CODE)
            .with_attr("language", "php")
            .with_attr("content", "&lt;?php<br>echo 1;<br>"),
        Block::new(IMAGE)
            .with_attr("url", "a.png")
            .with_attr("alt", "An <em>image</em>"),
        Block::new(HTML).with_attr("content", "<div class=\"note\">\n  hi\n</div>"),
        TableContent {
            head: vec![vec![
                TableCell::new("Key", CellTag::Th, Alignment::Left),
                TableCell::new("Value", CellTag::Th, Alignment::Right),
            ]],
            body: vec![vec![
                TableCell::new("<code>a|b</code>", CellTag::Td, Alignment::Left),
                TableCell::new("1", CellTag::Td, Alignment::Right),
            ]],
        }
        .into_block(),
        Block::new(SEPARATOR),
        paragraph("done"),
    ]
}

#[test]
fn test_kitchen_sink_is_idempotent() {
    assert_idempotent(&kitchen_sink());
}

#[test]
fn test_kitchen_sink_tree_survives() {
    let blocks = kitchen_sink();
    let reparsed = markdown_to_blocks(&blocks_to_markdown(&blocks).unwrap());
    assert_eq!(reparsed, blocks);
}

#[test]
fn test_opaque_blocks_round_trip() {
    let gallery = Block::new("core/gallery")
        .with_attr("columns", 3)
        .with_attr("linkTo", "none")
        .with_children(vec![Block::new(IMAGE).with_attr("url", "1.jpg")]);
    let blocks = vec![paragraph("before"), gallery, paragraph("after")];

    let reparsed = markdown_to_blocks(&blocks_to_markdown(&blocks).unwrap());
    assert_eq!(reparsed, blocks);
}

#[test]
fn test_quote_round_trip() {
    let blocks = vec![Block::new(QUOTE).with_children(vec![paragraph("a single paragraph")])];
    let out = blocks_to_markdown(&blocks).unwrap();
    assert_eq!(out, "> a single paragraph\n> \n");
    assert_eq!(markdown_to_blocks(&out), blocks);
}

fn small_table() -> Block {
    TableContent {
        head: vec![vec![TableCell::new("h", CellTag::Th, Alignment::None)]],
        body: vec![vec![TableCell::new("v", CellTag::Td, Alignment::None)]],
    }
    .into_block()
}

#[test]
fn test_table_in_quote_round_trip() {
    let blocks = vec![Block::new(QUOTE).with_children(vec![paragraph("see"), small_table()])];
    let out = blocks_to_markdown(&blocks).unwrap();
    assert_eq!(out, "> see\n> \n> | h   |\n> | --- |\n> | v   |\n> \n");
    assert_eq!(markdown_to_blocks(&out), blocks);
    assert_idempotent(&blocks);
}

#[test]
fn test_table_in_list_item_round_trip() {
    let blocks = vec![Block::new(LIST)
        .with_attr("ordered", false)
        .with_children(vec![item("x").with_children(vec![small_table()]), item("y")])];
    let out = blocks_to_markdown(&blocks).unwrap();
    assert_eq!(out, "- x\n  | h   |\n  | --- |\n  | v   |\n- y\n");
    assert_eq!(markdown_to_blocks(&out), blocks);
}

#[test]
fn test_html_with_pipe_lines_round_trip() {
    let blocks = vec![
        Block::new(HTML).with_attr("content", "<!--\n| a | b |\n|---|---|\n-->"),
        paragraph("after"),
    ];
    let out = blocks_to_markdown(&blocks).unwrap();
    assert_eq!(markdown_to_blocks(&out), blocks);
}

#[test]
fn test_code_with_trailing_blank_line_round_trip() {
    let blocks = vec![Block::new(CODE).with_attr("content", "x = 1<br>")];
    let out = blocks_to_markdown(&blocks).unwrap();
    assert_eq!(markdown_to_blocks(&out), blocks);
}

#[test]
fn test_markdown_source_round_trip() {
    let md = "# Title\n\nSome *text* with `code`.\n\n- a\n- b\n  1. c\n\n> q\n> \n\n| h   |\n| --- |\n| v   |\n";
    assert_eq!(blocks_to_markdown(&markdown_to_blocks(md)).unwrap(), md);
}

proptest! {
    #[test]
    fn prop_plain_paragraphs_are_stable(text in "[a-zA-Z0-9_` ]{1,40}") {
        let md = format!("{text}\n");
        let first = blocks_to_markdown(&markdown_to_blocks(&md)).unwrap();
        let second = blocks_to_markdown(&markdown_to_blocks(&first)).unwrap();
        prop_assert_eq!(first, second);
    }
}
