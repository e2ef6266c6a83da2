//! Export tests for Markdown format (blocks → Markdown)
//!
//! These tests serialize block trees and check the Markdown text, and where it
//! matters, the structure comrak reads back from it.

use blockmark::blocks::nodes::{
    CODE, HEADING, HTML, IMAGE, LIST, LIST_ITEM, PARAGRAPH, QUOTE, SEPARATOR,
};
use blockmark::{blocks_to_markdown, blocks_to_markdown_with_options, Block, ConvertOptions};
use comrak::nodes::NodeValue;
use comrak::{parse_document, Arena, ComrakOptions};
use insta::assert_snapshot;

fn md(blocks: &[Block]) -> String {
    blocks_to_markdown(blocks).expect("Should serialize blocks")
}

fn paragraph(content: &str) -> Block {
    Block::new(PARAGRAPH).with_attr("content", content)
}

fn item(content: &str) -> Block {
    Block::new(LIST_ITEM).with_attr("content", content)
}

#[test]
fn test_kitchen_sink() {
    let blocks = vec![
        Block::new(HEADING)
            .with_attr("level", 1)
            .with_attr("content", "Release <em>notes</em>"),
        paragraph("Fixed <code>parse_row</code> and <a href=\"https://example.com\">docs</a>."),
        Block::new(LIST).with_children(vec![
            item("first"),
            item("second").with_children(vec![Block::new(LIST)
                .with_attr("ordered", true)
                .with_children(vec![item("a"), item("b")])]),
        ]),
        Block::new(QUOTE).with_children(vec![paragraph("quoted")]),
        Block::new(CODE)
            .with_attr("language", "sh")
            .with_attr("content", "make &amp;&amp; make install"),
        Block::new(IMAGE)
            .with_attr("url", "shot.png")
            .with_attr("alt", "Screenshot"),
        Block::new(HTML).with_attr("content", "<details>x</details>"),
        Block::new(SEPARATOR),
        paragraph("The end"),
    ];

    assert_snapshot!(md(&blocks), @r###"
    # Release *notes*

    Fixed `parse_row` and [docs](https://example.com).

    - first
    - second
      1. a
      2. b

    > quoted
    > 

    ```sh
    make && make install
    ```

    ![Screenshot](shot.png)

    <details>x</details>

    ---

    The end
    "###);
}

#[test]
fn test_quote_lines_are_prefixed() {
    let quote = Block::new(QUOTE).with_children(vec![paragraph("one<br>two")]);
    let out = md(&[quote]);
    assert_eq!(out, "> one\n> two\n> \n");
    assert!(out.lines().all(|line| line.starts_with("> ")));
    assert_eq!(out.lines().filter(|line| *line == "> ").count(), 1);
}

#[test]
fn test_ordered_markers_in_order() {
    let list = Block::new(LIST)
        .with_attr("ordered", true)
        .with_attr("start", 1)
        .with_children(vec![item("a"), item("b"), item("c")]);
    assert_eq!(md(&[list]), "1. a\n2. b\n3. c\n");
}

#[test]
fn test_roman_and_alpha_markers() {
    let roman = Block::new(LIST)
        .with_attr("ordered", true)
        .with_attr("type", "I")
        .with_attr("start", 3)
        .with_children(vec![item("c"), item("d")]);
    let alpha = Block::new(LIST)
        .with_attr("ordered", true)
        .with_attr("type", "a")
        .with_attr("start", 26)
        .with_children(vec![item("z"), item("aa")]);
    assert_eq!(md(&[roman, alpha]), "III. c\nIV. d\n\nz. z\naa. aa\n");
}

#[test]
fn test_custom_bullet_marker() {
    let list = Block::new(LIST).with_children(vec![item("x")]);
    let options = ConvertOptions::default().with_bullet_marker('*');
    assert_eq!(
        blocks_to_markdown_with_options(&[list], &options).unwrap(),
        "* x\n"
    );
}

#[test]
fn test_code_keeps_trailing_blank_line() {
    let code = Block::new(CODE).with_attr("content", "line<br>");
    let out = md(&[code]);
    assert_eq!(out, "```\nline\n\n```\n");

    let arena = Arena::new();
    let root = parse_document(&arena, &out, &ComrakOptions::default());
    let node = root.first_child().unwrap();
    match &node.data.borrow().value {
        NodeValue::CodeBlock(block) => assert_eq!(block.literal, "line\n\n"),
        other => panic!("expected a code block, got {other:?}"),
    };
}

#[test]
fn test_emphasis_characters_escaped_outside_code() {
    let out = md(&[
        paragraph("admin_notices* action*"),
        paragraph("<code>admin_notices* action*</code>"),
    ]);
    assert_eq!(
        out,
        "admin\\_notices\\* action\\*\n\n`admin_notices* action*`\n"
    );
}

#[test]
fn test_unknown_blocks_use_a_longer_fence_when_needed() {
    let block = Block::new("core/code-sample").with_attr("snippet", "```rust```");
    let out = md(&[block]);
    assert!(out.starts_with("````block\n"), "{out}");
    assert!(out.ends_with("\n````\n"), "{out}");
}

#[test]
fn test_empty_tree() {
    assert_eq!(md(&[]), "");
}
