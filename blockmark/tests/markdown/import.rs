//! Import tests for Markdown format (Markdown → blocks)
//!
//! These tests parse Markdown and check the resulting block tree, mostly as
//! the JSON the `blocks` format writes.

use blockmark::blocks::nodes::{
    CODE, HTML, LIST, LIST_ITEM, PARAGRAPH, QUOTE, SEPARATOR, TABLE,
};
use blockmark::format::Format;
use blockmark::formats::{BlocksFormat, MarkdownFormat};
use blockmark::{markdown_to_blocks, markdown_to_blocks_with_options, Block, ConvertOptions};
use insta::assert_snapshot;

/// Helper to parse Markdown and print the tree as JSON
fn md_to_json(md: &str) -> String {
    let blocks = MarkdownFormat::default()
        .parse(md)
        .expect("Should parse markdown");
    BlocksFormat::default()
        .serialize(&blocks)
        .expect("Should serialize blocks")
}

#[test]
fn test_heading_and_paragraph() {
    assert_snapshot!(md_to_json("# Title\n\nHello *world* and **you**.\n"), @r###"
    [
      {
        "name": "heading",
        "attributes": {
          "level": 1,
          "content": "Title"
        }
      },
      {
        "name": "paragraph",
        "attributes": {
          "content": "Hello <em>world</em> and <strong>you</strong>."
        }
      }
    ]
    "###);
}

#[test]
fn test_nested_list() {
    assert_snapshot!(md_to_json("2. first\n   - inner\n3. second\n"), @r###"
    [
      {
        "name": "list",
        "attributes": {
          "ordered": true,
          "start": 2
        },
        "innerBlocks": [
          {
            "name": "list-item",
            "attributes": {
              "content": "first"
            },
            "innerBlocks": [
              {
                "name": "list",
                "attributes": {
                  "ordered": false
                },
                "innerBlocks": [
                  {
                    "name": "list-item",
                    "attributes": {
                      "content": "inner"
                    }
                  }
                ]
              }
            ]
          },
          {
            "name": "list-item",
            "attributes": {
              "content": "second"
            }
          }
        ]
      }
    ]
    "###);
}

#[test]
fn test_image_paragraph() {
    assert_snapshot!(md_to_json("![Logo](logo.png \"Our logo\")\n"), @r###"
    [
      {
        "name": "image",
        "attributes": {
          "url": "logo.png",
          "alt": "Logo",
          "caption": "Our logo"
        }
      }
    ]
    "###);
}

#[test]
fn test_quote_children_are_walked() {
    let blocks = markdown_to_blocks("> para\n>\n> - item\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].name, QUOTE);
    let names: Vec<_> = blocks[0].children.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec![PARAGRAPH, LIST]);
    assert_eq!(blocks[0].children[1].children[0].name, LIST_ITEM);
}

#[test]
fn test_code_block_content() {
    let blocks = markdown_to_blocks("~~~python\nprint(\"<hi>\")\n\n~~~\n");
    assert_eq!(
        blocks,
        vec![Block::new(CODE)
            .with_attr("language", "python")
            .with_attr("content", "print(&quot;&lt;hi&gt;&quot;)<br>")]
    );
}

#[test]
fn test_indented_code_has_no_language() {
    let blocks = markdown_to_blocks("    let x = 1;\n");
    assert_eq!(blocks[0].name, CODE);
    assert!(blocks[0].attr("language").is_none());
    assert_eq!(blocks[0].content(), "let x = 1;");
}

#[test]
fn test_html_block_is_unescaped() {
    let blocks = markdown_to_blocks("<!-- note -->\n\nafter\n");
    assert_eq!(blocks[0].name, HTML);
    assert_eq!(blocks[0].content(), "<!-- note -->");
    assert_eq!(blocks[1].content(), "after");
}

#[test]
fn test_pipe_lines_in_html_comment_stay_html() {
    let blocks = markdown_to_blocks("<!--\n| a | b |\n|---|---|\n-->\n");
    assert_eq!(
        blocks,
        vec![Block::new(HTML).with_attr("content", "<!--\n| a | b |\n|---|---|\n-->")]
    );
}

#[test]
fn test_pipe_lines_in_html_div_stay_html() {
    let blocks = markdown_to_blocks("<div>\n| a |\n|---|\n</div>\n\n| b |\n|---|\n");
    let names: Vec<_> = blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec![HTML, TABLE]);
    assert_eq!(blocks[0].content(), "<div>\n| a |\n|---|\n</div>");
}

#[test]
fn test_table_inside_quote() {
    let blocks = markdown_to_blocks("> intro\n>\n> | h |\n> |---|\n> | v |\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].name, QUOTE);
    let names: Vec<_> = blocks[0].children.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec![PARAGRAPH, TABLE]);
}

#[test]
fn test_table_inside_list_item() {
    let blocks = markdown_to_blocks("- item\n  | h |\n  |---|\n  | v |\n- next\n");
    let list = &blocks[0];
    assert_eq!(list.name, LIST);
    assert_eq!(list.children.len(), 2);
    assert_eq!(list.children[0].content(), "item");
    let names: Vec<_> = list.children[0].children.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec![TABLE]);
    assert!(list.children[1].children.is_empty());
}

#[test]
fn test_separators() {
    let blocks = markdown_to_blocks("a\n\n---\n\n___\n");
    assert_eq!(blocks[1], Block::new(SEPARATOR));
    assert_eq!(blocks[2], Block::new(SEPARATOR));
}

#[test]
fn test_inline_html_is_escaped_text() {
    let blocks = markdown_to_blocks("press <kbd>Ctrl</kbd>\n");
    assert_eq!(
        blocks[0].content(),
        "press &lt;kbd&gt;Ctrl&lt;/kbd&gt;"
    );
}

#[test]
fn test_link_with_title() {
    let blocks = markdown_to_blocks("[docs](https://example.com/docs \"Read me\")\n");
    assert_eq!(
        blocks[0].content(),
        "<a href=\"https://example.com/docs\" title=\"Read me\">docs</a>"
    );
}

#[test]
fn test_custom_opaque_language() {
    let options = ConvertOptions::default().with_opaque_language("wp-block");
    let md = "```wp-block\n{\"name\":\"core/spacer\",\"attributes\":{\"height\":\"40px\"}}\n```\n";
    let blocks = markdown_to_blocks_with_options(md, &options);
    assert_eq!(
        blocks,
        vec![Block::new("core/spacer").with_attr("height", "40px")]
    );

    // With the default language the same fence is just code.
    assert_eq!(markdown_to_blocks(md)[0].name, CODE);
}

#[test]
fn test_empty_document() {
    assert!(markdown_to_blocks("").is_empty());
    assert!(markdown_to_blocks("\n\n").is_empty());
}
