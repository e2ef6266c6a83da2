//! Markdown parsing (Markdown → blocks)
//!
//! Pipeline: Markdown string → comrak AST (with the table extension driven by
//! [`HostParser`]) → block tree.
//!
//! Block-level nodes map to one block each. Nodes whose children were already
//! consumed to build the block's attributes (headings, paragraphs, list items,
//! tables) are not walked any further. Inline runs become small HTML fragments
//! stored in `content` attributes.

use super::host::HostParser;
use super::table_extension::TableExtension;
use crate::blocks::nodes::{
    Block, CODE, HEADING, HTML, IMAGE, LIST, LIST_ITEM, PARAGRAPH, QUOTE, SEPARATOR,
};
use crate::blocks::table::{CellTag, TableCell, TableContent};
use crate::common::escape::escape_html;
use crate::common::table::Alignment;
use crate::error::FormatError;
use crate::options::ConvertOptions;
use comrak::nodes::{AstNode, ListType, NodeCodeBlock, NodeLink, NodeValue, TableAlignment};
use comrak::{Arena, ComrakOptions};

/// Parse a Markdown string into a block tree.
///
/// Conversion is best effort: node shapes without a block mapping are logged
/// and skipped, so this only fails if the format layer is asked for something
/// it can't do.
pub fn parse_from_markdown(
    source: &str,
    options: &ConvertOptions,
) -> Result<Vec<Block>, FormatError> {
    Ok(markdown_to_blocks(source, options))
}

/// Infallible core of [`parse_from_markdown`].
pub fn markdown_to_blocks(source: &str, options: &ConvertOptions) -> Vec<Block> {
    let arena = Arena::new();
    let mut host = HostParser::new(default_comrak_options()).with_extension(TableExtension::new());
    let root = host.parse(&arena, source);

    BlockBuilder { options }.children(root)
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    // Tables come from TableExtension only.
    options.extension.table = false;
    options
}

struct BlockBuilder<'o> {
    options: &'o ConvertOptions,
}

impl BlockBuilder<'_> {
    fn children<'a>(&self, node: &'a AstNode<'a>) -> Vec<Block> {
        node.children().filter_map(|child| self.block(child)).collect()
    }

    fn block<'a>(&self, node: &'a AstNode<'a>) -> Option<Block> {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Heading(heading) => Some(
                Block::new(HEADING)
                    .with_attr("level", heading.level)
                    .with_attr("content", inline_run_to_html(node)),
            ),

            NodeValue::Paragraph => Some(match sole_image(node) {
                Some((image, link)) => image_from_paragraph(image, &link),
                None => Block::new(PARAGRAPH).with_attr("content", inline_run_to_html(node)),
            }),

            NodeValue::Image(link) => Some(image_block(node, link)),

            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                let mut block = Block::new(LIST).with_attr("ordered", ordered);
                if ordered && list.start != 1 {
                    block = block.with_attr("start", list.start);
                }
                Some(block.with_children(self.children(node)))
            }

            NodeValue::Item(_) => Some(self.list_item(node)),

            NodeValue::BlockQuote => Some(Block::new(QUOTE).with_children(self.children(node))),

            NodeValue::Table(table) => Some(table_block(node, &table.alignments)),

            NodeValue::ThematicBreak => Some(Block::new(SEPARATOR)),

            NodeValue::CodeBlock(code) => Some(self.code_block(code)),

            NodeValue::HtmlBlock(html) => Some(
                Block::new(HTML).with_attr("content", html.literal.trim_end_matches('\n')),
            ),

            other => {
                log::warn!("no block mapping for markdown node {other:?}; skipped");
                None
            }
        }
    }

    /// A list item's leading paragraph is its content and nested lists are
    /// its children. Nothing else fits the list-item block.
    fn list_item<'a>(&self, node: &'a AstNode<'a>) -> Block {
        let mut content = String::new();
        let mut children = Vec::new();

        for (index, child) in node.children().enumerate() {
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            let is_nested = matches!(
                child.data.borrow().value,
                NodeValue::List(_) | NodeValue::Table(_)
            );
            if index == 0 && is_paragraph {
                content = inline_run_to_html(child);
            } else if is_nested {
                children.extend(self.block(child));
            } else {
                log::error!(
                    "unsupported list item child {:?}; dropped",
                    child.data.borrow().value
                );
            }
        }

        Block::new(LIST_ITEM)
            .with_attr("content", content)
            .with_children(children)
    }

    fn code_block(&self, code: &NodeCodeBlock) -> Block {
        let language = code.info.split_whitespace().next();

        if language == Some(self.options.opaque_language.as_str()) {
            match self.options.codec.decode_first(&code.literal) {
                Ok(block) => return block,
                Err(err) => log::debug!("opaque block did not decode ({err}); kept as code"),
            }
        }

        let literal = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
        let mut block = Block::new(CODE);
        if let Some(language) = language {
            block = block.with_attr("language", language);
        }
        block.with_attr("content", escape_html(literal).replace('\n', "<br>"))
    }
}

/// The image of a paragraph that holds nothing else.
fn sole_image<'a>(paragraph: &'a AstNode<'a>) -> Option<(&'a AstNode<'a>, NodeLink)> {
    let first = paragraph.first_child()?;
    if first.next_sibling().is_some() {
        return None;
    }
    let link = match &first.data.borrow().value {
        NodeValue::Image(link) => link.clone(),
        _ => return None,
    };
    Some((first, link))
}

fn image_from_paragraph<'a>(image: &'a AstNode<'a>, link: &NodeLink) -> Block {
    let mut block = Block::new(IMAGE)
        .with_attr("url", link.url.as_str())
        .with_attr("alt", inline_run_to_html(image));
    if !link.title.is_empty() {
        block = block.with_attr("caption", link.title.as_str());
    }
    block
}

fn image_block<'a>(node: &'a AstNode<'a>, link: &NodeLink) -> Block {
    let mut block = Block::new(IMAGE)
        .with_attr("url", link.url.as_str())
        .with_attr("alt", inline_run_to_html(node));
    if !link.title.is_empty() {
        block = block.with_attr("title", link.title.as_str());
    }
    block
}

fn table_block<'a>(node: &'a AstNode<'a>, alignments: &[TableAlignment]) -> Block {
    let mut content = TableContent::default();

    for row in node.children() {
        let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let tag = if header { CellTag::Th } else { CellTag::Td };
        let cells = row
            .children()
            .enumerate()
            .map(|(column, cell)| {
                let align = alignments
                    .get(column)
                    .map(|a| from_comrak_alignment(*a))
                    .unwrap_or_default();
                TableCell::new(inline_run_to_html(cell), tag, align)
            })
            .collect();
        if header {
            content.head.push(cells);
        } else {
            content.body.push(cells);
        }
    }

    content.into_block()
}

fn from_comrak_alignment(alignment: TableAlignment) -> Alignment {
    match alignment {
        TableAlignment::Left => Alignment::Left,
        TableAlignment::Right => Alignment::Right,
        TableAlignment::Center => Alignment::Center,
        TableAlignment::None => Alignment::None,
    }
}

/// Render the inline children of `node` as an HTML fragment.
pub fn inline_run_to_html<'a>(node: &'a AstNode<'a>) -> String {
    let mut html = String::new();
    for child in node.children() {
        render_inline(child, &mut html);
    }
    html
}

fn render_inline<'a>(node: &'a AstNode<'a>, html: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => html.push_str(&escape_html(text)),
        NodeValue::Code(code) => {
            html.push_str("<code>");
            html.push_str(&escape_html(&code.literal));
            html.push_str("</code>");
        }
        NodeValue::Emph => wrap_inline(node, "em", html),
        NodeValue::Strong => wrap_inline(node, "strong", html),
        NodeValue::HtmlInline(raw) => html.push_str(&escape_html(raw)),
        NodeValue::SoftBreak | NodeValue::LineBreak => html.push_str("<br>"),
        NodeValue::Link(link) => {
            html.push_str(&format!("<a href=\"{}\"", escape_html(&link.url)));
            if !link.title.is_empty() {
                html.push_str(&format!(" title=\"{}\"", escape_html(&link.title)));
            }
            html.push('>');
            html.push_str(&inline_run_to_html(node));
            html.push_str("</a>");
        }
        NodeValue::Image(link) => {
            html.push_str(&format!("<img src=\"{}\"", escape_html(&link.url)));
            if !link.title.is_empty() {
                html.push_str(&format!(" title=\"{}\"", escape_html(&link.title)));
            }
            let mut alt = String::new();
            collect_plain_text(node, &mut alt);
            html.push_str(&format!(" alt=\"{}\">", escape_html(&alt)));
        }
        other => {
            log::warn!("no inline mapping for markdown node {other:?}; rendering its children");
            for child in node.children() {
                render_inline(child, html);
            }
        }
    }
}

fn wrap_inline<'a>(node: &'a AstNode<'a>, tag: &str, html: &mut String) {
    html.push_str(&format!("<{tag}>"));
    for child in node.children() {
        render_inline(child, html);
    }
    html.push_str(&format!("</{tag}>"));
}

fn collect_plain_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => collect_plain_text(child, out),
        }
    }
}
