//! Markdown serialization (blocks → Markdown export)
//!
//! Every block maps to a Markdown string and the strings are concatenated.
//! One [`Serializer`] lives for exactly one call and carries the numbering
//! frames of the lists being rendered across the whole walk. Frames are
//! pushed and popped around a closure, so an early return can't leave a
//! stale frame behind for the next sibling. Nested content is rendered
//! unindented and then shifted under its list item's marker.
//!
//! Blocks without a native rule are written as a fenced code block tagged
//! with the opaque language, which the parser turns back into the block.

use crate::blocks::nodes::{Block, BlockKind};
use crate::blocks::table::{TableCell, TableContent};
use crate::common::escape::{escape_pipes, longest_run};
use crate::common::html::{html_fragment_to_markdown, html_fragment_to_text};
use crate::common::table::Alignment;
use crate::error::FormatError;
use crate::options::ConvertOptions;

/// Serialize a block tree to Markdown.
///
/// The result ends with exactly one newline; an empty tree gives an empty
/// string.
pub fn serialize_to_markdown(
    blocks: &[Block],
    options: &ConvertOptions,
) -> Result<String, FormatError> {
    let mut serializer = Serializer::new(options);
    let markdown = serializer.blocks(blocks)?;

    let trimmed = markdown.trim_end_matches('\n');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{trimmed}\n"))
}

/// Numbering style of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bullet,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl ListStyle {
    /// Style of a list block from its `ordered` and `type` attributes.
    pub fn of(list: &Block) -> Self {
        if !list.attr_bool("ordered").unwrap_or(false) {
            return ListStyle::Bullet;
        }
        match list.attr_str("type") {
            Some("a" | "lower-alpha" | "lower-latin") => ListStyle::LowerAlpha,
            Some("A" | "upper-alpha" | "upper-latin") => ListStyle::UpperAlpha,
            Some("i" | "lower-roman") => ListStyle::LowerRoman,
            Some("I" | "upper-roman") => ListStyle::UpperRoman,
            _ => ListStyle::Decimal,
        }
    }

    /// Item marker for `counter`; ordered markers end with a dot.
    pub fn marker(&self, counter: u64, bullet: char) -> String {
        match self {
            ListStyle::Bullet => bullet.to_string(),
            ListStyle::Decimal => format!("{counter}."),
            ListStyle::LowerAlpha => format!("{}.", alpha(counter)),
            ListStyle::UpperAlpha => format!("{}.", alpha(counter).to_uppercase()),
            ListStyle::LowerRoman => format!("{}.", roman(counter)),
            ListStyle::UpperRoman => format!("{}.", roman(counter).to_uppercase()),
        }
    }
}

/// Spreadsheet-column letters: 1 → a, 26 → z, 27 → aa.
fn alpha(mut counter: u64) -> String {
    if counter == 0 {
        return "0".to_string();
    }
    let mut letters = Vec::new();
    while counter > 0 {
        counter -= 1;
        letters.push((b'a' + (counter % 26) as u8) as char);
        counter /= 26;
    }
    letters.iter().rev().collect()
}

fn roman(mut counter: u64) -> String {
    const NUMERALS: [(u64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if counter == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while counter >= value {
            out.push_str(numeral);
            counter -= value;
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct ListFrame {
    style: ListStyle,
    counter: u64,
}

struct Serializer<'o> {
    options: &'o ConvertOptions,
    lists: Vec<ListFrame>,
}

impl<'o> Serializer<'o> {
    fn new(options: &'o ConvertOptions) -> Self {
        Serializer {
            options,
            lists: Vec::new(),
        }
    }

    fn blocks(&mut self, blocks: &[Block]) -> Result<String, FormatError> {
        let mut out = String::new();
        for block in blocks {
            out.push_str(&self.block(block)?);
        }
        Ok(out)
    }

    fn block(&mut self, block: &Block) -> Result<String, FormatError> {
        let kind = block.kind();
        if !kind.is_container() && kind != BlockKind::Other && !block.children.is_empty() {
            log::warn!(
                "{} block has {} inner block(s); leaf blocks don't write children",
                block.name,
                block.children.len()
            );
        }
        let markdown = match kind {
            BlockKind::Paragraph => format!("{}\n\n", html_fragment_to_markdown(block.content())),
            BlockKind::Heading => heading(block),
            BlockKind::Image => image(block),
            BlockKind::List => self.list(block)?,
            BlockKind::ListItem => self.list_item(block)?,
            BlockKind::Quote => self.quote(block)?,
            BlockKind::Code => code(block),
            BlockKind::Html => format!("{}\n\n", block.content()),
            BlockKind::Table => table(block, self.options.pad_table_columns),
            BlockKind::Separator => "---\n\n".to_string(),
            BlockKind::Other => self.opaque(block)?,
        };
        Ok(markdown)
    }

    /// Run `f` with `frame` on top of the list stack.
    fn with_list<T>(
        &mut self,
        frame: ListFrame,
        f: impl FnOnce(&mut Self) -> Result<T, FormatError>,
    ) -> Result<T, FormatError> {
        self.lists.push(frame);
        let result = f(self);
        self.lists.pop();
        result
    }

    fn list(&mut self, list: &Block) -> Result<String, FormatError> {
        let frame = ListFrame {
            style: ListStyle::of(list),
            counter: list.attr_u64("start").unwrap_or(1),
        };
        let items = self.with_list(frame, |s| s.blocks(&list.children))?;
        Ok(format!("{items}\n"))
    }

    fn list_item(&mut self, item: &Block) -> Result<String, FormatError> {
        let Some(frame) = self.lists.last_mut() else {
            return Ok(String::new());
        };
        let marker = frame.style.marker(frame.counter, self.options.bullet_marker);
        frame.counter += 1;

        let content = html_fragment_to_markdown(item.content());
        let (first, rest) = match content.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (content.as_str(), None),
        };
        let prefix = " ".repeat(marker.chars().count() + 1);

        let mut out = if first.is_empty() {
            format!("{marker}\n")
        } else {
            format!("{marker} {first}\n")
        };

        if item.children.is_empty() {
            if let Some(rest) = rest {
                out.push_str(&indent_lines(&format!("{rest}\n"), &prefix));
            }
            return Ok(out);
        }

        let mut chunk = rest.map(|rest| format!("{rest}\n")).unwrap_or_default();
        chunk.push_str(&self.blocks(&item.children)?);
        let chunk = format!("{}\n", chunk.trim_end_matches('\n'));
        out.push_str(&indent_lines(&chunk, &prefix));
        Ok(out)
    }

    fn quote(&mut self, quote: &Block) -> Result<String, FormatError> {
        let inner = self.blocks(&quote.children)?;
        let mut out = String::new();
        for line in inner.trim_end_matches('\n').lines() {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("> \n\n");
        Ok(out)
    }

    fn opaque(&self, block: &Block) -> Result<String, FormatError> {
        let encoded = self
            .options
            .codec
            .encode(block)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        let fence = fence_for(&encoded);
        Ok(format!(
            "{fence}{}\n{}\n{fence}\n\n",
            self.options.opaque_language,
            encoded.trim_end_matches('\n')
        ))
    }
}

fn heading(block: &Block) -> String {
    let level = block.attr_u64("level").unwrap_or(2).clamp(1, 6) as usize;
    let text = html_fragment_to_markdown(block.content()).replace('\n', " ");
    format!("{} {text}\n\n", "#".repeat(level))
}

fn image(block: &Block) -> String {
    let alt = html_fragment_to_markdown(block.attr_str("alt").unwrap_or_default());
    let url = block.attr_str("url").unwrap_or_default();
    format!("![{alt}]({url})\n\n")
}

fn code(block: &Block) -> String {
    let text = html_fragment_to_text(block.content());
    let fence = fence_for(&text);
    let language = block.attr_str("language").unwrap_or_default();
    format!("{fence}{language}\n{text}\n{fence}\n\n")
}

/// Three backticks, or one more than the longest run inside `text`.
fn fence_for(text: &str) -> String {
    "`".repeat((longest_run(text, '`') + 1).max(3))
}

fn indent_lines(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            out.push_str(prefix);
        }
        out.push_str(line);
    }
    out
}

fn table(block: &Block, pad: bool) -> String {
    let TableContent { mut head, mut body } = TableContent::from_block(block);

    // Producers may leave out the head row; the first body row stands in.
    let header = if head.is_empty() {
        if body.is_empty() {
            log::warn!("table without rows; skipped");
            return String::new();
        }
        body.remove(0)
    } else {
        let header = head.remove(0);
        head.append(&mut body);
        body = head;
        header
    };

    let alignments: Vec<Alignment> = header.iter().map(TableCell::alignment).collect();
    let header = render_row(&header);
    let rows: Vec<Vec<String>> = body.iter().map(|row| render_row(row)).collect();

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![if pad { 3 } else { 1 }; columns];
    if pad {
        for row in std::iter::once(&header).chain(rows.iter()) {
            for (column, cell) in row.iter().enumerate() {
                widths[column] = widths[column].max(cell.chars().count());
            }
        }
    }

    let mut lines = vec![table_line(&header, &widths, pad)];
    lines.push(delimiter_line(&alignments, &widths));
    lines.extend(rows.iter().map(|row| table_line(row, &widths, pad)));
    format!("{}\n\n", lines.join("\n"))
}

fn render_row(row: &[TableCell]) -> Vec<String> {
    row.iter()
        .map(|cell| escape_pipes(&html_fragment_to_markdown(&cell.content)).replace('\n', " "))
        .collect()
}

fn table_line(cells: &[String], widths: &[usize], pad: bool) -> String {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(column, &width)| {
            let cell = cells.get(column).map(String::as_str).unwrap_or_default();
            if pad {
                format!("{cell:<width$}")
            } else {
                cell.to_string()
            }
        })
        .collect();
    format!("| {} |", cells.join(" | "))
}

fn delimiter_line(alignments: &[Alignment], widths: &[usize]) -> String {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(column, &width)| {
            let alignment = alignments.get(column).copied().unwrap_or_default();
            let (left, right) = match alignment {
                Alignment::Left => (":", ""),
                Alignment::Right => ("", ":"),
                Alignment::Center => (":", ":"),
                Alignment::None => ("", ""),
            };
            let hyphens = width.saturating_sub(left.len() + right.len()).max(1);
            format!("{left}{}{right}", "-".repeat(hyphens))
        })
        .collect();
    format!("| {} |", cells.join(" | "))
}
