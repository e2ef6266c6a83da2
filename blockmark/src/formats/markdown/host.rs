//! Block-extension driver in front of comrak.
//!
//! comrak parses CommonMark for us but has no hook for third-party block
//! kinds. [`HostParser`] walks the source line by line and offers candidate
//! lines to registered [`BlockExtension`]s; text no extension claims is
//! handed to `comrak::parse_document`, and the resulting nodes are spliced
//! into one document in source order.
//!
//! Extensions never rewind the driver. When an extension realises that the
//! lines it consumed are not its block after all, it returns them with
//! [`Continuation::Reinterpret`] and the driver treats them as ordinary text.
//!
//! Lines inside fenced code and raw HTML blocks are never offered. Block
//! quotes and list items are handled by running the driver again over their
//! content with the container prefix stripped, so extension blocks nest the
//! same way native ones do.

use crate::common::table::Alignment;
use comrak::nodes::{Ast, AstNode, NodeList, NodeTable, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};
use std::cell::RefCell;

/// Answer of an extension to a line offered after `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// The line belongs to the open block.
    Matched,
    /// The open block was a false start; these lines go back to the host.
    Reinterpret(Vec<String>),
    /// The open block ended before this line, which the host handles itself.
    Finished,
}

/// Node kinds an extension can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionNodeKind {
    Table { alignments: Vec<Alignment> },
    HeaderRow,
    HeaderCell,
    BodyRow,
    BodyCell,
}

/// Host-neutral node tree returned from [`BlockExtension::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode {
    pub kind: ExtensionNodeKind,
    /// Raw text for leaf nodes, inline-parsed when the extension allows it.
    pub literal: String,
    pub children: Vec<ExtensionNode>,
}

impl ExtensionNode {
    pub fn container(kind: ExtensionNodeKind, children: Vec<ExtensionNode>) -> Self {
        ExtensionNode {
            kind,
            literal: String::new(),
            children,
        }
    }

    pub fn leaf(kind: ExtensionNodeKind, literal: impl Into<String>) -> Self {
        ExtensionNode {
            kind,
            literal: literal.into(),
            children: Vec::new(),
        }
    }
}

/// A block kind the host parser does not know natively.
pub trait BlockExtension {
    fn name(&self) -> &str;

    /// Cheap check run on every line outside code fences and HTML blocks.
    fn might_start(&self, line: &str) -> bool;

    /// Try to open a block on `line`. Returning `true` consumes the line.
    fn start(&mut self, line: &str) -> bool;

    /// Offer the next line to the open block.
    fn continue_line(&mut self, line: &str) -> Continuation;

    /// Called when input ends while a block is open.
    fn end_of_input(&mut self) -> Continuation {
        Continuation::Finished
    }

    /// Produce the finished block, resetting the extension.
    fn finalize(&mut self) -> Option<ExtensionNode>;

    fn can_contain(&self, parent: &ExtensionNodeKind, child: &ExtensionNodeKind) -> bool;

    /// Whether the literal of `kind` is run through the inline parser.
    fn parses_inlines(&self, kind: &ExtensionNodeKind) -> bool;
}

/// comrak plus registered block extensions.
pub struct HostParser {
    options: ComrakOptions<'static>,
    extensions: Vec<Box<dyn BlockExtension>>,
}

impl HostParser {
    pub fn new(options: ComrakOptions<'static>) -> Self {
        HostParser {
            options,
            extensions: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: impl BlockExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Parse `source` into a comrak document allocated in `arena`.
    pub fn parse<'a>(&mut self, arena: &'a Arena<AstNode<'a>>, source: &str) -> &'a AstNode<'a> {
        let root = alloc(arena, NodeValue::Document);
        let mut pending = String::new();
        let mut active: Option<usize> = None;
        let mut fence = FenceState::default();
        let mut html = HtmlBlockState::default();
        let mut blank_before = true;

        for raw in source.split_inclusive('\n') {
            let line = raw.trim_end_matches(['\n', '\r']);

            if let Some(index) = active {
                match self.extensions[index].continue_line(line) {
                    Continuation::Matched => continue,
                    Continuation::Reinterpret(lines) => {
                        log::debug!(
                            "{} extension handed back {} line(s)",
                            self.extensions[index].name(),
                            lines.len()
                        );
                        push_lines(&mut pending, lines);
                        active = None;
                    }
                    Continuation::Finished => {
                        self.close(arena, root, index, &mut pending);
                        active = None;
                    }
                }
            }

            if html.is_open() {
                html.observe(line, blank_before);
            } else if fence.is_open() {
                fence.observe(line);
            } else {
                if let Some(index) = self.try_start(line) {
                    active = Some(index);
                    blank_before = false;
                    continue;
                }
                html.observe(line, blank_before);
                if !html.is_open() {
                    fence.observe(line);
                }
            }

            blank_before = line.trim().is_empty();
            pending.push_str(raw);
        }

        if let Some(index) = active {
            match self.extensions[index].end_of_input() {
                Continuation::Reinterpret(lines) => push_lines(&mut pending, lines),
                Continuation::Matched | Continuation::Finished => {
                    self.close(arena, root, index, &mut pending)
                }
            }
        }
        self.flush(arena, root, &mut pending);

        root
    }

    fn try_start(&mut self, line: &str) -> Option<usize> {
        self.extensions
            .iter_mut()
            .position(|extension| extension.might_start(line) && extension.start(line))
    }

    fn close<'a>(
        &mut self,
        arena: &'a Arena<AstNode<'a>>,
        root: &'a AstNode<'a>,
        index: usize,
        pending: &mut String,
    ) {
        // Finalize first: flushing may run the driver again over containers.
        let node = self.extensions[index].finalize();
        self.flush(arena, root, pending);
        if let Some(node) = node {
            let extension = self.extensions[index].as_ref();
            root.append(build_node(arena, &self.options, extension, &node));
        }
    }

    fn flush<'a>(
        &mut self,
        arena: &'a Arena<AstNode<'a>>,
        root: &'a AstNode<'a>,
        pending: &mut String,
    ) {
        if pending.is_empty() {
            return;
        }
        let source = std::mem::take(pending);
        let chunk = parse_document(arena, &source, &self.options);
        let lines: Vec<&str> = source.lines().collect();
        let children: Vec<_> = chunk.children().collect();
        for child in children {
            child.detach();
            self.reparse_containers(arena, child, &lines);
            root.append(child);
        }
    }

    /// Rebuild the children of a quote or list item from its de-prefixed
    /// source when that source holds a line an extension might start on.
    fn reparse_containers<'a>(
        &mut self,
        arena: &'a Arena<AstNode<'a>>,
        node: &'a AstNode<'a>,
        lines: &[&str],
    ) {
        let (prefix, first, last) = {
            let ast = node.data.borrow();
            let prefix = match &ast.value {
                NodeValue::BlockQuote => ContainerPrefix::Quote,
                NodeValue::Item(list) => ContainerPrefix::item(list),
                NodeValue::List(_) => ContainerPrefix::None,
                _ => return,
            };
            (prefix, ast.sourcepos.start.line, ast.sourcepos.end.line)
        };

        if prefix == ContainerPrefix::None {
            let items: Vec<_> = node.children().collect();
            for item in items {
                self.reparse_containers(arena, item, lines);
            }
            return;
        }

        let Some(span) = first
            .checked_sub(1)
            .and_then(|start| lines.get(start..last.min(lines.len())))
        else {
            return;
        };
        let content = prefix.strip(span);
        if !self.offers_candidate(&content) {
            return;
        }

        let inner = self.parse(arena, &content);
        let old: Vec<_> = node.children().collect();
        for child in old {
            child.detach();
        }
        let new: Vec<_> = inner.children().collect();
        for child in new {
            child.detach();
            node.append(child);
        }
    }

    fn offers_candidate(&self, content: &str) -> bool {
        content.lines().any(|line| {
            let line = strip_container_marks(line);
            self.extensions
                .iter()
                .any(|extension| extension.might_start(line))
        })
    }
}

/// How a container marks the lines of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerPrefix {
    None,
    Quote,
    /// Content column of a list item, counted from the line start.
    Item(usize),
}

impl ContainerPrefix {
    fn item(list: &NodeList) -> Self {
        ContainerPrefix::Item(list.marker_offset + list.padding)
    }

    fn strip(&self, lines: &[&str]) -> String {
        let mut out = String::new();
        for (index, &line) in lines.iter().enumerate() {
            let stripped = match *self {
                ContainerPrefix::None => line,
                ContainerPrefix::Quote => strip_quote_marker(line),
                ContainerPrefix::Item(column) if index == 0 => line.get(column..).unwrap_or(""),
                ContainerPrefix::Item(column) => {
                    let spaces = line.len() - line.trim_start_matches(' ').len();
                    &line[spaces.min(column)..]
                }
            };
            out.push_str(stripped);
            out.push('\n');
        }
        out
    }
}

/// Drop a `>` marker (up to three spaces of indentation and one space after
/// it). Lazy continuation lines come back unchanged.
fn strip_quote_marker(line: &str) -> &str {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return line;
    }
    match rest.strip_prefix('>') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

/// Strip leading quote markers, list markers and indentation, however deeply
/// they nest.
fn strip_container_marks(mut line: &str) -> &str {
    loop {
        let rest = line.trim_start_matches([' ', '\t']);
        if let Some(after) = rest.strip_prefix('>') {
            line = after;
            continue;
        }
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let marker = match rest.as_bytes().first() {
            Some(b'-' | b'*' | b'+') => 1,
            _ if (1..=9).contains(&digits)
                && matches!(rest.as_bytes().get(digits), Some(b'.' | b')')) =>
            {
                digits + 1
            }
            _ => 0,
        };
        if marker > 0 {
            let after = &rest[marker..];
            if after.is_empty() || after.starts_with([' ', '\t']) {
                line = after;
                continue;
            }
        }
        return rest;
    }
}

fn push_lines(pending: &mut String, lines: Vec<String>) {
    for line in lines {
        pending.push_str(&line);
        pending.push('\n');
    }
}

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn build_node<'a>(
    arena: &'a Arena<AstNode<'a>>,
    options: &ComrakOptions<'static>,
    extension: &dyn BlockExtension,
    node: &ExtensionNode,
) -> &'a AstNode<'a> {
    let value = match &node.kind {
        ExtensionNodeKind::Table { alignments } => NodeValue::Table(NodeTable {
            alignments: alignments.iter().map(|a| to_comrak_alignment(*a)).collect(),
            num_columns: alignments.len(),
            num_rows: node.children.len(),
            num_nonempty_cells: count_nonempty_cells(node),
        }),
        ExtensionNodeKind::HeaderRow => NodeValue::TableRow(true),
        ExtensionNodeKind::BodyRow => NodeValue::TableRow(false),
        ExtensionNodeKind::HeaderCell | ExtensionNodeKind::BodyCell => NodeValue::TableCell,
    };
    let ast = alloc(arena, value);

    if extension.parses_inlines(&node.kind) {
        append_inlines(arena, options, ast, &node.literal);
    }
    for child in &node.children {
        if !extension.can_contain(&node.kind, &child.kind) {
            log::warn!(
                "{} extension produced {:?} inside {:?}; dropped",
                extension.name(),
                child.kind,
                node.kind
            );
            continue;
        }
        ast.append(build_node(arena, options, extension, child));
    }
    ast
}

/// Inline-parse `literal` into `parent`. Text that would parse as anything
/// other than a single paragraph is kept as literal text.
fn append_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    options: &ComrakOptions<'static>,
    parent: &'a AstNode<'a>,
    literal: &str,
) {
    if literal.is_empty() {
        return;
    }
    let doc = parse_document(arena, literal, options);
    let mut blocks = doc.children();
    match (blocks.next(), blocks.next()) {
        (Some(paragraph), None)
            if matches!(paragraph.data.borrow().value, NodeValue::Paragraph) =>
        {
            let inlines: Vec<_> = paragraph.children().collect();
            for inline in inlines {
                inline.detach();
                parent.append(inline);
            }
        }
        _ => parent.append(alloc(arena, NodeValue::Text(literal.to_string()))),
    }
}

fn count_nonempty_cells(node: &ExtensionNode) -> usize {
    node.children
        .iter()
        .flat_map(|row| row.children.iter())
        .filter(|cell| !cell.literal.is_empty())
        .count()
}

fn to_comrak_alignment(alignment: Alignment) -> TableAlignment {
    match alignment {
        Alignment::Left => TableAlignment::Left,
        Alignment::Right => TableAlignment::Right,
        Alignment::Center => TableAlignment::Center,
        Alignment::None => TableAlignment::None,
    }
}

/// Tracks fenced code so lines inside fences are never offered to extensions.
#[derive(Debug, Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn observe(&mut self, line: &str) {
        let rest = line.trim_start_matches(' ');
        if line.len() - rest.len() > 3 {
            return;
        }
        let marker = match rest.chars().next() {
            Some(c @ ('`' | '~')) => c,
            _ => return,
        };
        let run = rest.chars().take_while(|&c| c == marker).count();
        if run < 3 {
            return;
        }
        match self.open {
            None => self.open = Some((marker, run)),
            Some((open_marker, open_run)) => {
                if marker == open_marker && run >= open_run && rest[run..].trim().is_empty() {
                    self.open = None;
                }
            }
        }
    }
}

/// Raw HTML block kinds 1 to 5 end at a marker, 6 and 7 at a blank line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlEnd {
    Marker(&'static str),
    BlankLine,
}

/// Tracks raw HTML blocks so lines inside them are never offered to
/// extensions.
#[derive(Debug, Default)]
struct HtmlBlockState {
    end: Option<HtmlEnd>,
}

impl HtmlBlockState {
    fn is_open(&self) -> bool {
        self.end.is_some()
    }

    fn observe(&mut self, line: &str, blank_before: bool) {
        match self.end {
            None => {
                self.end = html_block_start(line, blank_before);
                if let Some(HtmlEnd::Marker(marker)) = self.end {
                    if line.to_ascii_lowercase().contains(marker) {
                        self.end = None;
                    }
                }
            }
            Some(HtmlEnd::Marker(marker)) => {
                if line.to_ascii_lowercase().contains(marker) {
                    self.end = None;
                }
            }
            Some(HtmlEnd::BlankLine) => {
                if line.trim().is_empty() {
                    self.end = None;
                }
            }
        }
    }
}

const RAW_TEXT_TAGS: [(&str, &str); 4] = [
    ("script", "</script>"),
    ("pre", "</pre>"),
    ("style", "</style>"),
    ("textarea", "</textarea>"),
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// The end condition of the HTML block `line` opens, if it opens one. Kind 7
/// cannot interrupt a paragraph, so it needs a blank line before it.
fn html_block_start(line: &str, blank_before: bool) -> Option<HtmlEnd> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 || !rest.starts_with('<') {
        return None;
    }
    let lower = rest.to_ascii_lowercase();

    for (tag, end) in RAW_TEXT_TAGS {
        if let Some(after) = lower[1..].strip_prefix(tag) {
            if after.is_empty() || after.starts_with([' ', '\t', '>']) {
                return Some(HtmlEnd::Marker(end));
            }
        }
    }
    if lower.starts_with("<!--") {
        return Some(HtmlEnd::Marker("-->"));
    }
    if lower.starts_with("<?") {
        return Some(HtmlEnd::Marker("?>"));
    }
    if lower.starts_with("<![cdata[") {
        return Some(HtmlEnd::Marker("]]>"));
    }
    if lower[1..].starts_with('!') && lower[2..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Some(HtmlEnd::Marker(">"));
    }

    let closing = lower.starts_with("</");
    let name_start = if closing { &lower[2..] } else { &lower[1..] };
    if !name_start.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_len = name_start
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(name_start.len());
    let (name, after) = name_start.split_at(name_len);

    if BLOCK_TAGS.contains(&name)
        && (after.is_empty() || after.starts_with([' ', '\t', '>']) || after.starts_with("/>"))
    {
        return Some(HtmlEnd::BlankLine);
    }

    let raw_text = RAW_TEXT_TAGS.iter().any(|(tag, _)| *tag == name);
    if blank_before && !raw_text && is_complete_tag(closing, after) {
        return Some(HtmlEnd::BlankLine);
    }
    None
}

/// Whether `after` (the text following a tag name) finishes a lone open or
/// closing tag with nothing but whitespace behind it.
fn is_complete_tag(closing: bool, after: &str) -> bool {
    if !(after.starts_with(['>', '/', ' ', '\t'])) {
        return false;
    }
    let Some(close) = after.find('>') else {
        return false;
    };
    let (inside, tail) = after.split_at(close);
    if !tail[1..].trim().is_empty() || inside.contains('<') {
        return false;
    }
    !closing || inside.trim().is_empty()
}
