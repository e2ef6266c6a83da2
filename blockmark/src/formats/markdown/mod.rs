//! Markdown format implementation
//!
//! This module implements bidirectional conversion between block trees and
//! CommonMark Markdown with GitHub-style pipe tables.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for CommonMark block and inline parsing. comrak
//! has no hook for third-party block kinds, so tables are recognised by our own
//! [`table_extension::TableExtension`], run by the line driver in [`host`] in
//! front of comrak; comrak's own table extension stays off. Serialization is
//! hand-written because the output rules (quote closing lines, list markers,
//! opaque fences) are not what comrak's formatter emits.
//!
//! # Element Mapping Table
//!
//! | Block        | Markdown                      | Export Notes                              | Import Notes                              |
//! |--------------|-------------------------------|-------------------------------------------|-------------------------------------------|
//! | paragraph    | Paragraph                     | `<br>` → newline                          | Soft/hard breaks → `<br>`                 |
//! | heading      | `#` … `######`                | Level clamped to 1-6                      | Direct mapping                            |
//! | image        | `![alt](url)`                 | Title/caption not written                 | Only a paragraph holding a lone image     |
//! | list         | `-` / `1.` / `a.` / `i.`      | Style from `ordered`/`type`/`start`       | `start` kept when not 1                   |
//! | list-item    | List item                     | Continuation lines indented under marker  | Leading paragraph + nested lists only     |
//! | quote        | `> `                          | Closing `> ` line always written          | Direct mapping                            |
//! | code         | Fenced code block             | Fence outgrows inner backtick runs        | First info token → `language`             |
//! | html         | HTML block                    | Verbatim                                  | Verbatim                                  |
//! | table        | Pipe table                    | Columns padded, first body row as header if no head | Header row → `head`, rest → `body` |
//! | separator    | `---`                         | Direct mapping                            | Any thematic break                        |
//! | anything else| ```` ```block ```` fence      | Encoded with the configured codec         | Decoded back; falls back to code          |
//!
//! # Lossy Conversions
//!
//! - Image titles/captions are not written back
//! - Hard line breaks come back as soft breaks
//! - Lettered and Roman lists are written with their markers but CommonMark
//!   reads them back as paragraphs
//! - List items holding anything other than a paragraph and nested lists lose
//!   the extra children on import
//! - Link reference definitions do not resolve across a table

pub mod host;
pub mod parser;
pub mod serializer;
pub mod table_extension;

use crate::blocks::Block;
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: ConvertOptions,
}

impl MarkdownFormat {
    pub fn new(options: ConvertOptions) -> Self {
        MarkdownFormat { options }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with pipe tables"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Block>, FormatError> {
        parser::parse_from_markdown(source, &self.options)
    }

    fn serialize(&self, blocks: &[Block]) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(blocks, &self.options)
    }
}
