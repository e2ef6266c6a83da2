//! Markdown ⇄ block tree conversion
//!
//!     This crate converts CommonMark Markdown (with GitHub-style pipe tables) into a tree of
//!     editor blocks and serializes block trees back to Markdown, so content can be authored in
//!     plain text and stored as blocks.
//!
//!     TLDR:
//!         - Markdown parsing is comrak's job. Tables are the one block kind comrak doesn't give
//!           us the way we need them, so they come from our own extension run in front of it.
//!         - Block content is inline HTML; the serializer reads it back with html5ever.
//!         - Any block kind without a Markdown rule is written as a fenced, encoded block and
//!           decoded on the way back in, so every tree survives a round trip.
//!         - This is a pure lib: no printing, no env vars. The CLI lives in blockmark-cli.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── options.rs              # ConvertOptions shared by both directions
//!     ├── blocks                  # Block model, typed table view, opaque codec
//!     ├── common
//!     │   ├── escape.rs           # Markdown / HTML / pipe escaping
//!     │   ├── html.rs             # inline HTML fragment → Markdown
//!     │   └── table               # pipe table grammar and document extractor
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── host.rs         # block-extension driver in front of comrak
//!     │   │   ├── table_extension.rs
//!     │   │   ├── parser.rs       # Markdown → blocks
//!     │   │   ├── serializer.rs   # blocks → Markdown
//!     │   │   └── mod.rs
//!     │   └── blocks              # the block tree itself (JSON)
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── common                  # table grammar and extractor
//!     └── markdown
//!         ├── import.rs
//!         ├── export.rs
//!         ├── table.rs
//!         └── round_trip.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The table grammar (./common/table/grammar.rs) is a hand-written, single-line scanner: a
//!     row or delimiter row either parses or returns None, never an error, because "this isn't a
//!     table" is the common answer while scanning a document. The same scanner backs both the
//!     standalone document extractor and the comrak table extension.
//!
//!     The table extension can only learn that a header row wasn't a table header on the
//!     following line. Rather than rewinding the parser, it hands the consumed lines back
//!     (Continuation::Reinterpret) and the driver treats them as ordinary text.
//!
//! Library Choices
//!
//!     comrak for CommonMark, html5ever + markup5ever_rcdom for inline HTML fragments, serde_json
//!     for attributes and the default opaque codec, log for diagnostics.
//!
pub mod blocks;
pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod options;
pub mod registry;

pub use blocks::{Block, BlockCodec, BlockKind, JsonBlockCodec};
pub use common::table::{
    extract_tables_from_document, parse_delimiters, parse_table_row, Alignment, DocumentSegment,
};
pub use error::{CodecError, FormatError};
pub use format::Format;
pub use options::ConvertOptions;
pub use registry::FormatRegistry;

/// Convert Markdown to a block tree with default options.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    markdown_to_blocks_with_options(markdown, &ConvertOptions::default())
}

pub fn markdown_to_blocks_with_options(markdown: &str, options: &ConvertOptions) -> Vec<Block> {
    formats::markdown::parser::markdown_to_blocks(markdown, options)
}

/// Serialize a block tree to Markdown with default options.
pub fn blocks_to_markdown(blocks: &[Block]) -> Result<String, FormatError> {
    blocks_to_markdown_with_options(blocks, &ConvertOptions::default())
}

pub fn blocks_to_markdown_with_options(
    blocks: &[Block],
    options: &ConvertOptions,
) -> Result<String, FormatError> {
    formats::markdown::serializer::serialize_to_markdown(blocks, options)
}
