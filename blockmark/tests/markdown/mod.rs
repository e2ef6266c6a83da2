//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ block tree conversion.

mod export;
mod import;
mod round_trip;
mod table;
