//! Format implementations
//!
//! This module contains all format implementations that convert between
//! block trees and their text representations.

pub mod blocks;
pub mod markdown;

pub use blocks::BlocksFormat;
pub use markdown::MarkdownFormat;
