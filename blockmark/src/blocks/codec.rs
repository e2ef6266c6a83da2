//! Opaque block encoding.
//!
//! Blocks without a native Markdown rule are written as a fenced code block
//! tagged with a reserved language, holding the block's encoded form. The
//! encoding belongs to whatever system owns the block model, so it sits
//! behind [`BlockCodec`]; [`JsonBlockCodec`] is the default.

use crate::blocks::nodes::Block;
use crate::error::CodecError;

/// Encodes one block to text and decodes text back to blocks.
pub trait BlockCodec: Send + Sync {
    fn encode(&self, block: &Block) -> Result<String, CodecError>;

    fn decode(&self, text: &str) -> Result<Vec<Block>, CodecError>;

    /// Decode and keep the first block only.
    fn decode_first(&self, text: &str) -> Result<Block, CodecError> {
        self.decode(text)?.into_iter().next().ok_or(CodecError::Empty)
    }
}

/// Pretty-printed JSON, one block or an array of blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBlockCodec;

impl BlockCodec for JsonBlockCodec {
    fn encode(&self, block: &Block) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(block)?)
    }

    fn decode(&self, text: &str) -> Result<Vec<Block>, CodecError> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('[') {
            Ok(serde_json::from_str(trimmed)?)
        } else {
            Ok(vec![serde_json::from_str(trimmed)?])
        }
    }
}
