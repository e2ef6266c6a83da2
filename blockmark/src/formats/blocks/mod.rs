//! Block tree as text
//!
//! Exposes the configured [`BlockCodec`](crate::blocks::BlockCodec) as a
//! format so block trees can be read and written directly. With the default
//! codec this is pretty-printed JSON, an array of blocks.

use crate::blocks::Block;
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;

/// Format implementation for serialized block trees
#[derive(Debug, Clone, Default)]
pub struct BlocksFormat {
    options: ConvertOptions,
}

impl BlocksFormat {
    pub fn new(options: ConvertOptions) -> Self {
        BlocksFormat { options }
    }
}

impl Format for BlocksFormat {
    fn name(&self) -> &str {
        "blocks"
    }

    fn description(&self) -> &str {
        "Serialized block tree (JSON)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Block>, FormatError> {
        if source.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.options.codec.decode(source)?)
    }

    fn serialize(&self, blocks: &[Block]) -> Result<String, FormatError> {
        let encoded = serde_json::to_string_pretty(blocks)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        Ok(format!("{encoded}\n"))
    }
}
