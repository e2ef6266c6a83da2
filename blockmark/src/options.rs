//! Conversion options shared by the Markdown parser and serializer.

use crate::blocks::codec::{BlockCodec, JsonBlockCodec};
use std::fmt;
use std::sync::Arc;

/// Language tag reserved for fenced opaque blocks.
pub const DEFAULT_OPAQUE_LANGUAGE: &str = "block";

/// Knobs for both conversion directions.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Info-string token marking a fenced code block as an encoded block.
    pub opaque_language: String,
    /// Marker used for unordered list items.
    pub bullet_marker: char,
    /// Pad table cells so columns line up.
    pub pad_table_columns: bool,
    /// Encoding used inside opaque-block fences.
    pub codec: Arc<dyn BlockCodec>,
}

impl ConvertOptions {
    pub fn with_opaque_language(mut self, language: impl Into<String>) -> Self {
        self.opaque_language = language.into();
        self
    }

    pub fn with_bullet_marker(mut self, marker: char) -> Self {
        self.bullet_marker = marker;
        self
    }

    pub fn with_pad_table_columns(mut self, pad: bool) -> Self {
        self.pad_table_columns = pad;
        self
    }

    pub fn with_codec(mut self, codec: impl BlockCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            opaque_language: DEFAULT_OPAQUE_LANGUAGE.to_string(),
            bullet_marker: '-',
            pad_table_columns: true,
            codec: Arc::new(JsonBlockCodec),
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("opaque_language", &self.opaque_language)
            .field("bullet_marker", &self.bullet_marker)
            .field("pad_table_columns", &self.pad_table_columns)
            .finish_non_exhaustive()
    }
}
