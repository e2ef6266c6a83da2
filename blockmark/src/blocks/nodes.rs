//! The block tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PARAGRAPH: &str = "paragraph";
pub const HEADING: &str = "heading";
pub const IMAGE: &str = "image";
pub const LIST: &str = "list";
pub const LIST_ITEM: &str = "list-item";
pub const QUOTE: &str = "quote";
pub const CODE: &str = "code";
pub const HTML: &str = "html";
pub const TABLE: &str = "table";
pub const SEPARATOR: &str = "separator";

/// A node of the block tree: a kind name, ordered attributes, child blocks.
///
/// Leaf kinds (paragraph, heading, image, code, separator) have no children.
/// Content attributes hold inline HTML fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, rename = "innerBlocks", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            attributes: Map::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, keeping insertion order.
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> BlockKind {
        BlockKind::from_name(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(Value::as_bool)
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attributes.get(key).and_then(Value::as_u64)
    }

    /// The `content` attribute, or an empty fragment.
    pub fn content(&self) -> &str {
        self.attr_str("content").unwrap_or_default()
    }
}

/// Closed set of block kinds with native Markdown rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    Image,
    List,
    ListItem,
    Quote,
    Code,
    Html,
    Table,
    Separator,
    /// Anything else; serialized through the opaque-block fence.
    Other,
}

impl BlockKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            PARAGRAPH => BlockKind::Paragraph,
            HEADING => BlockKind::Heading,
            IMAGE => BlockKind::Image,
            LIST => BlockKind::List,
            LIST_ITEM => BlockKind::ListItem,
            QUOTE => BlockKind::Quote,
            CODE => BlockKind::Code,
            HTML => BlockKind::Html,
            TABLE => BlockKind::Table,
            SEPARATOR => BlockKind::Separator,
            _ => BlockKind::Other,
        }
    }

    /// Kinds whose inner blocks are part of their Markdown form. Opaque
    /// blocks keep theirs inside the encoded fence instead.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::List | BlockKind::ListItem | BlockKind::Quote
        )
    }
}
