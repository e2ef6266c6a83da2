//! Typed view of a table block's `head` / `body` attributes.

use crate::blocks::nodes::{Block, TABLE};
use crate::common::table::Alignment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header vs. body marker for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTag {
    Th,
    Td,
}

/// One table cell; `content` is an inline HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub content: String,
    pub tag: CellTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

impl TableCell {
    pub fn new(content: impl Into<String>, tag: CellTag, align: Alignment) -> Self {
        TableCell {
            content: content.into(),
            tag,
            align: (align != Alignment::None).then_some(align),
        }
    }

    pub fn alignment(&self) -> Alignment {
        self.align.unwrap_or_default()
    }
}

pub type TableRows = Vec<Vec<TableCell>>;

/// The rows of a table block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableContent {
    pub head: TableRows,
    pub body: TableRows,
}

impl TableContent {
    /// Read rows from a block; malformed rows are reported and dropped.
    pub fn from_block(block: &Block) -> Self {
        TableContent {
            head: rows_attr(block, "head"),
            body: rows_attr(block, "body"),
        }
    }

    /// Build a table block. `head` is only written when non-empty.
    pub fn into_block(self) -> Block {
        let mut block = Block::new(TABLE);
        if !self.head.is_empty() {
            block = block.with_attr("head", rows_value(&self.head));
        }
        block.with_attr("body", rows_value(&self.body))
    }
}

fn rows_attr(block: &Block, key: &str) -> TableRows {
    let Some(value) = block.attr(key) else {
        return Vec::new();
    };
    match serde_json::from_value(value.clone()) {
        Ok(rows) => rows,
        Err(err) => {
            log::warn!("ignoring malformed table `{key}` attribute: {err}");
            Vec::new()
        }
    }
}

fn rows_value(rows: &TableRows) -> Value {
    serde_json::to_value(rows).unwrap_or(Value::Array(Vec::new()))
}
