//! Block tree data model.
//!
//! A block is a kind name, an insertion-ordered attribute record and child
//! blocks. The model is shared with the editor that stores the tree, so it
//! stays a generic record on the wire; [`BlockKind`] and the typed views in
//! [`table`] give the converters a closed set of kinds to match on.

pub mod codec;
pub mod nodes;
pub mod table;

pub use codec::{BlockCodec, JsonBlockCodec};
pub use nodes::{Block, BlockKind};
pub use table::{CellTag, TableCell, TableContent};
