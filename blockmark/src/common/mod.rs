//! Format-agnostic helpers shared by the parser and the serializer.

pub mod escape;
pub mod html;
pub mod table;
