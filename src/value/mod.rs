//! Value module - In-memory representation of decoded manifest documents.
//!
//! Documents are schema-free here: every node is checked before it is
//! treated as a map or list.

mod value;

pub use value::*;
