//! Source document model and navigation helpers.
//!
//! Markup is parsed with `roxmltree` and converted into an owned, read-only
//! tree of [`SourceNode`]s that the mapping engine walks.

mod tree;
mod utils;

pub use tree::{Element, SourceDocument, SourceNode};
pub use utils::{element_children, find_children};
