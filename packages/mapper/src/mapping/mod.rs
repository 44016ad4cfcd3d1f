//! Mapping configurations and their resolution.
//!
//! A [`Configuration`] is an ordered list of [`MappingEntry`] values plus a
//! transform table and a default-value table. The [`MappingResolver`] walks
//! the entries against a parsed source document and builds the output tree.

mod legacy;
mod resolver;
mod types;

pub use legacy::{convert_array_mappings, convert_nested_mappings, convert_property_mappings};
pub use resolver::{extract_element_value, MappingResolver, TransformReport};
pub use types::{Cardinality, Configuration, MappingEntry, MappingKind};
