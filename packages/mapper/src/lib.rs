//! XML Mapper - Convert XML documents to JSON with declarative mappings.
//!
//! A [`Configuration`](mapping::Configuration) lists field mappings from
//! source paths to dotted output paths. The engine evaluates each path
//! against the parsed document, decides single/array/object cardinality,
//! applies text transforms and type coercion, and writes the results into
//! an ordered JSON tree.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use xml_mapper::coerce::DataType;
//! use xml_mapper::mapping::{Configuration, MappingEntry};
//! use xml_mapper::Transformer;
//!
//! let xml = "<person><name>John Doe</name><age>30</age>\
//!            <email>JOHN.DOE@EXAMPLE.COM</email></person>";
//! let config = Configuration::new(vec![
//!     MappingEntry::single("person/name", "fullName"),
//!     MappingEntry::single("person/age", "age").with_data_type(DataType::Integer),
//!     MappingEntry::single("person/email", "email").with_transform("lowercase"),
//! ]);
//!
//! let output = Transformer::new().transform_str(xml, &config).unwrap();
//! assert_eq!(
//!     output,
//!     json!({"fullName": "John Doe", "age": 30, "email": "john.doe@example.com"})
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Limits and name validation
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Owned source tree and navigation helpers
//! - [`path`]: Path evaluation over the source tree
//! - [`coerce`]: String to typed value coercion
//! - [`transform`]: Named text transforms
//! - [`output`]: Dotted-path output tree construction
//! - [`mapping`]: Mapping model and resolver
//! - [`transformer`]: Parse, resolve and serialize in one call
//! - [`store`]: File-based configuration store and cache
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod coerce;
pub mod config;
pub mod error;
pub mod mapping;
pub mod output;
pub mod path;
pub mod store;
pub mod transform;
pub mod transformer;
pub mod xml;

pub use transformer::Transformer;

// Re-export commonly used items
pub use error::{MapperError, Result};
pub use mapping::{Configuration, MappingEntry, TransformReport};
pub use xml::SourceDocument;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
