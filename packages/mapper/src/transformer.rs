//! Transformer service that ties parsing, resolution and serialization together.

use serde_json::Value;

use crate::error::Result;
use crate::mapping::{Configuration, MappingResolver, TransformReport};
use crate::output::to_json_string;
use crate::transform::{create_builtin_registry, TransformRegistry};
use crate::xml::SourceDocument;

/// Converts source documents into JSON according to a configuration.
///
/// A transformer owns only its transform registry, so a single instance can
/// be shared across threads and reused for any number of documents.
#[derive(Debug)]
pub struct Transformer {
    registry: TransformRegistry,
}

impl Transformer {
    /// Create a transformer with the built-in transforms.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(create_builtin_registry())
    }

    /// Create a transformer with a custom registry.
    #[must_use]
    pub fn with_registry(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    /// The transform registry used for entry and table transforms.
    #[must_use]
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Resolve a configuration against an already parsed document.
    #[must_use]
    pub fn transform_document(
        &self,
        document: &SourceDocument,
        config: &Configuration,
    ) -> TransformReport {
        MappingResolver::new(&self.registry).resolve(document, config)
    }

    /// Parse source text and resolve a configuration against it.
    ///
    /// # Returns
    /// The output tree together with the warnings collected on the way
    ///
    /// # Errors
    /// Returns an error when the source cannot be parsed.
    pub fn transform_report(&self, xml: &str, config: &Configuration) -> Result<TransformReport> {
        let document = SourceDocument::parse(xml)?;
        let report = self.transform_document(&document, config);

        for warning in &report.warnings {
            tracing::debug!(config = ?config.name, warning = %warning, "Transform warning");
        }

        Ok(report)
    }

    /// Parse source text and return the output tree.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use xml_mapper::mapping::{Configuration, MappingEntry};
    /// use xml_mapper::Transformer;
    ///
    /// let config = Configuration::new(vec![MappingEntry::single("person/name", "fullName")]);
    /// let output = Transformer::new()
    ///     .transform_str("<person><name>John Doe</name></person>", &config)
    ///     .unwrap();
    ///
    /// assert_eq!(output, json!({"fullName": "John Doe"}));
    /// ```
    ///
    /// # Errors
    /// Returns an error when the source cannot be parsed.
    pub fn transform_str(&self, xml: &str, config: &Configuration) -> Result<Value> {
        Ok(self.transform_report(xml, config)?.output)
    }

    /// Parse source text and return the output as JSON text.
    ///
    /// # Errors
    /// Returns an error when the source cannot be parsed.
    pub fn transform_to_string(
        &self,
        xml: &str,
        config: &Configuration,
        pretty: bool,
    ) -> Result<String> {
        let output = self.transform_str(xml, config)?;
        to_json_string(&output, pretty)
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}
