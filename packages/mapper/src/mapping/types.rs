//! Declarative mapping model.
//!
//! Entries and configurations deserialize from several historical layouts
//! (see [`super::legacy`]) but always serialize to the unified layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::legacy;
use crate::coerce::DataType;

/// How many values a mapping entry produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// One value from the first match.
    #[default]
    Single,
    /// An array with one element per match.
    Array,
    /// One object built from the first match.
    Object,
}

impl Cardinality {
    /// Parse a cardinality name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Configuration name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Cardinality together with the child entries it carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MappingKind {
    #[default]
    Single,
    /// Scalars when `children` is empty, otherwise one object per match.
    Array { children: Vec<MappingEntry> },
    /// A verbatim copy of child elements when `children` is empty,
    /// otherwise an object built from `children`.
    Object { children: Vec<MappingEntry> },
}

impl MappingKind {
    /// The cardinality of this kind.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Single => Cardinality::Single,
            Self::Array { .. } => Cardinality::Array,
            Self::Object { .. } => Cardinality::Object,
        }
    }

    /// Child entries (empty for single).
    #[must_use]
    pub fn children(&self) -> &[MappingEntry] {
        match self {
            Self::Single => &[],
            Self::Array { children } | Self::Object { children } => children,
        }
    }
}

/// One declarative field mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "MappingEntryDef", into = "MappingEntryDef")]
pub struct MappingEntry {
    /// Path into the source tree.
    pub source_path: Option<String>,
    /// Dotted path into the output tree.
    pub output_path: Option<String>,
    pub kind: MappingKind,
    pub data_type: DataType,
    /// Record a warning when the value is absent.
    pub required: bool,
    /// Literal used when the value is absent.
    pub default_value: Option<Value>,
    /// Transform table key or inline rule.
    pub transform_key: Option<String>,
}

impl MappingEntry {
    /// A single-value entry.
    ///
    /// # Examples
    /// ```
    /// use xml_mapper::coerce::DataType;
    /// use xml_mapper::mapping::MappingEntry;
    ///
    /// let entry = MappingEntry::single("person/age", "age").with_data_type(DataType::Integer);
    /// assert_eq!(entry.source_path.as_deref(), Some("person/age"));
    /// ```
    #[must_use]
    pub fn single(source_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            source_path: Some(source_path.into()),
            output_path: Some(output_path.into()),
            ..Self::default()
        }
    }

    /// An array entry without children.
    #[must_use]
    pub fn array(source_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            kind: MappingKind::Array {
                children: Vec::new(),
            },
            ..Self::single(source_path, output_path)
        }
    }

    /// An object entry without children.
    #[must_use]
    pub fn object(source_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            kind: MappingKind::Object {
                children: Vec::new(),
            },
            ..Self::single(source_path, output_path)
        }
    }

    /// A child entry placed under the leaf name of its source path.
    #[must_use]
    pub fn field(source_path: impl Into<String>) -> Self {
        Self {
            source_path: Some(source_path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, key: impl Into<String>) -> Self {
        self.transform_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach child entries.
    ///
    /// Children turn a single entry into an object entry; on array and
    /// object entries they replace the existing children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<MappingEntry>) -> Self {
        self.kind = match self.kind {
            MappingKind::Array { .. } => MappingKind::Array { children },
            MappingKind::Single | MappingKind::Object { .. } => MappingKind::Object { children },
        };
        self
    }

    /// The cardinality of this entry.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    /// Child entries (empty for single entries).
    #[must_use]
    pub fn children(&self) -> &[MappingEntry] {
        self.kind.children()
    }
}

/// A complete mapping configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ConfigurationDef", into = "ConfigurationDef")]
pub struct Configuration {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Entries, resolved in order.
    pub mappings: Vec<MappingEntry>,
    /// Named transform rules.
    pub transformations: BTreeMap<String, String>,
    /// Output path to literal, merged when the path is still absent.
    pub default_values: Map<String, Value>,
}

impl Configuration {
    /// Create a configuration from a list of entries.
    #[must_use]
    pub fn new(mappings: Vec<MappingEntry>) -> Self {
        Self {
            mappings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a named transform rule.
    #[must_use]
    pub fn with_transformation(mut self, key: impl Into<String>, rule: impl Into<String>) -> Self {
        self.transformations.insert(key.into(), rule.into());
        self
    }

    /// Add a config-level default value.
    #[must_use]
    pub fn with_default_value(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_values.insert(path.into(), value.into());
        self
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Wire shape of a mapping entry, accepting legacy key names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingEntryDef {
    #[serde(
        default,
        alias = "xmlPath",
        alias = "xmlField",
        skip_serializing_if = "Option::is_none"
    )]
    source_path: Option<String>,

    #[serde(
        default,
        alias = "jsonPath",
        alias = "jsonField",
        alias = "childJsonPath",
        skip_serializing_if = "Option::is_none"
    )]
    output_path: Option<String>,

    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    cardinality: Option<String>,

    #[serde(default, skip_serializing)]
    is_array: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_type: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,

    #[serde(default, alias = "transform", skip_serializing_if = "Option::is_none")]
    transform_key: Option<String>,

    #[serde(default, alias = "properties", skip_serializing_if = "Vec::is_empty")]
    children: Vec<MappingEntry>,
}

impl From<MappingEntryDef> for MappingEntry {
    fn from(def: MappingEntryDef) -> Self {
        let declared = def.cardinality.as_deref().and_then(|name| {
            let parsed = Cardinality::parse(name);
            if parsed.is_none() {
                tracing::debug!(cardinality = name, "Unknown cardinality, inferring from entry");
            }
            parsed
        });
        let cardinality = declared.unwrap_or(if def.is_array {
            Cardinality::Array
        } else if def.children.is_empty() {
            Cardinality::Single
        } else {
            Cardinality::Object
        });

        let kind = match cardinality {
            Cardinality::Single => {
                if !def.children.is_empty() {
                    tracing::debug!(
                        source_path = ?def.source_path,
                        "Children on a single entry are ignored"
                    );
                }
                MappingKind::Single
            }
            Cardinality::Array => MappingKind::Array {
                children: def.children,
            },
            Cardinality::Object => MappingKind::Object {
                children: def.children,
            },
        };

        Self {
            source_path: def.source_path,
            output_path: def.output_path,
            kind,
            data_type: def
                .data_type
                .as_deref()
                .map(DataType::parse)
                .unwrap_or_default(),
            required: def.required,
            default_value: def.default_value,
            transform_key: def.transform_key,
        }
    }
}

impl From<MappingEntry> for MappingEntryDef {
    fn from(entry: MappingEntry) -> Self {
        let cardinality = entry.cardinality();
        let children = match entry.kind {
            MappingKind::Single => Vec::new(),
            MappingKind::Array { children } | MappingKind::Object { children } => children,
        };

        Self {
            source_path: entry.source_path,
            output_path: entry.output_path,
            cardinality: Some(cardinality.as_str().to_string()),
            is_array: false,
            data_type: (entry.data_type != DataType::String)
                .then(|| entry.data_type.as_str().to_string()),
            required: entry.required,
            default_value: entry.default_value,
            transform_key: entry.transform_key,
            children,
        }
    }
}

/// Wire shape of a configuration, including the legacy mapping tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, alias = "unifiedMappings")]
    mappings: Vec<MappingEntry>,

    #[serde(default, skip_serializing)]
    property_mappings: Vec<MappingEntry>,

    #[serde(default, skip_serializing)]
    array_mappings: Map<String, Value>,

    #[serde(default, skip_serializing)]
    nested_property_mappings: Vec<MappingEntry>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    transformations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    default_values: Map<String, Value>,
}

impl From<ConfigurationDef> for Configuration {
    fn from(def: ConfigurationDef) -> Self {
        let mut mappings = def.mappings;
        mappings.extend(legacy::convert_property_mappings(def.property_mappings));
        mappings.extend(legacy::convert_array_mappings(&def.array_mappings));
        mappings.extend(legacy::convert_nested_mappings(def.nested_property_mappings));

        Self {
            name: def.name,
            version: def.version,
            description: def.description,
            mappings,
            transformations: def.transformations,
            default_values: def.default_values,
        }
    }
}

impl From<Configuration> for ConfigurationDef {
    fn from(config: Configuration) -> Self {
        Self {
            name: config.name,
            version: config.version,
            description: config.description,
            mappings: config.mappings,
            transformations: config.transformations,
            default_values: config.default_values,
            ..Self::default()
        }
    }
}
