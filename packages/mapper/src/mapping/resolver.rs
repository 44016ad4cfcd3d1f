//! Mapping resolution: source tree + configuration to output tree.

use serde_json::{Map, Value};

use super::types::{Configuration, MappingEntry, MappingKind};
use crate::coerce::coerce_value;
use crate::config::MAX_MAPPING_DEPTH;
use crate::output::{insert_or_promote, merge_default_if_absent, set_path};
use crate::path::{leaf_name, PathEvaluator, Selection};
use crate::transform::TransformRegistry;
use crate::xml::{element_children, Element, SourceDocument};

/// Name of the attribute that overrides an element's text as its value.
const VALUE_ATTRIBUTE: &str = "value";

/// Result of resolving one document against one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    /// The output tree (always an object).
    pub output: Value,
    /// Skipped entries and missing required fields.
    pub warnings: Vec<String>,
}

impl TransformReport {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// State threaded through one resolution.
struct ResolveContext<'a, 'c> {
    evaluator: PathEvaluator<'a>,
    config: &'c Configuration,
    warnings: Vec<String>,
}

impl ResolveContext<'_, '_> {
    fn warn(&mut self, source_path: &str, message: &str) {
        tracing::warn!(source_path = %source_path, "{message}");
        self.warnings.push(format!("{source_path}: {message}"));
    }
}

/// Resolves configurations against source documents.
///
/// The resolver holds no per-call state; one instance can serve any number
/// of concurrent resolutions.
#[derive(Debug, Clone, Copy)]
pub struct MappingResolver<'r> {
    registry: &'r TransformRegistry,
}

impl<'r> MappingResolver<'r> {
    /// Create a resolver that applies transforms from `registry`.
    #[must_use]
    pub fn new(registry: &'r TransformRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every entry of `config` against `document`.
    ///
    /// Entries are processed in order; later writes to the same output path
    /// replace earlier ones. Afterwards config-level default values fill
    /// absent paths and the transform table is applied to top-level string
    /// fields whose key names a transform.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use xml_mapper::coerce::DataType;
    /// use xml_mapper::mapping::{Configuration, MappingEntry, MappingResolver};
    /// use xml_mapper::transform::create_builtin_registry;
    /// use xml_mapper::xml::SourceDocument;
    ///
    /// let doc = SourceDocument::parse("<person><age>30</age></person>").unwrap();
    /// let config = Configuration::new(vec![
    ///     MappingEntry::single("person/age", "age").with_data_type(DataType::Integer),
    /// ]);
    ///
    /// let registry = create_builtin_registry();
    /// let report = MappingResolver::new(&registry).resolve(&doc, &config);
    /// assert_eq!(report.output, json!({"age": 30}));
    /// ```
    #[must_use]
    pub fn resolve(&self, document: &SourceDocument, config: &Configuration) -> TransformReport {
        let mut ctx = ResolveContext {
            evaluator: PathEvaluator::new(document),
            config,
            warnings: Vec::new(),
        };

        let mut root = Map::new();
        for entry in &config.mappings {
            self.resolve_entry(&mut ctx, None, entry, &mut root, 0);
        }

        apply_default_values(&mut root, config);
        self.apply_table_transforms(&mut root, config);

        tracing::debug!(
            entries = config.mappings.len(),
            fields = root.len(),
            warnings = ctx.warnings.len(),
            "Resolved configuration"
        );

        TransformReport {
            output: Value::Object(root),
            warnings: ctx.warnings,
        }
    }

    /// Resolve one entry and write its value into `target`.
    ///
    /// `context` is `None` for top-level entries and the matched element for
    /// child entries.
    fn resolve_entry<'a>(
        &self,
        ctx: &mut ResolveContext<'a, '_>,
        context: Option<&'a Element>,
        entry: &MappingEntry,
        target: &mut Map<String, Value>,
        depth: usize,
    ) {
        let Some(source_path) = non_empty(entry.source_path.as_deref()) else {
            let label = entry.output_path.as_deref().unwrap_or("<unnamed>");
            ctx.warn(label, "Mapping entry without source path skipped");
            return;
        };

        let output_path = non_empty(entry.output_path.as_deref())
            .or_else(|| context.and_then(|_| leaf_name(source_path)));
        let Some(output_path) = output_path else {
            ctx.warn(source_path, "Mapping entry without output path skipped");
            return;
        };

        if depth > MAX_MAPPING_DEPTH {
            ctx.warn(source_path, "Mapping nested too deeply, entry skipped");
            return;
        }

        let selections = select(ctx, context, source_path);
        let top_level = context.is_none();

        let value = match &entry.kind {
            MappingKind::Single => {
                self.resolve_single(ctx.config, entry, top_level, output_path, selections.first())
            }
            MappingKind::Array { children } if children.is_empty() => {
                self.resolve_scalar_array(ctx.config, entry, &selections)
            }
            MappingKind::Array { children } => {
                self.resolve_object_array(ctx, children, &selections, depth)
            }
            MappingKind::Object { children } if children.is_empty() => first_element(&selections)
                .map(copy_children)
                .filter(|object| !object.is_empty())
                .map(Value::Object),
            MappingKind::Object { children } => first_element(&selections)
                .map(|element| self.build_object(ctx, element, children, depth))
                .filter(|object| !object.is_empty())
                .map(Value::Object),
        };

        match value {
            Some(value) => {
                if !set_path(target, output_path, value) {
                    ctx.warn(source_path, "Invalid output path, entry skipped");
                }
            }
            None if entry.required => {
                ctx.warn(source_path, "Required field is missing");
            }
            None => {}
        }
    }

    /// First match as one value, with default substitution when absent.
    fn resolve_single(
        &self,
        config: &Configuration,
        entry: &MappingEntry,
        top_level: bool,
        output_path: &str,
        first: Option<&Selection<'_>>,
    ) -> Option<Value> {
        let raw = match first {
            Some(selection) => selection_value(selection),
            None => return default_for(config, entry, top_level, output_path),
        };

        match raw {
            Value::String(text) if text.trim().is_empty() => {
                default_for(config, entry, top_level, output_path)
            }
            Value::String(text) => Some(self.finish_scalar(config, entry, &text)),
            structured => Some(structured),
        }
    }

    /// One value per match; never an empty array.
    fn resolve_scalar_array(
        &self,
        config: &Configuration,
        entry: &MappingEntry,
        selections: &[Selection<'_>],
    ) -> Option<Value> {
        let items: Vec<Value> = selections
            .iter()
            .map(|selection| match selection_value(selection) {
                Value::String(text) => self.finish_scalar(config, entry, &text),
                structured => structured,
            })
            .collect();

        (!items.is_empty()).then_some(Value::Array(items))
    }

    /// One object per matched element; never an empty array.
    fn resolve_object_array<'a>(
        &self,
        ctx: &mut ResolveContext<'a, '_>,
        children: &[MappingEntry],
        selections: &[Selection<'a>],
        depth: usize,
    ) -> Option<Value> {
        let items: Vec<Value> = selections
            .iter()
            .filter_map(|selection| match selection {
                Selection::Element(element) => Some(*element),
                Selection::Attribute(_) => None,
            })
            .map(|element| Value::Object(self.build_object(ctx, element, children, depth)))
            .collect();

        (!items.is_empty()).then_some(Value::Array(items))
    }

    /// Build an object by resolving `children` relative to `element`.
    fn build_object<'a>(
        &self,
        ctx: &mut ResolveContext<'a, '_>,
        element: &'a Element,
        children: &[MappingEntry],
        depth: usize,
    ) -> Map<String, Value> {
        let mut object = Map::new();
        for child in children {
            self.resolve_entry(ctx, Some(element), child, &mut object, depth + 1);
        }
        object
    }

    /// Apply the entry's transform, then coerce by its data type.
    fn finish_scalar(&self, config: &Configuration, entry: &MappingEntry, text: &str) -> Value {
        match entry.transform_key.as_deref() {
            Some(key) => {
                let transformed = self.registry.apply_keyed(text, key, &config.transformations);
                coerce_value(&transformed, entry.data_type)
            }
            None => coerce_value(text, entry.data_type),
        }
    }

    fn apply_table_transforms(&self, root: &mut Map<String, Value>, config: &Configuration) {
        if config.transformations.is_empty() {
            return;
        }
        for (key, value) in root.iter_mut() {
            let Value::String(text) = value else {
                continue;
            };
            if let Some(rule) = config.transformations.get(key) {
                *text = self.registry.apply(text, rule);
            }
        }
    }
}

/// Merge config-level defaults into paths that are still absent.
fn apply_default_values(root: &mut Map<String, Value>, config: &Configuration) {
    for (path, value) in &config.default_values {
        if merge_default_if_absent(root, path, value.clone()) {
            tracing::debug!(path = %path, "Applied default value");
        }
    }
}

/// Default for an absent value.
///
/// A string entry default is coerced by the entry's data type; other
/// literals are used as-is. Top-level entries fall back to the config-level
/// default for their output path.
fn default_for(
    config: &Configuration,
    entry: &MappingEntry,
    top_level: bool,
    output_path: &str,
) -> Option<Value> {
    if let Some(default) = &entry.default_value {
        return Some(match default {
            Value::String(text) => coerce_value(text, entry.data_type),
            literal => literal.clone(),
        });
    }
    if top_level {
        return config.default_values.get(output_path).cloned();
    }
    None
}

/// Evaluate an entry's source path.
///
/// Inside a child mapping, a plain name that matches no child element falls
/// back to the attribute of that name on the context element.
fn select<'a>(
    ctx: &ResolveContext<'a, '_>,
    context: Option<&'a Element>,
    path: &str,
) -> Vec<Selection<'a>> {
    let selections = ctx.evaluator.select(context, path);
    if !selections.is_empty() {
        return selections;
    }

    match context {
        Some(element) if is_plain_name(path) => element
            .attribute(path)
            .map(|value| vec![Selection::Attribute(value)])
            .unwrap_or_default(),
        _ => selections,
    }
}

fn is_plain_name(path: &str) -> bool {
    !path.contains(['/', '[', ']', '@', '*'])
}

fn first_element<'a>(selections: &[Selection<'a>]) -> Option<&'a Element> {
    selections.iter().find_map(|selection| match selection {
        Selection::Element(element) => Some(*element),
        Selection::Attribute(_) => None,
    })
}

fn selection_value(selection: &Selection<'_>) -> Value {
    match selection {
        Selection::Element(element) => extract_element_value(element),
        Selection::Attribute(value) => Value::String((*value).to_string()),
    }
}

/// The value of an element.
///
/// The `value` attribute wins; otherwise an element without element
/// children yields its text, and any other element becomes an object of its
/// children with repeated names promoted to arrays.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use xml_mapper::mapping::extract_element_value;
/// use xml_mapper::xml::SourceDocument;
///
/// let doc = SourceDocument::parse("<a><x>1</x><x>2</x><y value=\"v\">ignored</y></a>").unwrap();
/// assert_eq!(extract_element_value(doc.root()), json!({"x": ["1", "2"], "y": "v"}));
/// ```
#[must_use]
pub fn extract_element_value(element: &Element) -> Value {
    if let Some(value) = element.attribute(VALUE_ATTRIBUTE) {
        return Value::String(value.to_string());
    }
    if let Some(text) = element.only_text() {
        return Value::String(text.to_string());
    }
    if !element.has_element_children() {
        return Value::String(element.text());
    }
    Value::Object(copy_children(element))
}

/// Copy direct child elements by name, promoting repeated names to arrays.
fn copy_children(element: &Element) -> Map<String, Value> {
    let mut object = Map::new();
    for child in element_children(element) {
        insert_or_promote(&mut object, child.name(), extract_element_value(child));
    }
    object
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
