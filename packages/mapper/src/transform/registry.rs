//! Transform registry mapping rule names to transforms.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use super::builtins::ReplaceRule;
use super::handler::TextTransform;

/// Registry mapping transform names to implementations.
///
/// Names are matched case-insensitively. Rules the registry does not know
/// are a no-op.
pub struct TransformRegistry {
    transforms: HashMap<String, Box<dyn TextTransform>>,
}

impl TransformRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register a transform under a name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, transform: impl TextTransform + 'static) {
        self.transforms
            .insert(name.into().to_lowercase(), Box::new(transform));
    }

    /// Check if a transform is registered under a name.
    #[must_use]
    pub fn has_transform(&self, name: &str) -> bool {
        self.transforms.contains_key(&name.trim().to_lowercase())
    }

    /// Return set of all registered names.
    #[must_use]
    pub fn registered_names(&self) -> HashSet<&str> {
        self.transforms.keys().map(|s| s.as_str()).collect()
    }

    /// Apply a rule string to a value.
    ///
    /// `replace:<from>-><to>` is parsed inline (case-sensitive prefix);
    /// anything else is looked up by name. Unknown or malformed rules return
    /// the value unchanged.
    #[must_use]
    pub fn apply(&self, value: &str, rule: &str) -> String {
        if rule.starts_with(ReplaceRule::PREFIX) {
            return match ReplaceRule::from_rule(rule) {
                Some(replace) => replace.apply(value),
                None => {
                    tracing::debug!(rule, "Malformed replace rule, value unchanged");
                    value.to_string()
                }
            };
        }

        match self.transforms.get(&rule.trim().to_lowercase()) {
            Some(transform) => transform.apply(value),
            None => {
                tracing::debug!(rule, "Unknown transform rule, value unchanged");
                value.to_string()
            }
        }
    }

    /// Resolve a transform key through a configuration table, then apply it.
    #[must_use]
    pub fn apply_keyed(&self, value: &str, key: &str, table: &BTreeMap<String, String>) -> String {
        self.apply(value, resolve_rule(key, table))
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.registered_names().into_iter().collect();
        names.sort_unstable();
        f.debug_struct("TransformRegistry")
            .field("transforms", &names)
            .finish()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a transform key to a rule string.
///
/// The configuration table wins; otherwise the key itself is the rule.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use xml_mapper::transform::resolve_rule;
///
/// let mut table = BTreeMap::new();
/// table.insert("slashDates".to_string(), "replace:-->/".to_string());
///
/// assert_eq!(resolve_rule("slashDates", &table), "replace:-->/");
/// assert_eq!(resolve_rule("uppercase", &table), "uppercase");
/// ```
#[must_use]
pub fn resolve_rule<'a>(key: &'a str, table: &'a BTreeMap<String, String>) -> &'a str {
    table.get(key).map_or(key, String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::create_builtin_registry;

    #[test]
    fn test_registry_register_and_apply() {
        let mut registry = TransformRegistry::new();
        registry.register("Shout", |value: &str| format!("{}!", value.to_uppercase()));

        assert!(registry.has_transform("shout"));
        assert_eq!(registry.apply("hey", "SHOUT"), "HEY!");
    }

    #[test]
    fn test_builtin_names_case_insensitive() {
        let registry = create_builtin_registry();

        assert_eq!(registry.apply("Abc", "UPPERCASE"), "ABC");
        assert_eq!(registry.apply("Abc", "Lowercase"), "abc");
        assert_eq!(registry.apply("  x ", " trim "), "x");
        assert_eq!(registry.apply("jOHN", "capitalize"), "John");
    }

    #[test]
    fn test_unknown_rule_is_noop() {
        let registry = create_builtin_registry();
        assert_eq!(registry.apply("Value", "reverse"), "Value");
        assert_eq!(registry.apply("Value", ""), "Value");
    }

    #[test]
    fn test_replace_prefix_is_case_sensitive() {
        let registry = create_builtin_registry();

        assert_eq!(registry.apply("a-b", "replace:-->_"), "a_b");
        assert_eq!(registry.apply("a-b", "REPLACE:-->_"), "a-b");
        assert_eq!(registry.apply("a-b", "replace:nothing"), "a-b");
    }

    #[test]
    fn test_apply_keyed_prefers_table() {
        let registry = create_builtin_registry();
        let mut table = BTreeMap::new();
        table.insert("lowercase".to_string(), "uppercase".to_string());

        assert_eq!(registry.apply_keyed("MiXed", "lowercase", &table), "MIXED");
        assert_eq!(registry.apply_keyed("MiXed", "trim", &table), "MiXed");
    }
}
