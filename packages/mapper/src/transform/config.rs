//! Registry configuration for the built-in transforms.

use super::builtins::{CapitalizeTransform, LowercaseTransform, TrimTransform, UppercaseTransform};
use super::registry::TransformRegistry;

/// Create a registry with the built-in named transforms.
///
/// `replace:` rules need no registration; they are parsed when applied.
#[must_use]
pub fn create_builtin_registry() -> TransformRegistry {
    let mut registry = TransformRegistry::new();

    registry.register("uppercase", UppercaseTransform);
    registry.register("lowercase", LowercaseTransform);
    registry.register("trim", TrimTransform);
    registry.register("capitalize", CapitalizeTransform);

    registry
}
