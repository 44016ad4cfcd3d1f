//! Named string transforms applied to scalar values before coercion.
//!
//! Transforms are looked up by name in a [`TransformRegistry`]. A mapping's
//! transform key is first resolved through the configuration's transform
//! table and otherwise used as a rule directly, so `"uppercase"` works
//! without a table entry. The `replace:<from>-><to>` form is parsed inline.

mod builtins;
mod config;
mod handler;
mod registry;

pub use builtins::{
    CapitalizeTransform, LowercaseTransform, ReplaceRule, TrimTransform, UppercaseTransform,
};
pub use config::create_builtin_registry;
pub use handler::TextTransform;
pub use registry::{resolve_rule, TransformRegistry};
