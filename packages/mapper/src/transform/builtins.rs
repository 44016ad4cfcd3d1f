//! Built-in text transforms.

use super::handler::TextTransform;

/// Upper-cases the whole value.
pub struct UppercaseTransform;

impl TextTransform for UppercaseTransform {
    fn apply(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

/// Lower-cases the whole value.
pub struct LowercaseTransform;

impl TextTransform for LowercaseTransform {
    fn apply(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

/// Strips leading and trailing whitespace.
pub struct TrimTransform;

impl TextTransform for TrimTransform {
    fn apply(&self, value: &str) -> String {
        value.trim().to_string()
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub struct CapitalizeTransform;

impl TextTransform for CapitalizeTransform {
    fn apply(&self, value: &str) -> String {
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.as_str().to_lowercase().chars())
                .collect(),
            None => String::new(),
        }
    }
}

/// A literal substring replacement parsed from `replace:<from>-><to>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRule {
    from: String,
    to: String,
}

impl ReplaceRule {
    /// Rule prefix.
    pub const PREFIX: &'static str = "replace:";

    /// Parse the part after `replace:`.
    ///
    /// The first `->` splits the pattern from the replacement. Returns `None`
    /// when there is no `->` or the pattern is empty.
    ///
    /// # Examples
    /// ```
    /// use xml_mapper::transform::{ReplaceRule, TextTransform};
    ///
    /// let rule = ReplaceRule::parse("-->/").unwrap();
    /// assert_eq!(rule.apply("2024-01-31"), "2024/01/31");
    /// assert!(ReplaceRule::parse("no arrow").is_none());
    /// ```
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let (from, to) = body.split_once("->")?;
        if from.is_empty() {
            return None;
        }
        Some(Self {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Parse a full rule string, including the `replace:` prefix.
    #[must_use]
    pub fn from_rule(rule: &str) -> Option<Self> {
        rule.strip_prefix(Self::PREFIX).and_then(Self::parse)
    }
}

impl TextTransform for ReplaceRule {
    fn apply(&self, value: &str) -> String {
        value.replace(&self.from, &self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_transforms() {
        assert_eq!(UppercaseTransform.apply("Hello"), "HELLO");
        assert_eq!(LowercaseTransform.apply("JOHN.DOE@EXAMPLE.COM"), "john.doe@example.com");
    }

    #[test]
    fn test_trim() {
        assert_eq!(TrimTransform.apply("  padded \n"), "padded");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(CapitalizeTransform.apply("hELLO wORLD"), "Hello world");
        assert_eq!(CapitalizeTransform.apply("é"), "É");
        assert_eq!(CapitalizeTransform.apply(""), "");
    }

    #[test]
    fn test_replace_all_occurrences() {
        let rule = ReplaceRule::parse(" ->_").unwrap();
        assert_eq!(rule.apply("a b c"), "a_b_c");

        let rule = ReplaceRule::parse("-->").unwrap();
        assert_eq!(rule.apply("a-b-c"), "a>b>c");
    }

    #[test]
    fn test_replace_first_arrow_splits() {
        let rule = ReplaceRule::parse("a->b->c").unwrap();
        assert_eq!(rule.apply("xa"), "xb->c");
    }

    #[test]
    fn test_replace_with_empty_target_deletes() {
        let rule = ReplaceRule::parse("-->").unwrap();
        assert_eq!(rule.apply("1-2"), "1>2");
        let rule = ReplaceRule::parse("x->").unwrap();
        assert_eq!(rule.apply("axbx"), "ab");
    }

    #[test]
    fn test_replace_malformed() {
        assert!(ReplaceRule::parse("abc").is_none());
        assert!(ReplaceRule::parse("->x").is_none());
        assert!(ReplaceRule::from_rule("uppercase").is_none());
        assert!(ReplaceRule::from_rule("replace:a->b").is_some());
    }
}
