//! Text transform trait definition.

/// A string-to-string transform.
///
/// Transforms are total: they never fail and return the input unchanged
/// when there is nothing to do.
pub trait TextTransform: Send + Sync {
    /// Apply the transform to a value.
    fn apply(&self, value: &str) -> String;
}

impl<F> TextTransform for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply(&self, value: &str) -> String {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reverse;

    impl TextTransform for Reverse {
        fn apply(&self, value: &str) -> String {
            value.chars().rev().collect()
        }
    }

    #[test]
    fn test_handler_trait() {
        assert_eq!(Reverse.apply("abc"), "cba");
    }

    #[test]
    fn test_closure_is_a_transform() {
        let exclaim = |value: &str| format!("{value}!");
        assert_eq!(exclaim.apply("hi"), "hi!");
    }
}
