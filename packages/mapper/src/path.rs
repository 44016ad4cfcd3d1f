//! Restricted path expressions over the source tree.
//!
//! Grammar:
//! - `a/b/c` is relative to the context element (or the document when no
//!   element is given); a leading `/` always starts at the document.
//! - A plain segment matches direct children with that tag name.
//! - `name[i]` selects the i-th (zero-based) direct child with that name.
//! - A segment containing `*` (without an index) matches every direct child
//!   element.
//! - A final `@name` segment selects an attribute of the matched elements.
//!
//! Intermediate segments always continue from their first match; only the
//! final segment yields every match. Unmatched or malformed paths produce an
//! empty result, never an error.

use crate::xml::{element_children, find_children, Element, SourceDocument};

/// A single value selected by a path: an element or an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Element(&'a Element),
    Attribute(&'a str),
}

/// One parsed path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'p> {
    Named(&'p str),
    Indexed(&'p str, usize),
    Wildcard,
}

/// Position of the evaluation cursor.
#[derive(Debug, Clone, Copy)]
enum Cursor<'a> {
    /// Above the document element; its only child is the document element.
    Document(&'a Element),
    Element(&'a Element),
}

impl<'a> Cursor<'a> {
    fn candidates(self) -> Vec<&'a Element> {
        match self {
            Self::Document(root) => vec![root],
            Self::Element(element) => element_children(element).collect(),
        }
    }

    /// Candidates with the given tag name.
    fn named(self, name: &str) -> Vec<&'a Element> {
        match self {
            Self::Document(root) => std::iter::once(root)
                .filter(|root| root.name() == name)
                .collect(),
            Self::Element(element) => find_children(element, name).collect(),
        }
    }

    fn itself(self) -> &'a Element {
        match self {
            Self::Document(element) | Self::Element(element) => element,
        }
    }
}

/// Evaluates path expressions against one source document.
#[derive(Debug, Clone, Copy)]
pub struct PathEvaluator<'a> {
    document: &'a SourceDocument,
}

impl<'a> PathEvaluator<'a> {
    /// Create an evaluator for a document.
    #[must_use]
    pub fn new(document: &'a SourceDocument) -> Self {
        Self { document }
    }

    /// Evaluate a path from the document.
    ///
    /// An empty path or `/` selects the document element.
    ///
    /// # Examples
    /// ```
    /// use xml_mapper::path::PathEvaluator;
    /// use xml_mapper::xml::SourceDocument;
    ///
    /// let doc = SourceDocument::parse("<a><x>1</x><x>2</x></a>").unwrap();
    /// let evaluator = PathEvaluator::new(&doc);
    ///
    /// assert_eq!(evaluator.evaluate("a/x").len(), 2);
    /// assert_eq!(evaluator.evaluate("a/x[1]")[0].text(), "2");
    /// assert!(evaluator.evaluate("a/missing").is_empty());
    /// ```
    #[must_use]
    pub fn evaluate(&self, path: &str) -> Vec<&'a Element> {
        self.evaluate_at(Cursor::Document(self.document.root()), path)
    }

    /// Evaluate a path relative to an element.
    ///
    /// An empty path selects the element itself; a leading `/` restarts at
    /// the document.
    #[must_use]
    pub fn evaluate_from(&self, context: &'a Element, path: &str) -> Vec<&'a Element> {
        self.evaluate_at(Cursor::Element(context), path)
    }

    /// Evaluate a path that may end in an `@attribute` segment.
    ///
    /// Without a context element the path is evaluated from the document.
    #[must_use]
    pub fn select(&self, context: Option<&'a Element>, path: &str) -> Vec<Selection<'a>> {
        let (element_path, attribute) = split_attribute(path);
        let elements = match context {
            Some(element) => self.evaluate_from(element, element_path),
            None => self.evaluate(element_path),
        };

        match attribute {
            Some(name) => elements
                .into_iter()
                .filter_map(|element| element.attribute(name))
                .map(Selection::Attribute)
                .collect(),
            None => elements.into_iter().map(Selection::Element).collect(),
        }
    }

    fn evaluate_at(&self, start: Cursor<'a>, path: &str) -> Vec<&'a Element> {
        let trimmed = path.trim();
        let (mut cursor, rest) = match trimmed.strip_prefix('/') {
            Some(rest) => (Cursor::Document(self.document.root()), rest),
            None => (start, trimmed),
        };

        let segments: Vec<&str> = rest
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return vec![cursor.itself()];
        }

        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            let Some(step) = parse_step(segment) else {
                tracing::debug!(path, segment, "Malformed path segment");
                return Vec::new();
            };

            let matched = apply_step(cursor, step);
            if i == last {
                return matched;
            }

            match matched.first().copied() {
                Some(first) => cursor = Cursor::Element(first),
                None => return Vec::new(),
            }
        }

        Vec::new()
    }
}

/// Split a trailing `@attribute` segment off a path.
///
/// # Examples
/// ```
/// use xml_mapper::path::split_attribute;
///
/// assert_eq!(split_attribute("library/@name"), ("library", Some("name")));
/// assert_eq!(split_attribute("library/name"), ("library/name", None));
/// assert_eq!(split_attribute("@id"), ("", Some("id")));
/// ```
#[must_use]
pub fn split_attribute(path: &str) -> (&str, Option<&str>) {
    let trimmed = path.trim();
    let (prefix, last) = match trimmed.rfind('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => ("", trimmed),
    };

    match last.strip_prefix('@') {
        Some(name) if !name.is_empty() => {
            // Keep a lone leading slash so "/@id" stays document-rooted
            let prefix = if prefix.is_empty() && trimmed.starts_with('/') {
                "/"
            } else {
                prefix
            };
            (prefix, Some(name))
        }
        _ => (trimmed, None),
    }
}

/// The element name a path ends in, without index or `@`.
///
/// Used to place child values whose mapping has no explicit output path.
#[must_use]
pub fn leaf_name(path: &str) -> Option<&str> {
    let last = path.trim().rsplit('/').find(|s| !s.trim().is_empty())?.trim();
    let last = last.strip_prefix('@').unwrap_or(last);
    let name = match last.find('[') {
        Some(pos) => &last[..pos],
        None => last,
    };
    (!name.is_empty() && !name.contains('*')).then_some(name)
}

fn parse_step(segment: &str) -> Option<Step<'_>> {
    if let Some(open) = segment.find('[') {
        let name = &segment[..open];
        let index = segment[open + 1..].strip_suffix(']')?.trim().parse().ok()?;
        if name.is_empty() {
            return None;
        }
        return Some(Step::Indexed(name, index));
    }

    if segment.contains('*') {
        return Some(Step::Wildcard);
    }

    if segment.contains(']') || segment.starts_with('@') {
        return None;
    }

    Some(Step::Named(segment))
}

fn apply_step<'a>(cursor: Cursor<'a>, step: Step<'_>) -> Vec<&'a Element> {
    match step {
        Step::Named(name) => cursor.named(name),
        Step::Indexed(name, index) => cursor
            .named(name)
            .into_iter()
            .nth(index)
            .into_iter()
            .collect(),
        Step::Wildcard => cursor.candidates(),
    }
}
