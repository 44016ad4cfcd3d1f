//! Owned source tree built from parsed markup.

use roxmltree::{Document, Node, ParsingOptions};

use crate::config::{MAX_SOURCE_DEPTH, MAX_SOURCE_NODES, MAX_SOURCE_SIZE};
use crate::error::{MapperError, Result};

/// A node of the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNode {
    /// An element with a tag name, attributes and children.
    Element(Element),
    /// A run of character data (text or CDATA).
    Text(String),
}

impl SourceNode {
    /// The element behind this node, if it is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// The text behind this node, if it is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Element(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// An element of the source tree.
///
/// Attributes keep document order. The tag name is the local name; namespace
/// prefixes are not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<SourceNode>,
}

impl Element {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(SourceNode::Element(child));
        self
    }

    /// Builder: append a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(SourceNode::Text(text.into()));
        self
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// All child nodes, text included.
    #[must_use]
    pub fn children(&self) -> &[SourceNode] {
        &self.children
    }

    /// Whether any child is an element.
    #[must_use]
    pub fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, SourceNode::Element(_)))
    }

    /// Concatenated direct text children, untrimmed.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(SourceNode::as_text)
            .collect()
    }

    /// The text of the only child, when that child is a text node.
    #[must_use]
    pub fn only_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [SourceNode::Text(text)] => Some(text),
            _ => None,
        }
    }
}

/// A parsed source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    root: Element,
}

impl SourceDocument {
    /// Wrap an already-built document element.
    #[must_use]
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Parse markup into an owned source tree.
    ///
    /// Any parse failure, DTD, or bound violation is fatal; no partial tree
    /// is ever returned.
    ///
    /// # Examples
    /// ```
    /// use xml_mapper::xml::SourceDocument;
    ///
    /// let doc = SourceDocument::parse("<person><name>Ann</name></person>").unwrap();
    /// assert_eq!(doc.root().name(), "person");
    /// assert!(SourceDocument::parse("<person><name>Ann</person>").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() > MAX_SOURCE_SIZE {
            return Err(MapperError::SourceTooLarge {
                size: text.len(),
                max: MAX_SOURCE_SIZE,
            });
        }

        let mut options = ParsingOptions::default();
        options.allow_dtd = false;
        options.nodes_limit = MAX_SOURCE_NODES;

        let doc = Document::parse_with_options(text, options)?;
        let root = convert_element(doc.root_element(), 1)?;

        tracing::debug!(root = %root.name, bytes = text.len(), "Parsed source document");
        Ok(Self { root })
    }

    /// The document element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Convert a roxmltree element and its subtree.
fn convert_element(node: Node<'_, '_>, depth: usize) -> Result<Element> {
    if depth > MAX_SOURCE_DEPTH {
        return Err(MapperError::SourceTooDeep {
            max: MAX_SOURCE_DEPTH,
        });
    }

    let attributes = node
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(SourceNode::Element(convert_element(child, depth + 1)?));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            // roxmltree may split character data around entities and CDATA
            if let Some(SourceNode::Text(previous)) = children.last_mut() {
                previous.push_str(text);
            } else {
                children.push(SourceNode::Text(text.to_string()));
            }
        }
    }

    Ok(Element {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let doc = SourceDocument::parse(r#"<a id="1"><b>x</b><c/></a>"#).unwrap();
        let root = doc.root();

        assert_eq!(root.name(), "a");
        assert_eq!(root.attribute("id"), Some("1"));
        assert_eq!(root.children().len(), 2);
        assert!(root.has_element_children());
    }

    #[test]
    fn test_parse_keeps_text_and_attributes_in_order() {
        let doc = SourceDocument::parse(r#"<a z="1" y="2">hello</a>"#).unwrap();
        let attrs: Vec<_> = doc.root().attributes().collect();

        assert_eq!(attrs, vec![("z", "1"), ("y", "2")]);
        assert_eq!(doc.root().only_text(), Some("hello"));
    }

    #[test]
    fn test_parse_drops_comments() {
        let doc = SourceDocument::parse("<a><!-- note -->text</a>").unwrap();
        assert_eq!(doc.root().only_text(), Some("text"));
    }

    #[test]
    fn test_parse_merges_cdata_with_text() {
        let doc = SourceDocument::parse("<a>one <![CDATA[<two>]]> three</a>").unwrap();
        assert_eq!(doc.root().text(), "one <two> three");
    }

    #[test]
    fn test_parse_namespaced_uses_local_name() {
        let doc =
            SourceDocument::parse(r#"<ns:a xmlns:ns="http://example.com"><ns:b/></ns:a>"#).unwrap();
        assert_eq!(doc.root().name(), "a");
    }

    #[test]
    fn test_parse_unterminated_tag_fails() {
        let err = SourceDocument::parse("<person><name>John</person>").unwrap_err();
        assert!(matches!(err, MapperError::SourceParse(_)));
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(SourceDocument::parse("").is_err());
        assert!(SourceDocument::parse("not markup").is_err());
    }

    #[test]
    fn test_parse_too_deep_fails() {
        let depth = MAX_SOURCE_DEPTH + 1;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let err = SourceDocument::parse(&xml).unwrap_err();
        assert!(matches!(err, MapperError::SourceTooDeep { .. }));
    }

    #[test]
    fn test_builder_matches_parsed_tree() {
        let built = Element::new("a")
            .with_attribute("id", "1")
            .with_child(Element::new("b").with_text("x"));
        let parsed = SourceDocument::parse(r#"<a id="1"><b>x</b></a>"#).unwrap();

        assert_eq!(parsed.root(), &built);
    }

    #[test]
    fn test_only_text_requires_single_text_child() {
        let mixed = Element::new("a")
            .with_text("x")
            .with_child(Element::new("b"));
        assert_eq!(mixed.only_text(), None);
        assert_eq!(Element::new("empty").only_text(), None);
    }
}
