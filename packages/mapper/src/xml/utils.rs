//! Navigation helpers over the owned source tree.

use super::tree::Element;

/// Get all element children of an element.
///
/// # Returns
/// Iterator over element children (excludes text nodes)
pub fn element_children(element: &Element) -> impl Iterator<Item = &Element> {
    element.children().iter().filter_map(|child| child.as_element())
}

/// Find all direct child elements with the given tag name.
///
/// Only immediate children match; deeper descendants with the same name
/// are not returned.
///
/// # Examples
/// ```
/// use xml_mapper::xml::{find_children, SourceDocument};
///
/// let doc = SourceDocument::parse("<root><item>1</item><item>2</item><other/></root>").unwrap();
///
/// let items: Vec<_> = find_children(doc.root(), "item").collect();
/// assert_eq!(items.len(), 2);
/// ```
pub fn find_children<'a, 't>(
    element: &'a Element,
    tag: &'t str,
) -> impl Iterator<Item = &'a Element> + 't
where
    'a: 't,
{
    element_children(element).filter(move |child| child.name() == tag)
}
