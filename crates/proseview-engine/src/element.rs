//! The rendered element tree.
//!
//! Elements are plain descriptions: building one never touches a display
//! surface. Everything is constructed through [`create_element`], which
//! mirrors the `(tag, props, children)` primitive of virtual-DOM libraries.

use std::collections::BTreeMap;

/// Properties of a constructed element.
///
/// The element model keeps the class list in its own slot, so the `class`
/// attribute of an output spec lands in `class_name` and never in
/// `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    pub class_name: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build props from output-spec attributes, moving `class` into the class slot.
    pub fn from_spec_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let mut props = Props::new();
        for (name, value) in attrs {
            if name == "class" {
                props.class_name = Some(value.clone());
            } else {
                props.attributes.insert(name.clone(), value.clone());
            }
        }
        props
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: String,
    pub props: Option<Props>,
    pub children: Option<Vec<Element>>,
}

impl ElementNode {
    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn class_name(&self) -> Option<&str> {
        self.props.as_ref()?.class_name.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.props.as_ref()?.get(name)
    }
}

/// A node of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text(String),
    /// An ordered group of siblings with no wrapper of its own.
    Fragment(Vec<Element>),
    Node(ElementNode),
}

/// Construct an element. An empty child list is stored as `None`.
pub fn create_element(
    tag: impl Into<String>,
    props: Option<Props>,
    children: Option<Vec<Element>>,
) -> Element {
    Element::Node(ElementNode {
        tag: tag.into(),
        props,
        children: children.filter(|c| !c.is_empty()),
    })
}

impl Element {
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    pub fn fragment(children: Vec<Element>) -> Self {
        Element::Fragment(children)
    }

    /// True when nothing would be displayed: empty text or an empty fragment.
    pub fn is_empty(&self) -> bool {
        match self {
            Element::Text(text) => text.is_empty(),
            Element::Fragment(children) => children.is_empty(),
            Element::Node(_) => false,
        }
    }

    pub fn as_node(&self) -> Option<&ElementNode> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_node().map(|n| n.tag.as_str())
    }

    /// Concatenated text of the whole subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Element::Text(text) => out.push_str(text),
            Element::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
            Element::Node(node) => node.children().iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::Text(text.to_string())
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}
