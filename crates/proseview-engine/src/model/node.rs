use serde_json::{Map, Value};

/// Attribute bag carried by nodes and marks.
pub type Attrs = Map<String, Value>;

/// An inline annotation applied to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub type_name: String,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attrs: Attrs::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }
}

/// A document node. Read-only input to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub type_name: String,
    pub is_inline: bool,
    pub is_leaf: bool,
    pub attrs: Attrs,
    pub marks: Vec<Mark>,
    pub text: Option<String>,
    pub content: Fragment,
}

impl Node {
    /// A block node with the given content.
    pub fn new(type_name: impl Into<String>, content: impl Into<Fragment>) -> Self {
        Self {
            type_name: type_name.into(),
            is_inline: false,
            is_leaf: false,
            attrs: Attrs::new(),
            marks: Vec::new(),
            text: None,
            content: content.into(),
        }
    }

    /// A block node that cannot hold content.
    pub fn leaf(type_name: impl Into<String>) -> Self {
        Self {
            is_leaf: true,
            ..Self::new(type_name, Fragment::empty())
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_inline: true,
            is_leaf: true,
            text: Some(text.into()),
            ..Self::new("text", Fragment::empty())
        }
    }

    pub fn inline(mut self) -> Self {
        self.is_inline = true;
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.content.iter().map(Node::text_content).collect(),
        }
    }
}

/// An ordered, possibly empty, sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment(Vec<Node>);

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Fragment(nodes)
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Fragment(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
