use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::factories::{MarkElementFactory, NodeElementFactory};
use crate::model::node::{Attrs, Fragment, Mark, Node};
use crate::spec::OutputSpec;

/// Produces a declarative spec for a node.
pub type NodeSpecFn = Arc<dyn Fn(&Node) -> OutputSpec + Send + Sync>;
/// Produces a declarative spec for a mark; the flag says whether it wraps inline content.
pub type MarkSpecFn = Arc<dyn Fn(&Mark, bool) -> OutputSpec + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),
    #[error("unknown mark type `{0}`")]
    UnknownMarkType(String),
    #[error("text node without text")]
    MissingText,
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How nodes of one type are described and rendered.
#[derive(Clone, Default)]
pub struct NodeSpec {
    /// Content expression; absent or empty means the type is a leaf.
    pub content: Option<String>,
    pub inline: bool,
    /// Full control over the rendered element. Wins over `to_output_spec`.
    pub to_factory: Option<NodeElementFactory>,
    pub to_output_spec: Option<NodeSpecFn>,
}

impl NodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, expr: impl Into<String>) -> Self {
        self.content = Some(expr.into());
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn to_output_spec<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> OutputSpec + Send + Sync + 'static,
    {
        self.to_output_spec = Some(Arc::new(f));
        self
    }

    pub fn to_factory(mut self, factory: NodeElementFactory) -> Self {
        self.to_factory = Some(factory);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty)
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("content", &self.content)
            .field("inline", &self.inline)
            .field("to_factory", &self.to_factory.is_some())
            .field("to_output_spec", &self.to_output_spec.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct MarkSpec {
    pub to_factory: Option<MarkElementFactory>,
    pub to_output_spec: Option<MarkSpecFn>,
}

impl MarkSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_output_spec<F>(mut self, f: F) -> Self
    where
        F: Fn(&Mark, bool) -> OutputSpec + Send + Sync + 'static,
    {
        self.to_output_spec = Some(Arc::new(f));
        self
    }

    pub fn to_factory(mut self, factory: MarkElementFactory) -> Self {
        self.to_factory = Some(factory);
        self
    }
}

impl fmt::Debug for MarkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkSpec")
            .field("to_factory", &self.to_factory.is_some())
            .field("to_output_spec", &self.to_output_spec.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct NodeType {
    pub name: String,
    pub spec: NodeSpec,
}

impl NodeType {
    pub fn is_inline(&self) -> bool {
        self.name == "text" || self.spec.inline
    }

    pub fn is_leaf(&self) -> bool {
        self.spec.is_leaf()
    }
}

#[derive(Debug, Clone)]
pub struct MarkType {
    pub name: String,
    pub spec: MarkSpec,
}

/// Node and mark types by name.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub nodes: BTreeMap<String, NodeType>,
    pub marks: BTreeMap<String, MarkType>,
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn node(mut self, name: impl Into<String>, spec: NodeSpec) -> Self {
        let name = name.into();
        self.schema
            .nodes
            .insert(name.clone(), NodeType { name, spec });
        self
    }

    pub fn mark(mut self, name: impl Into<String>, spec: MarkSpec) -> Self {
        let name = name.into();
        self.schema
            .marks
            .insert(name.clone(), MarkType { name, spec });
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

#[derive(Debug, Deserialize)]
struct NodeJson {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    attrs: Attrs,
    #[serde(default)]
    content: Vec<NodeJson>,
    #[serde(default)]
    marks: Vec<MarkJson>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarkJson {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    attrs: Attrs,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn node_type(&self, name: &str) -> Result<&NodeType, SchemaError> {
        self.nodes
            .get(name)
            .ok_or_else(|| SchemaError::UnknownNodeType(name.to_string()))
    }

    pub fn mark_type(&self, name: &str) -> Result<&MarkType, SchemaError> {
        self.marks
            .get(name)
            .ok_or_else(|| SchemaError::UnknownMarkType(name.to_string()))
    }

    /// Create a node of a declared type, taking inline/leaf flags from the schema.
    pub fn node(
        &self,
        type_name: &str,
        attrs: Attrs,
        content: impl Into<Fragment>,
        marks: Vec<Mark>,
    ) -> Result<Node, SchemaError> {
        let node_type = self.node_type(type_name)?;
        Ok(Node {
            type_name: node_type.name.clone(),
            is_inline: node_type.is_inline(),
            is_leaf: node_type.is_leaf(),
            attrs,
            marks,
            text: None,
            content: content.into(),
        })
    }

    pub fn text(&self, text: impl Into<String>, marks: Vec<Mark>) -> Result<Node, SchemaError> {
        let mut node = self.node("text", Attrs::new(), Fragment::empty(), marks)?;
        node.text = Some(text.into());
        Ok(node)
    }

    pub fn mark(&self, type_name: &str) -> Result<Mark, SchemaError> {
        let mark_type = self.mark_type(type_name)?;
        Ok(Mark::new(mark_type.name.clone()))
    }

    /// Resolve a document in ProseMirror's JSON form against this schema.
    pub fn node_from_json(&self, value: &Value) -> Result<Node, SchemaError> {
        let json = NodeJson::deserialize(value)?;
        self.resolve(json)
    }

    pub fn node_from_json_str(&self, json: &str) -> Result<Node, SchemaError> {
        let json: NodeJson = serde_json::from_str(json)?;
        self.resolve(json)
    }

    fn resolve(&self, json: NodeJson) -> Result<Node, SchemaError> {
        let marks = json
            .marks
            .into_iter()
            .map(|m| {
                let mut mark = self.mark(&m.type_name)?;
                mark.attrs = m.attrs;
                Ok(mark)
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        if json.type_name == "text" {
            let text = json.text.ok_or(SchemaError::MissingText)?;
            return self.text(text, marks);
        }

        let content = json
            .content
            .into_iter()
            .map(|child| self.resolve(child))
            .collect::<Result<Fragment, _>>()?;
        self.node(&json.type_name, json.attrs, content, marks)
    }
}
