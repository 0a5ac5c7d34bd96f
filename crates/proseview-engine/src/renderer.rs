//! Renders document fragments through a schema's factory tables.

use serde_json::Value;

use crate::element::Element;
use crate::error::RenderError;
use crate::factories::{
    MarkFactoryTable, NodeFactoryTable, PassthroughProps, build_mark_factories,
    build_node_factories,
};
use crate::html::to_html_all;
use crate::model::{Fragment, Node, Schema};
use crate::options::RendererOptions;

pub const DEFAULT_DISPLAY_NAME: &str = "ProseRenderer";

/// Input of one render pass: the fragment plus values handed through to
/// every factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererProps {
    pub fragment: Fragment,
    pub passthrough: PassthroughProps,
}

impl RendererProps {
    pub fn new(fragment: impl Into<Fragment>) -> Self {
        Self {
            fragment: fragment.into(),
            passthrough: PassthroughProps::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.passthrough.insert(key.into(), value.into());
        self
    }
}

/// Factory tables compiled from one schema.
///
/// Tables are built once and only read afterwards, so a renderer can be
/// cloned and shared across threads freely.
#[derive(Debug, Clone)]
pub struct Renderer {
    display_name: String,
    nodes: NodeFactoryTable,
    marks: MarkFactoryTable,
}

/// Build a renderer for `schema`, reporting diagnostics through `log`.
pub fn make_renderer(schema: &Schema, display_name: Option<&str>) -> Renderer {
    Renderer::with_options(schema, display_name, RendererOptions::default())
}

impl Renderer {
    pub fn with_options(
        schema: &Schema,
        display_name: Option<&str>,
        options: RendererOptions,
    ) -> Self {
        Self {
            display_name: display_name.unwrap_or(DEFAULT_DISPLAY_NAME).to_string(),
            nodes: build_node_factories(&schema.nodes, &options),
            marks: build_mark_factories(&schema.marks, &options),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn node_factories(&self) -> &NodeFactoryTable {
        &self.nodes
    }

    pub fn mark_factories(&self) -> &MarkFactoryTable {
        &self.marks
    }

    /// Render the fragment in `props`, one element per top-level node.
    pub fn render(&self, props: &RendererProps) -> Result<Vec<Element>, RenderError> {
        let RendererProps {
            fragment,
            passthrough,
        } = props;
        self.render_fragment(fragment, passthrough)
    }

    pub fn render_fragment(
        &self,
        fragment: &Fragment,
        passthrough: &PassthroughProps,
    ) -> Result<Vec<Element>, RenderError> {
        fragment
            .iter()
            .map(|node| self.render_node(node, passthrough))
            .collect()
    }

    pub fn render_to_html(&self, props: &RendererProps) -> Result<String, RenderError> {
        Ok(to_html_all(&self.render(props)?))
    }

    fn render_node(
        &self,
        node: &Node,
        passthrough: &PassthroughProps,
    ) -> Result<Element, RenderError> {
        let children = self.render_fragment(&node.content, passthrough)?;
        let factory = self
            .nodes
            .get(&node.type_name)
            .ok_or_else(|| RenderError::unknown_node(&node.type_name))?;
        let content = factory(node, Element::Fragment(children), passthrough)?;
        self.render_marks(node, content, passthrough)
    }

    /// Wrap `content` in the node's marks: the first mark innermost, the
    /// last outermost. Identical marks on neighbouring nodes are not merged.
    fn render_marks(
        &self,
        node: &Node,
        content: Element,
        passthrough: &PassthroughProps,
    ) -> Result<Element, RenderError> {
        node.marks.iter().try_fold(content, |inner, mark| {
            let factory = self
                .marks
                .get(&mark.type_name)
                .ok_or_else(|| RenderError::unknown_mark(&mark.type_name))?;
            factory(mark, node.is_inline, inner, passthrough)
        })
    }
}
