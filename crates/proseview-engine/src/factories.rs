//! Normalizes a schema's node and mark types into element factories.
//!
//! A type either brings its own factory, which is used as is, or a function
//! producing a declarative [`OutputSpec`], which gets wrapped so the spec is
//! compiled by [`interpret_spec`] on every call. Types with neither are left
//! out of the table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::diagnostics::Diagnostic;
use crate::element::Element;
use crate::error::{RenderError, TypeKind};
use crate::interpret::{Interpreted, interpret_spec};
use crate::model::{Mark, MarkSpecFn, MarkType, Node, NodeSpecFn, NodeType};
use crate::options::RendererOptions;
use crate::spec::OutputSpec;

/// Caller-supplied values forwarded untouched to every factory call.
pub type PassthroughProps = Map<String, Value>;

pub type NodeElementFactory = Arc<
    dyn Fn(&Node, Element, &PassthroughProps) -> Result<Element, RenderError> + Send + Sync,
>;

/// Called with the mark, whether the marked node is inline, and the element to wrap.
pub type MarkElementFactory = Arc<
    dyn Fn(&Mark, bool, Element, &PassthroughProps) -> Result<Element, RenderError>
        + Send
        + Sync,
>;

pub fn node_factory<F>(f: F) -> NodeElementFactory
where
    F: Fn(&Node, Element, &PassthroughProps) -> Result<Element, RenderError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

pub fn mark_factory<F>(f: F) -> MarkElementFactory
where
    F: Fn(&Mark, bool, Element, &PassthroughProps) -> Result<Element, RenderError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Factories keyed by type name. Immutable once built.
#[derive(Clone)]
pub struct FactoryTable<F> {
    factories: BTreeMap<String, F>,
}

pub type NodeFactoryTable = FactoryTable<NodeElementFactory>;
pub type MarkFactoryTable = FactoryTable<MarkElementFactory>;

impl<F> FactoryTable<F> {
    pub fn get(&self, name: &str) -> Option<&F> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<F> fmt::Debug for FactoryTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

pub fn build_node_factories(
    nodes: &BTreeMap<String, NodeType>,
    options: &RendererOptions,
) -> NodeFactoryTable {
    let mut factories = BTreeMap::new();
    for (name, node_type) in nodes {
        let factory = match (&node_type.spec.to_factory, &node_type.spec.to_output_spec) {
            (Some(factory), _) => factory.clone(),
            (None, Some(to_spec)) => spec_node_factory(to_spec.clone(), options.clone()),
            (None, None) => continue,
        };
        factories.insert(name.clone(), factory);
    }
    factories
        .entry("text".to_string())
        .or_insert_with(default_text_factory);

    FactoryTable { factories }
}

pub fn build_mark_factories(
    marks: &BTreeMap<String, MarkType>,
    options: &RendererOptions,
) -> MarkFactoryTable {
    let mut factories = BTreeMap::new();
    for (name, mark_type) in marks {
        let factory = match (&mark_type.spec.to_factory, &mark_type.spec.to_output_spec) {
            (Some(factory), _) => factory.clone(),
            (None, Some(to_spec)) => spec_mark_factory(to_spec.clone(), options.clone()),
            (None, None) => continue,
        };
        factories.insert(name.clone(), factory);
    }

    FactoryTable { factories }
}

/// Renders a node as its literal text.
fn default_text_factory() -> NodeElementFactory {
    node_factory(|node, _children, _props| {
        Ok(Element::Text(node.text.clone().unwrap_or_default()))
    })
}

fn spec_node_factory(to_spec: NodeSpecFn, options: RendererOptions) -> NodeElementFactory {
    node_factory(move |node, children, _props| {
        let had_children = !children.is_empty();
        let Interpreted {
            element,
            hole_consumed,
        } = interpret_spec(&to_spec(node), children)?;

        let type_name = || node.type_name.clone();
        if node.is_leaf && hole_consumed {
            options.report(Diagnostic::LeafRenderedContent {
                type_name: type_name(),
            });
        } else if !node.is_leaf && had_children && !hole_consumed {
            options.report(Diagnostic::ContentNotRendered {
                type_name: type_name(),
            });
        }
        if element.is_empty() {
            options.report(Diagnostic::NoElementRendered {
                kind: TypeKind::Node,
                type_name: type_name(),
            });
        }
        Ok(element)
    })
}

fn spec_mark_factory(to_spec: MarkSpecFn, options: RendererOptions) -> MarkElementFactory {
    mark_factory(move |mark, inline, children, _props| {
        let type_name = || mark.type_name.clone();
        let spec = match to_spec(mark, inline) {
            OutputSpec::Element(el) => {
                if el.has_nested_element() {
                    options.report(Diagnostic::MarkSpecNested {
                        type_name: type_name(),
                    });
                }
                if el.has_hole() {
                    options.report(Diagnostic::MarkSpecHasHole {
                        type_name: type_name(),
                    });
                }
                // Marks wrap their content rather than declaring where it goes.
                OutputSpec::Element(el.with_appended_hole())
            }
            other => {
                options.report(Diagnostic::MarkSpecNotElement {
                    type_name: type_name(),
                });
                other
            }
        };

        let had_children = !children.is_empty();
        let Interpreted {
            element,
            hole_consumed,
        } = interpret_spec(&spec, children)?;

        if had_children && !hole_consumed {
            options.report(Diagnostic::MarkContentNotRendered {
                type_name: type_name(),
            });
        }
        if element.is_empty() {
            options.report(Diagnostic::NoElementRendered {
                kind: TypeKind::Mark,
                type_name: type_name(),
            });
        }
        Ok(element)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::element::create_element;
    use crate::model::{Fragment, MarkSpec, NodeSpec, Schema};
    use pretty_assertions::assert_eq;

    fn recording() -> (Arc<RecordingSink>, RendererOptions) {
        let sink = RecordingSink::new();
        let options = RendererOptions::new().with_sink(sink.clone());
        (sink, options)
    }

    fn children() -> Element {
        Element::fragment(vec![Element::text("hi")])
    }

    #[test]
    fn test_text_factory_injected() {
        let schema = Schema::builder()
            .node("paragraph", NodeSpec::new().content("inline*"))
            .build();
        let table = build_node_factories(&schema.nodes, &RendererOptions::new());

        assert!(table.contains("text"));
        let text = table.get("text").unwrap();
        let out = text(&Node::text("hello"), Element::fragment(vec![]), &Map::new()).unwrap();
        assert_eq!(out, Element::text("hello"));
    }

    #[test]
    fn test_explicit_text_factory_kept() {
        let schema = Schema::builder()
            .node(
                "text",
                NodeSpec::new().to_factory(node_factory(|node, _, _| {
                    Ok(create_element(
                        "span",
                        None,
                        Some(vec![Element::text(node.text_content())]),
                    ))
                })),
            )
            .build();
        let table = build_node_factories(&schema.nodes, &RendererOptions::new());

        let out = table.get("text").unwrap()(&Node::text("x"), children(), &Map::new()).unwrap();
        assert_eq!(out.tag(), Some("span"));
    }

    #[test]
    fn test_types_without_rendering_are_omitted() {
        let schema = Schema::builder()
            .node("doc", NodeSpec::new().content("block+"))
            .node("paragraph", NodeSpec::new().to_output_spec(|_| OutputSpec::element("p").hole()))
            .mark("comment", MarkSpec::new())
            .build();
        let options = RendererOptions::new();

        let nodes = build_node_factories(&schema.nodes, &options);
        let marks = build_mark_factories(&schema.marks, &options);

        assert_eq!(nodes.names().collect::<Vec<_>>(), vec!["paragraph", "text"]);
        assert!(marks.is_empty());
    }

    #[test]
    fn test_direct_factory_wins_over_spec() {
        let schema = Schema::builder()
            .node(
                "rule",
                NodeSpec::new()
                    .to_output_spec(|_| OutputSpec::element("hr"))
                    .to_factory(node_factory(|_, _, _| Ok(Element::text("---")))),
            )
            .build();
        let table = build_node_factories(&schema.nodes, &RendererOptions::new());

        let out = table.get("rule").unwrap()(&Node::leaf("rule"), children(), &Map::new()).unwrap();
        assert_eq!(out, Element::text("---"));
    }

    #[test]
    fn test_factories_see_passthrough_props() {
        let schema = Schema::builder()
            .node(
                "greeting",
                NodeSpec::new().to_factory(node_factory(|_, _, props| {
                    let who = props.get("user").and_then(Value::as_str).unwrap_or("nobody");
                    Ok(Element::text(format!("hello {who}")))
                })),
            )
            .build();
        let table = build_node_factories(&schema.nodes, &RendererOptions::new());
        let mut props = Map::new();
        props.insert("user".to_string(), Value::from("ada"));

        let out = table.get("greeting").unwrap()(&Node::leaf("greeting"), children(), &props)
            .unwrap();
        assert_eq!(out, Element::text("hello ada"));
    }

    #[test]
    fn test_node_diagnostics() {
        let (sink, options) = recording();
        let schema = Schema::builder()
            .node("image", NodeSpec::new().to_output_spec(|_| OutputSpec::element("span").hole()))
            .node("paragraph", NodeSpec::new().content("inline*").to_output_spec(|_| OutputSpec::element("p")))
            .node("empty", NodeSpec::new().to_output_spec(|_| OutputSpec::text("")))
            .build();
        let table = build_node_factories(&schema.nodes, &options);
        let props = Map::new();

        table.get("image").unwrap()(&Node::leaf("image"), children(), &props).unwrap();
        table.get("paragraph").unwrap()(
            &Node::new("paragraph", Fragment::from(vec![Node::text("hi")])),
            children(),
            &props,
        )
        .unwrap();
        table.get("empty").unwrap()(&Node::leaf("empty"), Element::fragment(vec![]), &props)
            .unwrap();

        assert_eq!(
            sink.take(),
            vec![
                Diagnostic::LeafRenderedContent {
                    type_name: "image".to_string()
                },
                Diagnostic::ContentNotRendered {
                    type_name: "paragraph".to_string()
                },
                Diagnostic::NoElementRendered {
                    kind: TypeKind::Node,
                    type_name: "empty".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_diagnostics_disabled() {
        let (sink, options) = recording();
        let options = options.with_diagnostics(false);
        let schema = Schema::builder()
            .node("image", NodeSpec::new().to_output_spec(|_| OutputSpec::element("span").hole()))
            .build();
        let table = build_node_factories(&schema.nodes, &options);

        table.get("image").unwrap()(&Node::leaf("image"), children(), &Map::new()).unwrap();
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_mark_spec_wraps_content() {
        let (sink, options) = recording();
        let schema = Schema::builder()
            .mark(
                "link",
                MarkSpec::new().to_output_spec(|mark, _| {
                    OutputSpec::element("a").attr("href", mark.attr_str("href").unwrap_or("#"))
                }),
            )
            .build();
        let table = build_mark_factories(&schema.marks, &options);
        let mark = Mark::new("link").with_attr("href", "https://example.com");

        let out = table.get("link").unwrap()(&mark, true, Element::text("site"), &Map::new())
            .unwrap();

        let a = out.as_node().unwrap();
        assert_eq!(a.attribute("href"), Some("https://example.com"));
        assert_eq!(a.children(), &[Element::text("site")]);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_mark_spec_is_not_mutated_between_calls() {
        let shared = OutputSpec::element("em");
        let schema = Schema::builder()
            .mark("em", MarkSpec::new().to_output_spec(move |_, _| shared.clone()))
            .build();
        let table = build_mark_factories(&schema.marks, &RendererOptions::new());
        let em = table.get("em").unwrap();

        let first = em(&Mark::new("em"), true, Element::text("a"), &Map::new()).unwrap();
        let second = em(&Mark::new("em"), true, Element::text("b"), &Map::new()).unwrap();
        assert_eq!(first.as_node().unwrap().children().len(), 1);
        assert_eq!(second.as_node().unwrap().children().len(), 1);
    }

    #[test]
    fn test_mark_spec_diagnostics() {
        let (sink, options) = recording();
        let schema = Schema::builder()
            .mark("label", MarkSpec::new().to_output_spec(|_, _| OutputSpec::text("label")))
            .mark("blank", MarkSpec::new().to_output_spec(|_, _| OutputSpec::text("")))
            .mark(
                "fancy",
                MarkSpec::new().to_output_spec(|_, _| {
                    OutputSpec::element("span").child(OutputSpec::element("i"))
                }),
            )
            .build();
        let table = build_mark_factories(&schema.marks, &options);
        let props = Map::new();

        let label = table.get("label").unwrap()(&Mark::new("label"), true, Element::text("x"), &props)
            .unwrap();
        assert_eq!(label, Element::text("label"));
        let blank = table.get("blank").unwrap()(&Mark::new("blank"), true, Element::text("x"), &props)
            .unwrap();
        assert!(blank.is_empty());
        // The appended hole cannot share a parent with the nested element.
        assert_eq!(
            table.get("fancy").unwrap()(&Mark::new("fancy"), true, Element::text("x"), &props),
            Err(RenderError::HoleNotSoleChild)
        );

        assert_eq!(
            sink.take(),
            vec![
                Diagnostic::MarkSpecNotElement {
                    type_name: "label".to_string()
                },
                Diagnostic::MarkContentNotRendered {
                    type_name: "label".to_string()
                },
                Diagnostic::MarkSpecNotElement {
                    type_name: "blank".to_string()
                },
                Diagnostic::MarkContentNotRendered {
                    type_name: "blank".to_string()
                },
                Diagnostic::NoElementRendered {
                    kind: TypeKind::Mark,
                    type_name: "blank".to_string()
                },
                Diagnostic::MarkSpecNested {
                    type_name: "fancy".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_mark_spec_with_explicit_hole() {
        let (sink, options) = recording();
        let schema = Schema::builder()
            .mark("em", MarkSpec::new().to_output_spec(|_, _| OutputSpec::element("em").hole()))
            .build();
        let table = build_mark_factories(&schema.marks, &options);

        let result = table.get("em").unwrap()(&Mark::new("em"), true, Element::text("x"), &Map::new());

        assert_eq!(result, Err(RenderError::DuplicateHole));
        assert_eq!(
            sink.take(),
            vec![Diagnostic::MarkSpecHasHole {
                type_name: "em".to_string()
            }]
        );
    }
}
