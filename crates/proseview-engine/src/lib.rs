//! # proseview-engine
//!
//! Renders rich-text documents (trees of typed nodes carrying inline marks)
//! into element trees, driven by per-type declarative output specs.
//!
//! ```text
//! Schema ──build_*_factories──▶ factory tables ──Renderer──▶ Vec<Element>
//!                                    │
//!                          OutputSpec ─interpret─▶ Element
//! ```
//!
//! - [`interpret`] compiles one [`OutputSpec`] into an [`Element`], splicing
//!   already-rendered children in at the spec's content hole.
//! - [`factories`] turns each node and mark type of a [`Schema`] into an
//!   element factory, going through the interpreter unless the type brings
//!   its own factory.
//! - [`renderer`] walks a [`Fragment`], rendering children first and wrapping
//!   every node in its marks.
//!
//! ## Quick Start
//!
//! ```
//! use proseview_engine::{Node, NodeSpec, OutputSpec, RendererProps, Schema, make_renderer};
//!
//! let schema = Schema::builder()
//!     .node("paragraph", NodeSpec::new().content("inline*")
//!         .to_output_spec(|_| OutputSpec::element("p").hole()))
//!     .build();
//! let renderer = make_renderer(&schema, None);
//!
//! let doc = vec![Node::new("paragraph", vec![Node::text("hi")])];
//! let html = renderer.render_to_html(&RendererProps::new(doc)).unwrap();
//! assert_eq!(html, "<p>hi</p>");
//! ```

pub mod diagnostics;
pub mod element;
pub mod error;
pub mod factories;
pub mod html;
pub mod interpret;
pub mod model;
pub mod options;
pub mod renderer;
pub mod schemas;
pub mod spec;

pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, RecordingSink};
pub use element::{Element, ElementNode, Props, create_element};
pub use error::{RenderError, TypeKind};
pub use factories::{
    MarkElementFactory, MarkFactoryTable, NodeElementFactory, NodeFactoryTable, PassthroughProps,
    build_mark_factories, build_node_factories, mark_factory, node_factory,
};
pub use html::{to_html, to_html_all};
pub use interpret::{Interpreted, interpret, interpret_spec};
pub use model::{
    Attrs, Fragment, Mark, MarkSpec, MarkSpecFn, MarkType, Node, NodeSpec, NodeSpecFn, NodeType,
    Schema, SchemaBuilder, SchemaError,
};
pub use options::RendererOptions;
pub use renderer::{DEFAULT_DISPLAY_NAME, Renderer, RendererProps, make_renderer};
pub use spec::{ElementSpec, NativeNode, OutputSpec, SpecAttrs, SpecChild, SpecError};
