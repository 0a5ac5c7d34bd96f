//! The rich-text document model consumed by the renderer: schemas with
//! their node and mark types, and immutable document trees built against
//! them.

pub mod node;
pub mod schema;

pub use node::{Attrs, Fragment, Mark, Node};
pub use schema::{
    MarkSpec, MarkSpecFn, MarkType, NodeSpec, NodeSpecFn, NodeType, Schema, SchemaBuilder,
    SchemaError,
};
