use std::fmt;

/// Which factory table a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Node,
    Mark,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Node => f.write_str("node"),
            TypeKind::Mark => f.write_str("mark"),
        }
    }
}

/// Structural failures that abort a render pass.
///
/// These are schema-authoring mistakes rather than data errors, so none of
/// them is recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error(
        "renderer cannot accept a pre-built native node; schema must emit a declarative spec"
    )]
    UnsupportedSpec,
    #[error("only one content hole allowed in an output spec")]
    DuplicateHole,
    #[error("content hole must be the only child of its parent")]
    HoleNotSoleChild,
    #[error("no {kind} factory registered for type `{name}`")]
    UnknownType { kind: TypeKind, name: String },
}

impl RenderError {
    pub fn unknown_node(name: impl Into<String>) -> Self {
        RenderError::UnknownType {
            kind: TypeKind::Node,
            name: name.into(),
        }
    }

    pub fn unknown_mark(name: impl Into<String>) -> Self {
        RenderError::UnknownType {
            kind: TypeKind::Mark,
            name: name.into(),
        }
    }
}
