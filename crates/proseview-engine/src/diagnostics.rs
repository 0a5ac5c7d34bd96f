//! Non-fatal authoring diagnostics.
//!
//! A spec can be structurally valid and still almost certainly wrong, such as
//! a leaf node whose spec has a content hole. Those cases are reported here
//! and rendering carries on.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::TypeKind;

pub const LOG_TARGET: &str = "proseview::diagnostics";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A leaf node's spec placed content at a hole.
    LeafRenderedContent { type_name: String },
    /// A content node had children but its spec never placed them.
    ContentNotRendered { type_name: String },
    /// A factory produced an empty element.
    NoElementRendered { kind: TypeKind, type_name: String },
    MarkSpecNotElement { type_name: String },
    MarkSpecNested { type_name: String },
    /// Mark specs get their hole appended; an explicit one is a mistake.
    MarkSpecHasHole { type_name: String },
    MarkContentNotRendered { type_name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LeafRenderedContent { type_name } => {
                write!(f, "leaf node `{type_name}` rendered content")
            }
            Diagnostic::ContentNotRendered { type_name } => {
                write!(f, "content node `{type_name}` rendered no content")
            }
            Diagnostic::NoElementRendered { kind, type_name } => {
                write!(f, "{kind} `{type_name}` rendered no element")
            }
            Diagnostic::MarkSpecNotElement { type_name } => {
                write!(f, "mark `{type_name}` spec is not an element spec")
            }
            Diagnostic::MarkSpecNested { type_name } => {
                write!(f, "mark `{type_name}` spec has nested elements")
            }
            Diagnostic::MarkSpecHasHole { type_name } => {
                write!(
                    f,
                    "mark `{type_name}` spec has a content hole, which is invalid for marks"
                )
            }
            Diagnostic::MarkContentNotRendered { type_name } => {
                write!(f, "mark `{type_name}` rendered no content")
            }
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Writes diagnostics to the `log` facade as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!(target: LOG_TARGET, "{diagnostic}");
    }
}

/// Keeps every reported diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.recorded().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.recorded())
    }

    // A panicking reporter must not hide what was recorded before it.
    fn recorded(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.recorded().push(diagnostic);
    }
}
