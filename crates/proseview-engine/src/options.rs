use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};

/// Settings fixed when a renderer's factory tables are built.
#[derive(Clone)]
pub struct RendererOptions {
    /// Report authoring diagnostics to `sink`.
    pub diagnostics: bool,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl RendererOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        if self.diagnostics {
            self.sink.report(diagnostic);
        }
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            diagnostics: true,
            sink: Arc::new(LogSink),
        }
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
