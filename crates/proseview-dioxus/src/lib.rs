//! Dioxus components for showing documents rendered by `proseview-engine`.

mod prose_view;

pub use prose_view::{ProseView, ProseViewProps, RendererHandle};
