use std::sync::Arc;

use dioxus::prelude::*;
use proseview_engine::{Fragment, Renderer, RendererProps};

/// Shared renderer usable as a component prop.
///
/// Two handles are equal when they point at the same renderer, which keeps
/// re-renders cheap when a parent passes the same handle down again.
#[derive(Debug, Clone)]
pub struct RendererHandle(Arc<Renderer>);

impl RendererHandle {
    pub fn new(renderer: Renderer) -> Self {
        Self(Arc::new(renderer))
    }

    pub fn renderer(&self) -> &Renderer {
        &self.0
    }
}

impl From<Renderer> for RendererHandle {
    fn from(renderer: Renderer) -> Self {
        Self::new(renderer)
    }
}

impl PartialEq for RendererHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Renders `fragment` to HTML and mounts it inside a `div`.
#[component]
pub fn ProseView(renderer: RendererHandle, fragment: Fragment, class: Option<String>) -> Element {
    let class = class.unwrap_or_else(|| "prose-view".to_string());
    let renderer = renderer.renderer();

    match renderer.render_to_html(&RendererProps::new(fragment)) {
        Ok(html) => rsx! {
            div {
                class: "{class}",
                dangerous_inner_html: "{html}",
            }
        },
        Err(e) => {
            log::error!("{} failed to render document: {e}", renderer.display_name());
            rsx! {
                div {
                    class: "{class} prose-view-error",
                    "Unable to render document: {e}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::VirtualDom;
    use dioxus_ssr::render;
    use pretty_assertions::assert_eq;
    use proseview_engine::schemas::chat_schema;
    use proseview_engine::{Mark, Node, make_renderer};

    fn chat_renderer() -> RendererHandle {
        make_renderer(&chat_schema(), Some("ChatMessage")).into()
    }

    fn render_view(props: ProseViewProps) -> String {
        let mut dom = VirtualDom::new_with_props(ProseView, props);
        dom.rebuild_in_place();
        render(&dom)
    }

    #[test]
    fn test_prose_view_renders_document_html() {
        let fragment = Fragment::from(vec![Node::new(
            "paragraph",
            vec![
                Node::text("hello "),
                Node::text("world").with_mark(Mark::new("strong")),
            ],
        )]);

        let html = render_view(ProseViewProps {
            renderer: chat_renderer(),
            fragment,
            class: None,
        });

        assert!(html.contains(r#"class="prose-view""#));
        assert!(html.contains("<p>hello <strong>world</strong></p>"));
    }

    #[test]
    fn test_prose_view_custom_class() {
        let html = render_view(ProseViewProps {
            renderer: chat_renderer(),
            fragment: Fragment::empty(),
            class: Some("message-body".to_string()),
        });

        assert!(html.contains(r#"class="message-body""#));
    }

    #[test]
    fn test_prose_view_shows_render_errors() {
        let fragment = Fragment::from(vec![Node::leaf("horizontal_rule")]);

        let html = render_view(ProseViewProps {
            renderer: chat_renderer(),
            fragment,
            class: None,
        });

        assert!(html.contains("prose-view-error"));
        assert!(html.contains("horizontal_rule"));
    }

    #[test]
    fn test_renderer_handle_equality_is_by_identity() {
        let first = chat_renderer();
        let same = first.clone();
        let other = chat_renderer();

        assert_eq!(first, same);
        assert!(first != other);
    }
}
