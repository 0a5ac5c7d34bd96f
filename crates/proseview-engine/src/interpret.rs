//! Compiles an [`OutputSpec`] into an [`Element`], splicing already-rendered
//! content in at the content hole.

use crate::element::{Element, Props, create_element};
use crate::error::RenderError;
use crate::spec::{ElementSpec, OutputSpec, SpecChild};

/// Result of interpreting one spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpreted {
    pub element: Element,
    /// Whether the supplied children were placed at a content hole.
    pub hole_consumed: bool,
}

/// Interpret a spec from the top, with no hole consumed yet.
pub fn interpret_spec(spec: &OutputSpec, children: Element) -> Result<Interpreted, RenderError> {
    interpret(spec, children, false)
}

/// Interpret `spec`, placing `children` at its content hole if it has one.
///
/// `hole_already_consumed` is set when an enclosing spec has already used
/// the hole; meeting another one is then an error.
pub fn interpret(
    spec: &OutputSpec,
    children: Element,
    hole_already_consumed: bool,
) -> Result<Interpreted, RenderError> {
    let mut slot = Some(children);
    interpret_in(spec, &mut slot, hole_already_consumed)
}

fn interpret_in(
    spec: &OutputSpec,
    slot: &mut Option<Element>,
    hole_consumed: bool,
) -> Result<Interpreted, RenderError> {
    match spec {
        OutputSpec::Native(_) => Err(RenderError::UnsupportedSpec),
        OutputSpec::Text(text) => Ok(Interpreted {
            element: Element::Text(text.clone()),
            hole_consumed: false,
        }),
        OutputSpec::Element(el) => interpret_element(el, slot, hole_consumed),
    }
}

fn interpret_element(
    spec: &ElementSpec,
    slot: &mut Option<Element>,
    mut hole_consumed: bool,
) -> Result<Interpreted, RenderError> {
    let props = spec.attrs.as_ref().map(Props::from_spec_attrs);

    // Sibling holes are two holes before they are a misplaced one.
    let holes = spec
        .children
        .iter()
        .filter(|c| matches!(c, SpecChild::Hole))
        .count();
    if holes > 1 {
        return Err(RenderError::DuplicateHole);
    }

    let mut content = Vec::with_capacity(spec.children.len());
    for child in &spec.children {
        match child {
            SpecChild::Hole => {
                if hole_consumed {
                    return Err(RenderError::DuplicateHole);
                }
                if spec.children.len() != 1 {
                    return Err(RenderError::HoleNotSoleChild);
                }
                content.push(slot.take().unwrap_or_else(|| Element::Fragment(Vec::new())));
                hole_consumed = true;
            }
            SpecChild::Spec(nested) => {
                let inner = interpret_in(nested, slot, hole_consumed)?;
                hole_consumed |= inner.hole_consumed;
                content.push(inner.element);
            }
        }
    }

    Ok(Interpreted {
        element: create_element(spec.tag.as_str(), props, Some(content)),
        hole_consumed,
    })
}
