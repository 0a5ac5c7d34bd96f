//! Static HTML serialization of rendered elements.

use std::fmt::Write;

use crate::element::{Element, ElementNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize one element to HTML. Fragments flatten into their parent.
pub fn to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

/// Serialize a sequence of top-level elements, as returned by a render pass.
pub fn to_html_all(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        write_element(&mut out, element);
    }
    out
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Text(text) => out.push_str(&html_escape::encode_text(text)),
        Element::Fragment(children) => {
            for child in children {
                write_element(out, child);
            }
        }
        Element::Node(node) => write_node(out, node),
    }
}

fn write_node(out: &mut String, node: &ElementNode) {
    out.push('<');
    out.push_str(&node.tag);
    if let Some(class_name) = node.class_name() {
        write_attribute(out, "class", class_name);
    }
    if let Some(props) = &node.props {
        for (name, value) in &props.attributes {
            write_attribute(out, name, value);
        }
    }

    let children = node.children();
    if children.is_empty() && VOID_ELEMENTS.contains(&node.tag.as_str()) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        write_element(out, child);
    }
    // Writing to a String cannot fail.
    let _ = write!(out, "</{}>", node.tag);
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        " {}=\"{}\"",
        name,
        html_escape::encode_double_quoted_attribute(value)
    );
}
