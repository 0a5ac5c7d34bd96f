//! Declarative output specs.
//!
//! An output spec describes one rendered element: a plain string, or a tag
//! with optional attributes and children, where a single [`SpecChild::Hole`]
//! marks the place that receives already-rendered content.
//!
//! Specs can be built in Rust with the builder methods on [`OutputSpec`] or
//! read from the array form used by ProseMirror's `DOMOutputSpec`:
//!
//! ```text
//! ["pre", {"class": "code"}, ["code", 0]]
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Attribute name to value, as authored in a spec.
pub type SpecAttrs = BTreeMap<String, String>;

/// Key whose presence marks a JSON object as a pre-built native node.
pub const NATIVE_NODE_MARKER: &str = "nodeType";

#[derive(Debug, Clone, PartialEq)]
pub enum OutputSpec {
    Text(String),
    /// A pre-built node of some foreign tree. Never renderable.
    Native(NativeNode),
    Element(ElementSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub tag: String,
    pub attrs: Option<SpecAttrs>,
    pub children: Vec<SpecChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpecChild {
    /// The content hole.
    Hole,
    Spec(OutputSpec),
}

/// Opaque foreign node handle, identified by its node-type marker.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub node_type: u16,
    pub raw: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("output spec array must not be empty")]
    EmptySpec,
    #[error("output spec tag must be a string, got {0}")]
    InvalidTag(Value),
    #[error("attribute `{name}` must have a string value, got {value}")]
    InvalidAttribute { name: String, value: Value },
    #[error("invalid output spec value: {0}")]
    InvalidSpec(Value),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl OutputSpec {
    /// Start an element spec with no attributes and no children.
    pub fn element(tag: impl Into<String>) -> Self {
        OutputSpec::Element(ElementSpec::new(tag))
    }

    pub fn text(text: impl Into<String>) -> Self {
        OutputSpec::Text(text.into())
    }

    pub fn native(node_type: u16) -> Self {
        OutputSpec::Native(NativeNode {
            node_type,
            raw: serde_json::json!({ NATIVE_NODE_MARKER: node_type }),
        })
    }

    /// Add an attribute. No-op on non-element specs.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let OutputSpec::Element(el) = &mut self {
            el.attrs
                .get_or_insert_with(BTreeMap::new)
                .insert(name.into(), value.into());
        }
        self
    }

    pub fn child(mut self, child: impl Into<OutputSpec>) -> Self {
        if let OutputSpec::Element(el) = &mut self {
            el.children.push(SpecChild::Spec(child.into()));
        }
        self
    }

    pub fn hole(mut self) -> Self {
        if let OutputSpec::Element(el) = &mut self {
            el.children.push(SpecChild::Hole);
        }
        self
    }

    pub fn as_element(&self) -> Option<&ElementSpec> {
        match self {
            OutputSpec::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Parse the array form of a spec.
    pub fn from_json(value: &Value) -> Result<Self, SpecError> {
        match value {
            Value::String(s) => Ok(OutputSpec::Text(s.clone())),
            Value::Object(obj) if is_native_node(obj) => Ok(OutputSpec::Native(NativeNode {
                node_type: obj
                    .get(NATIVE_NODE_MARKER)
                    .and_then(Value::as_u64)
                    .and_then(|n| u16::try_from(n).ok())
                    .unwrap_or(0),
                raw: value.clone(),
            })),
            Value::Array(items) => {
                let (tag, rest) = items.split_first().ok_or(SpecError::EmptySpec)?;
                let tag = tag
                    .as_str()
                    .ok_or_else(|| SpecError::InvalidTag(tag.clone()))?;

                let (attrs, rest) = match rest.split_first() {
                    Some((Value::Object(obj), tail)) if is_attributes_object(&rest[0]) => {
                        (Some(parse_attrs(obj)?), tail)
                    }
                    _ => (None, rest),
                };

                let children = rest
                    .iter()
                    .map(|item| {
                        if is_hole(item) {
                            Ok(SpecChild::Hole)
                        } else {
                            OutputSpec::from_json(item).map(SpecChild::Spec)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(OutputSpec::Element(ElementSpec {
                    tag: tag.to_string(),
                    attrs,
                    children,
                }))
            }
            other => Err(SpecError::InvalidSpec(other.clone())),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SpecError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Write the spec back to its array form.
    pub fn to_json(&self) -> Value {
        match self {
            OutputSpec::Text(s) => Value::String(s.clone()),
            OutputSpec::Native(native) => native.raw.clone(),
            OutputSpec::Element(el) => {
                let mut items = vec![Value::String(el.tag.clone())];
                if let Some(attrs) = &el.attrs {
                    let obj: Map<String, Value> = attrs
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect();
                    items.push(Value::Object(obj));
                }
                items.extend(el.children.iter().map(|child| match child {
                    SpecChild::Hole => Value::from(0),
                    SpecChild::Spec(spec) => spec.to_json(),
                }));
                Value::Array(items)
            }
        }
    }
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: None,
            children: Vec::new(),
        }
    }

    pub fn has_hole(&self) -> bool {
        self.children.iter().any(|c| matches!(c, SpecChild::Hole))
    }

    pub fn has_nested_element(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, SpecChild::Spec(OutputSpec::Element(_))))
    }

    /// A copy of this spec with a content hole appended after its children.
    pub fn with_appended_hole(&self) -> ElementSpec {
        let mut children = Vec::with_capacity(self.children.len() + 1);
        children.extend(self.children.iter().cloned());
        children.push(SpecChild::Hole);
        ElementSpec {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }
}

impl From<&str> for OutputSpec {
    fn from(text: &str) -> Self {
        OutputSpec::Text(text.to_string())
    }
}

impl From<String> for OutputSpec {
    fn from(text: String) -> Self {
        OutputSpec::Text(text)
    }
}

impl From<ElementSpec> for OutputSpec {
    fn from(el: ElementSpec) -> Self {
        OutputSpec::Element(el)
    }
}

/// Whether the second entry of a spec array is its attribute object:
/// a plain object that is neither an array nor a native node.
pub fn is_attributes_object(value: &Value) -> bool {
    match value {
        Value::Object(obj) => !is_native_node(obj),
        _ => false,
    }
}

fn is_native_node(obj: &Map<String, Value>) -> bool {
    obj.get(NATIVE_NODE_MARKER).is_some_and(|v| !v.is_null())
}

fn is_hole(value: &Value) -> bool {
    value.as_u64() == Some(0)
}

/// Null attributes are left out, as an unset attribute.
fn parse_attrs(obj: &Map<String, Value>) -> Result<SpecAttrs, SpecError> {
    obj.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name.clone(), s.clone())),
            other => Err(SpecError::InvalidAttribute {
                name: name.clone(),
                value: other.clone(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"class": "x"}), true)]
    #[case(json!({}), true)]
    #[case(json!({"nodeType": 1}), false)]
    #[case(json!(["em"]), false)]
    #[case(json!(0), false)]
    #[case(json!("text"), false)]
    #[case(json!(null), false)]
    fn test_is_attributes_object(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_attributes_object(&value), expected);
    }

    #[test]
    fn test_parse_tag_attrs_and_nested_hole() {
        let spec = OutputSpec::from_json(&json!(["pre", {"class": "code"}, ["code", 0]])).unwrap();

        let expected = OutputSpec::element("pre")
            .attr("class", "code")
            .child(OutputSpec::element("code").hole());
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_second_entry_without_object_is_a_child() {
        let spec = OutputSpec::from_json(&json!(["p", 0])).unwrap();
        let el = spec.as_element().unwrap();

        assert_eq!(el.attrs, None);
        assert_eq!(el.children, vec![SpecChild::Hole]);
    }

    #[test]
    fn test_native_node_in_child_position() {
        let spec = OutputSpec::from_json(&json!(["div", {"nodeType": 1, "tagName": "DIV"}]))
            .unwrap();
        let el = spec.as_element().unwrap();

        assert_eq!(el.attrs, None);
        assert!(matches!(
            &el.children[0],
            SpecChild::Spec(OutputSpec::Native(NativeNode { node_type: 1, .. }))
        ));
    }

    #[rstest]
    #[case::link(json!(["a", {"href": "x", "title": null}, 0]), &[("href", "x")])]
    #[case::image(
        json!(["img", {"src": "a.png", "alt": null, "title": null}]),
        &[("src", "a.png")]
    )]
    fn test_null_attributes_are_skipped(#[case] value: Value, #[case] expected: &[(&str, &str)]) {
        let spec = OutputSpec::from_json(&value).unwrap();
        let attrs = spec.as_element().unwrap().attrs.clone().unwrap();

        let expected: SpecAttrs = expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(attrs, expected);
    }

    #[test]
    fn test_native_builder_keeps_marker_in_json() {
        let native = OutputSpec::native(3);

        assert_eq!(native.to_json(), json!({"nodeType": 3}));
        assert_eq!(OutputSpec::from_json(&native.to_json()).unwrap(), native);
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!([1, 0]))]
    #[case(json!(["a", {"href": 3}]))]
    #[case(json!(["a", true]))]
    #[case(json!(12))]
    fn test_rejects_malformed_specs(#[case] value: Value) {
        assert!(OutputSpec::from_json(&value).is_err());
    }

    #[test]
    fn test_to_json_writes_array_form() {
        let spec = OutputSpec::element("span")
            .attr("class", "mention")
            .child("@bob");
        assert_eq!(spec.to_json(), json!(["span", {"class": "mention"}, "@bob"]));
    }

    #[test]
    fn test_with_appended_hole_leaves_original_untouched() {
        let original = ElementSpec::new("em");
        let wrapped = original.with_appended_hole();

        assert!(original.children.is_empty());
        assert_eq!(wrapped.children, vec![SpecChild::Hole]);
    }
}
