//! Board elements: the typed core fields plus free-form properties.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::operation::OperationError;

/// Stable identifier of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Property keys that cannot be changed through a property update.
const RESERVED_KEYS: [&str; 2] = ["id", "children"];

/// A single element without its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Element type; selects the [`ElementKind`](crate::kind::ElementKind) used for hit-testing.
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Rotation in radians around the element center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Kind-specific fields the engine does not interpret.
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: impl Into<String>, bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: id.into(),
            kind: kind.into(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            rotation: None,
            props: Map::new(),
        }
    }

    /// Builder-style helper to attach a free-form property.
    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Axis-aligned bounds, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Read any property, core fields included, as JSON.
    pub fn property(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(Value::String(self.id.to_string())),
            "type" => Some(Value::String(self.kind.clone())),
            "x" => Some(self.x.into()),
            "y" => Some(self.y.into()),
            "width" => Some(self.width.into()),
            "height" => Some(self.height.into()),
            "rotation" => self.rotation.map(Value::from),
            _ => self.props.get(key).cloned(),
        }
    }

    /// Write a property. `null` removes free-form keys and resets core fields.
    pub fn set_property(&mut self, key: &str, value: Value) -> Result<(), OperationError> {
        if RESERVED_KEYS.contains(&key) {
            return Err(OperationError::ReservedProperty(key.to_string()));
        }
        match key {
            "type" => match value {
                Value::String(kind) => self.kind = kind,
                _ => return Err(invalid(key, "string")),
            },
            "x" | "y" | "width" | "height" => {
                let number = match value {
                    Value::Null => 0.0,
                    other => other.as_f64().ok_or_else(|| invalid(key, "number"))?,
                };
                match key {
                    "x" => self.x = number,
                    "y" => self.y = number,
                    "width" => self.width = number,
                    _ => self.height = number,
                }
            }
            "rotation" => {
                self.rotation = match value {
                    Value::Null => None,
                    other => Some(other.as_f64().ok_or_else(|| invalid(key, "number"))?),
                }
            }
            _ => {
                if value.is_null() {
                    self.props.remove(key);
                } else {
                    self.props.insert(key.to_string(), value);
                }
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, expected: &'static str) -> OperationError {
    OperationError::InvalidProperty {
        key: key.to_string(),
        expected,
    }
}

/// An element with its nested children, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardElement {
    #[serde(flatten)]
    pub element: Element,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoardElement>,
}

impl BoardElement {
    pub fn leaf(element: Element) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    pub fn with_children(element: Element, children: Vec<BoardElement>) -> Self {
        Self { element, children }
    }

    pub fn id(&self) -> &ElementId {
        &self.element.id
    }

    /// Depth-first search for a descendant (or self) by id.
    pub fn find(&self, id: &ElementId) -> Option<&BoardElement> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

impl From<Element> for BoardElement {
    fn from(element: Element) -> Self {
        Self::leaf(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card() -> Element {
        Element::new("a", "card", Rect::new(10.0, 20.0, 110.0, 70.0))
    }

    #[test]
    fn test_element_json_keeps_unknown_fields() {
        let json = json!({
            "id": "a",
            "type": "geometry",
            "x": 1,
            "y": 2,
            "width": 3,
            "height": 4,
            "fill": "#fff",
            "children": [{ "id": "b", "type": "card", "x": 0, "y": 0 }]
        });
        let node: BoardElement = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(node.element.kind, "geometry");
        assert_eq!(node.element.props.get("fill"), Some(&json!("#fff")));
        assert!(!node.element.props.contains_key("children"));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].element.width, 0.0);
        assert_eq!(serde_json::to_value(&node).unwrap()["fill"], json!("#fff"));
    }

    #[test]
    fn test_leaf_serializes_without_children() {
        let value = serde_json::to_value(BoardElement::leaf(card())).unwrap();
        assert!(value.get("children").is_none());
        assert!(value.get("rotation").is_none());
    }

    #[test]
    fn test_set_property_core_and_free_form() {
        let mut element = card();
        element.set_property("x", json!(42.5)).unwrap();
        element.set_property("color", json!("red")).unwrap();
        assert_eq!(element.x, 42.5);
        assert_eq!(element.property("color"), Some(json!("red")));

        element.set_property("color", Value::Null).unwrap();
        assert_eq!(element.property("color"), None);
    }

    #[test]
    fn test_set_property_rejects_reserved_and_bad_types() {
        let mut element = card();
        assert!(matches!(
            element.set_property("id", json!("b")),
            Err(OperationError::ReservedProperty(_))
        ));
        assert!(matches!(
            element.set_property("width", json!("wide")),
            Err(OperationError::InvalidProperty { .. })
        ));
        assert_eq!(element.id, ElementId::new("a"));
    }

    #[test]
    fn test_find_nested() {
        let tree = BoardElement::with_children(
            Element::new("frame", "frame", Rect::ZERO),
            vec![BoardElement::leaf(card())],
        );
        assert!(tree.find(&ElementId::new("a")).is_some());
        assert!(tree.find(&ElementId::new("missing")).is_none());
    }
}
