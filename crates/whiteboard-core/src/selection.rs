//! Selected elements and the marquee rectangle.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::geometry::normalize_rect;

/// Marquee drag in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectArea {
    pub anchor: Point,
    pub focus: Point,
}

impl SelectArea {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn to_rect(&self) -> Rect {
        normalize_rect(self.anchor, self.focus)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub select_area: Option<SelectArea>,
    #[serde(default, rename = "selectedIds")]
    pub selected: Vec<ElementId>,
}

impl Selection {
    pub fn with_elements(selected: Vec<ElementId>) -> Self {
        Self {
            select_area: None,
            selected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.selected.contains(id)
    }
}
