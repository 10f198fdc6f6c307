//! Reversible board operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::element::{BoardElement, ElementId};
use crate::path::Path;
use crate::selection::Selection;
use crate::view_port::ViewPort;

/// Errors raised when an operation does not fit the current tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("No element at path {0}")]
    PathNotFound(Path),

    #[error("Operation needs a non-empty path")]
    EmptyPath,

    #[error("Index {index} out of range under {parent} ({len} children)")]
    IndexOutOfRange { parent: Path, index: usize, len: usize },

    #[error("Element id already present: {0}")]
    DuplicateId(ElementId),

    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Cannot move {0} below itself")]
    MoveIntoDescendant(ElementId),

    #[error("Property cannot be changed: {0}")]
    ReservedProperty(String),

    #[error("Property {key} must be a {expected}")]
    InvalidProperty { key: String, expected: &'static str },
}

/// A single atomic change to a board.
///
/// Every variant carries enough of the prior state for [`Operation::inverse`]
/// to undo it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    #[serde(rename = "insert_node")]
    InsertElement { path: Path, node: BoardElement },

    #[serde(rename = "remove_node")]
    RemoveElement { path: Path, node: BoardElement },

    /// `new_path` is where the element sits once the move is done.
    #[serde(rename = "move_node")]
    MoveElement {
        path: Path,
        #[serde(rename = "newPath")]
        new_path: Path,
    },

    /// Property update. Keys present in `old` but absent from `new` are
    /// cleared, `null` values clear too.
    #[serde(rename = "set_node")]
    SetElement {
        path: Path,
        #[serde(rename = "properties")]
        old: Map<String, Value>,
        #[serde(rename = "newProperties")]
        new: Map<String, Value>,
    },

    SetViewport {
        #[serde(rename = "properties")]
        old: ViewPort,
        #[serde(rename = "newProperties")]
        new: ViewPort,
    },

    SetSelection {
        #[serde(rename = "properties")]
        old: Selection,
        #[serde(rename = "newProperties")]
        new: Selection,
    },
}

impl Operation {
    pub fn insert(path: Path, node: BoardElement) -> Self {
        Self::InsertElement { path, node }
    }

    pub fn remove(path: Path, node: BoardElement) -> Self {
        Self::RemoveElement { path, node }
    }

    pub fn set_view_port(old: ViewPort, new: ViewPort) -> Self {
        Self::SetViewport { old, new }
    }

    pub fn set_selection(old: Selection, new: Selection) -> Self {
        Self::SetSelection { old, new }
    }

    /// The operation that undoes this one.
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::InsertElement { path, node } => Operation::RemoveElement {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::RemoveElement { path, node } => Operation::InsertElement {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::MoveElement { path, new_path } => Operation::MoveElement {
                path: new_path.clone(),
                new_path: path.clone(),
            },
            Operation::SetElement { path, old, new } => Operation::SetElement {
                path: path.clone(),
                old: new.clone(),
                new: old.clone(),
            },
            Operation::SetViewport { old, new } => Operation::SetViewport {
                old: *new,
                new: *old,
            },
            Operation::SetSelection { old, new } => Operation::SetSelection {
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// Whether this operation changes the element tree.
    pub fn is_document_edit(&self) -> bool {
        matches!(
            self,
            Operation::InsertElement { .. }
                | Operation::RemoveElement { .. }
                | Operation::MoveElement { .. }
                | Operation::SetElement { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::InsertElement { .. } => "insert_node",
            Operation::RemoveElement { .. } => "remove_node",
            Operation::MoveElement { .. } => "move_node",
            Operation::SetElement { .. } => "set_node",
            Operation::SetViewport { .. } => "set_viewport",
            Operation::SetSelection { .. } => "set_selection",
        }
    }
}
