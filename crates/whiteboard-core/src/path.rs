//! Positional addresses into the element tree.
//!
//! A [`Path`] is the list of child indices leading from the board root to an
//! element. Paths are only meaningful for the tree revision they were
//! computed against; resolve them again after any structural edit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::element::{BoardElement, Element, ElementId};
use crate::scene::ElementNode;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path addresses the board itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the containing node. The root has no parent.
    pub fn parent(&self) -> Option<Path> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The following sibling.
    pub fn next(&self) -> Option<Path> {
        let last = self.last()?;
        let mut indices = self.0.clone();
        *indices.last_mut()? = last + 1;
        Some(Self(indices))
    }

    /// The preceding sibling.
    pub fn previous(&self) -> Option<Path> {
        let last = self.last()?.checked_sub(1)?;
        let mut indices = self.0.clone();
        *indices.last_mut()? = last;
        Some(Self(indices))
    }

    /// Strict ancestry: a path is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_sibling_of(&self, other: &Path) -> bool {
        !self.is_root() && self != other && self.parent() == other.parent()
    }

    /// Where this path points once the node at `removed` is detached.
    ///
    /// `None` if this path is `removed` itself or lies below it.
    pub fn after_removal(&self, removed: &Path) -> Option<Path> {
        if removed.is_root() || self == removed || removed.is_ancestor_of(self) {
            return None;
        }
        let depth = removed.len() - 1;
        let mut indices = self.0.clone();
        if indices.len() > depth
            && indices[..depth] == removed.0[..depth]
            && indices[depth] > removed.0[depth]
        {
            indices[depth] -= 1;
        }
        Some(Self(indices))
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}

/// Locate `element` (matched by id) in the board's tree.
pub fn get_path_by_element(board: &Board, element: &Element) -> Option<Path> {
    get_path_by_id(board, &element.id)
}

pub fn get_path_by_id(board: &Board, id: &ElementId) -> Option<Path> {
    board.scene().path_of(id)
}

pub fn get_node_by_path<'a>(board: &'a Board, path: &Path) -> Option<&'a ElementNode> {
    board.scene().node_at(path)
}

pub fn get_element_by_path<'a>(board: &'a Board, path: &Path) -> Option<&'a Element> {
    get_node_by_path(board, path).map(|node| &node.element)
}

/// Rebuild the nested element (with its children) at `path`.
pub fn get_subtree_by_path(board: &Board, path: &Path) -> Option<BoardElement> {
    let node = get_node_by_path(board, path)?;
    board.scene().subtree(&node.element.id)
}
