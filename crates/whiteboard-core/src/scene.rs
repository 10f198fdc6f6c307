//! Arena-backed element tree.
//!
//! Elements are stored by id with parent/child links, so identity stays
//! stable across edits while positional [`Path`]s are derived on demand.

use std::collections::HashMap;

use crate::element::{BoardElement, Element, ElementId};
use crate::operation::OperationError;
use crate::path::Path;

/// One element in the arena together with its tree links.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub element: Element,
    /// `None` for direct children of the board.
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl ElementNode {
    pub fn id(&self) -> &ElementId {
        &self.element.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: HashMap<ElementId, ElementNode>,
    roots: Vec<ElementId>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the arena from nested elements. Ids must be unique.
    pub fn from_elements(children: Vec<BoardElement>) -> Result<Self, OperationError> {
        let mut tree = Self::new();
        for child in children {
            tree.check_ids(&child)?;
            let id = tree.attach(child, None);
            tree.roots.push(id);
        }
        Ok(tree)
    }

    /// Flatten back into the nested persisted form.
    pub fn to_elements(&self) -> Vec<BoardElement> {
        self.roots.iter().filter_map(|id| self.subtree(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id).map(|node| &mut node.element)
    }

    /// Ordered child ids of `parent`, or the board's children for `None`.
    pub fn children_of(&self, parent: Option<&ElementId>) -> Option<&[ElementId]> {
        match parent {
            None => Some(&self.roots),
            Some(id) => self.nodes.get(id).map(|node| node.children.as_slice()),
        }
    }

    /// Rebuild the nested element rooted at `id`.
    pub fn subtree(&self, id: &ElementId) -> Option<BoardElement> {
        let node = self.nodes.get(id)?;
        Some(BoardElement {
            element: node.element.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.subtree(child))
                .collect(),
        })
    }

    /// All ids below `id`, excluding `id` itself.
    pub fn descendants(&self, id: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<&ElementId> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current.clone());
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn node_at(&self, path: &Path) -> Option<&ElementNode> {
        let mut siblings = &self.roots;
        let mut found = None;
        for &index in path.indices() {
            let node = self.nodes.get(siblings.get(index)?)?;
            siblings = &node.children;
            found = Some(node);
        }
        found
    }

    /// Compute the current path of `id` by walking parent links.
    pub fn path_of(&self, id: &ElementId) -> Option<Path> {
        let mut indices = Vec::new();
        let mut current = id;
        loop {
            let node = self.nodes.get(current)?;
            let siblings = self.children_of(node.parent.as_ref())?;
            indices.push(siblings.iter().position(|sibling| sibling == current)?);
            match &node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        indices.reverse();
        Some(Path::new(indices))
    }

    /// Insert `node` (with its children) so that it ends up at `path`.
    pub fn insert_at(&mut self, path: &Path, node: BoardElement) -> Result<(), OperationError> {
        let (parent_path, index) = split(path)?;
        let parent = self.resolve_parent(&parent_path)?;
        self.check_index(&parent_path, parent.as_ref(), index)?;
        self.check_ids(&node)?;

        let id = self.attach(node, parent.clone());
        if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
            siblings.insert(index, id);
        }
        Ok(())
    }

    /// Remove the element at `path` and everything below it.
    pub fn remove_at(&mut self, path: &Path) -> Result<BoardElement, OperationError> {
        let id = self.id_at(path)?;
        let removed = self
            .subtree(&id)
            .ok_or_else(|| OperationError::PathNotFound(path.clone()))?;
        let descendants = self.descendants(&id);
        self.detach(&id);
        self.nodes.remove(&id);
        for descendant in descendants {
            self.nodes.remove(&descendant);
        }
        Ok(removed)
    }

    /// Move the element at `path` so that it ends up at `new_path`.
    ///
    /// `new_path` is resolved against the tree with the node already
    /// detached, so a node can never be moved below itself. On failure the
    /// node is restored to where it was.
    pub fn move_node(&mut self, path: &Path, new_path: &Path) -> Result<(), OperationError> {
        let id = self.id_at(path)?;
        let (new_parent_path, new_index) = split(new_path)?;
        if path == new_path {
            return Ok(());
        }

        let old_parent = self.nodes.get(&id).and_then(|node| node.parent.clone());
        let Some(old_index) = self.detach(&id) else {
            return Err(OperationError::PathNotFound(path.clone()));
        };

        let target = self.resolve_parent(&new_parent_path).and_then(|parent| {
            self.check_index(&new_parent_path, parent.as_ref(), new_index)?;
            Ok(parent)
        });
        let (parent, index) = match target {
            Ok(parent) => (parent, new_index),
            Err(err) => {
                self.reattach(&id, old_parent, old_index);
                return Err(err);
            }
        };
        self.reattach(&id, parent, index);
        Ok(())
    }

    fn id_at(&self, path: &Path) -> Result<ElementId, OperationError> {
        if path.is_root() {
            return Err(OperationError::EmptyPath);
        }
        self.node_at(path)
            .map(|node| node.element.id.clone())
            .ok_or_else(|| OperationError::PathNotFound(path.clone()))
    }

    fn resolve_parent(&self, parent_path: &Path) -> Result<Option<ElementId>, OperationError> {
        if parent_path.is_root() {
            return Ok(None);
        }
        self.node_at(parent_path)
            .map(|node| Some(node.element.id.clone()))
            .ok_or_else(|| OperationError::PathNotFound(parent_path.clone()))
    }

    fn check_index(
        &self,
        parent_path: &Path,
        parent: Option<&ElementId>,
        index: usize,
    ) -> Result<(), OperationError> {
        let len = self.children_of(parent).map_or(0, <[ElementId]>::len);
        if index > len {
            return Err(OperationError::IndexOutOfRange {
                parent: parent_path.clone(),
                index,
                len,
            });
        }
        Ok(())
    }

    fn check_ids(&self, node: &BoardElement) -> Result<(), OperationError> {
        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let id = current.id();
            if self.nodes.contains_key(id) || !seen.insert(id) {
                return Err(OperationError::DuplicateId(id.clone()));
            }
            stack.extend(current.children.iter());
        }
        Ok(())
    }

    fn attach(&mut self, node: BoardElement, parent: Option<ElementId>) -> ElementId {
        let BoardElement { element, children } = node;
        let id = element.id.clone();
        let child_ids = children
            .into_iter()
            .map(|child| self.attach(child, Some(id.clone())))
            .collect();
        self.nodes.insert(
            id.clone(),
            ElementNode {
                element,
                parent,
                children: child_ids,
            },
        );
        id
    }

    /// Unlink `id` from its parent, returning the index it occupied.
    fn detach(&mut self, id: &ElementId) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent.clone();
        let siblings = self.siblings_mut(parent.as_ref())?;
        let index = siblings.iter().position(|sibling| sibling == id)?;
        siblings.remove(index);
        Some(index)
    }

    fn reattach(&mut self, id: &ElementId, parent: Option<ElementId>, index: usize) {
        if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
            siblings.insert(index.min(siblings.len()), id.clone());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent;
        }
    }

    fn siblings_mut(&mut self, parent: Option<&ElementId>) -> Option<&mut Vec<ElementId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.nodes.get_mut(id).map(|node| &mut node.children),
        }
    }
}

fn split(path: &Path) -> Result<(Path, usize), OperationError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(OperationError::EmptyPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn leaf(id: &str) -> BoardElement {
        BoardElement::leaf(Element::new(id, "card", Rect::new(0.0, 0.0, 10.0, 10.0)))
    }

    fn group(id: &str, children: Vec<BoardElement>) -> BoardElement {
        BoardElement::with_children(Element::new(id, "frame", Rect::ZERO), children)
    }

    fn tree() -> SceneTree {
        SceneTree::from_elements(vec![
            leaf("a"),
            group("g", vec![leaf("g1"), leaf("g2")]),
            leaf("b"),
        ])
        .unwrap()
    }

    fn ids(tree: &SceneTree, parent: Option<&str>) -> Vec<String> {
        let parent = parent.map(ElementId::new);
        tree.children_of(parent.as_ref())
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn test_round_trip_nested() {
        let elements = vec![leaf("a"), group("g", vec![leaf("g1")])];
        let tree = SceneTree::from_elements(elements.clone()).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.to_elements(), elements);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = SceneTree::from_elements(vec![leaf("a"), group("g", vec![leaf("a")])]);
        assert!(matches!(result, Err(OperationError::DuplicateId(_))));
    }

    #[test]
    fn test_path_of_walks_parents() {
        let tree = tree();
        assert_eq!(tree.path_of(&ElementId::new("g2")), Some(Path::new(vec![1, 1])));
        assert_eq!(tree.path_of(&ElementId::new("b")), Some(Path::new(vec![2])));
        assert_eq!(tree.path_of(&ElementId::new("zz")), None);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut tree = tree();
        tree.insert_at(&Path::new(vec![1, 0]), leaf("new")).unwrap();
        assert_eq!(ids(&tree, Some("g")), vec!["new", "g1", "g2"]);

        let removed = tree.remove_at(&Path::new(vec![1])).unwrap();
        assert_eq!(removed.children.len(), 3);
        assert_eq!(ids(&tree, None), vec!["a", "b"]);
        assert!(!tree.contains(&ElementId::new("g1")));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut tree = tree();
        let err = tree.insert_at(&Path::new(vec![9]), leaf("x")).unwrap_err();
        assert!(matches!(err, OperationError::IndexOutOfRange { index: 9, len: 3, .. }));
        assert!(matches!(
            tree.insert_at(&Path::root(), leaf("x")),
            Err(OperationError::EmptyPath)
        ));
    }

    #[test]
    fn test_move_node_into_group() {
        let mut tree = tree();
        // After "a" is detached the group sits at [0].
        tree.move_node(&Path::new(vec![0]), &Path::new(vec![0, 2])).unwrap();
        assert_eq!(ids(&tree, None), vec!["g", "b"]);
        assert_eq!(ids(&tree, Some("g")), vec!["g1", "g2", "a"]);
        assert_eq!(tree.get(&ElementId::new("a")).unwrap().parent, Some(ElementId::new("g")));

        tree.move_node(&Path::new(vec![0, 2]), &Path::new(vec![0])).unwrap();
        assert_eq!(ids(&tree, None), vec!["a", "g", "b"]);
    }

    #[test]
    fn test_move_below_itself_fails_and_restores() {
        let mut tree = tree();
        let err = tree.move_node(&Path::new(vec![1]), &Path::new(vec![1, 0, 0]));
        assert!(err.is_err());
        assert_eq!(ids(&tree, None), vec!["a", "g", "b"]);
        assert_eq!(ids(&tree, Some("g")), vec!["g1", "g2"]);
    }
}
