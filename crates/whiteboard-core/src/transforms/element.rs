//! Element edits addressed by id.
//!
//! Paths are resolved right before each operation is applied, so a batch
//! stays correct while earlier edits shift later elements.

use kurbo::Vec2;
use serde_json::{Map, Value};

use crate::board::Board;
use crate::element::{BoardElement, Element, ElementId};
use crate::operation::{Operation, OperationError};
use crate::path::{Path, get_path_by_id};

fn path_of(board: &Board, id: &ElementId) -> Result<Path, OperationError> {
    get_path_by_id(board, id).ok_or_else(|| OperationError::ElementNotFound(id.clone()))
}

/// Insert `node` under `parent` (the board for `None`) at `index`, or at
/// the end. Returns the path it was inserted at.
pub fn insert_element(
    board: &mut Board,
    parent: Option<&ElementId>,
    index: Option<usize>,
    node: BoardElement,
) -> Result<Path, OperationError> {
    let parent_path = match parent {
        Some(id) => path_of(board, id)?,
        None => Path::root(),
    };
    let len = board.scene().children_of(parent).map_or(0, <[ElementId]>::len);
    let path = parent_path.child(index.unwrap_or(len));
    board.apply(Operation::insert(path.clone(), node))?;
    Ok(path)
}

/// Remove each element (and its subtree) and return the subtrees that were
/// actually removed. Ids that are already gone, for example because an
/// ancestor was removed first, are skipped.
pub fn remove_elements(
    board: &mut Board,
    ids: &[ElementId],
) -> Result<Vec<BoardElement>, OperationError> {
    let mut removed = Vec::new();
    for id in ids {
        let (Some(path), Some(node)) = (get_path_by_id(board, id), board.scene().subtree(id)) else {
            continue;
        };
        board.apply(Operation::remove(path, node.clone()))?;
        // Read-only and destroyed boards skip the removal without failing
        if !board.scene().contains(id) {
            removed.push(node);
        }
    }
    Ok(removed)
}

/// Write `props` on one element, capturing the previous values so the
/// operation can be inverted.
pub fn set_element_properties(
    board: &mut Board,
    id: &ElementId,
    props: Map<String, Value>,
) -> Result<(), OperationError> {
    let path = path_of(board, id)?;
    let element = board
        .element(id)
        .ok_or_else(|| OperationError::ElementNotFound(id.clone()))?;
    let old = props
        .keys()
        .map(|key| (key.clone(), element.property(key).unwrap_or(Value::Null)))
        .collect();
    board.apply(Operation::SetElement {
        path,
        old,
        new: props,
    })
}

/// Move elements to their `origins` shifted by `offset`.
///
/// The offset is relative to the snapshots, not to the current positions.
pub fn translate_elements(
    board: &mut Board,
    origins: &[Element],
    offset: Vec2,
) -> Result<(), OperationError> {
    for origin in origins {
        if board.element(&origin.id).is_none() {
            continue;
        }
        let props = board.translate_element(origin, offset);
        set_element_properties(board, &origin.id, props)?;
    }
    Ok(())
}

/// Reparent or reorder `id` so it becomes child `index` of `parent`
/// (the board for `None`).
pub fn move_element_to(
    board: &mut Board,
    id: &ElementId,
    parent: Option<&ElementId>,
    index: usize,
) -> Result<(), OperationError> {
    let path = path_of(board, id)?;
    let parent_path = match parent {
        Some(parent) => path_of(board, parent)?
            .after_removal(&path)
            .ok_or_else(|| OperationError::MoveIntoDescendant(id.clone()))?,
        None => Path::root(),
    };
    board.apply(Operation::MoveElement {
        path,
        new_path: parent_path.child(index),
    })
}
