//! Tree traversal and hit-testing over a board.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use kurbo::{Point, Rect};

use crate::board::Board;
use crate::element::{Element, ElementId};
use crate::geometry::union_bounds;
use crate::scene::ElementNode;
use crate::selection::SelectArea;

/// A position in the tree: the board itself or one of its elements.
#[derive(Debug, Clone, Copy)]
pub enum SceneNode<'a> {
    Root(&'a Board),
    Element(&'a Board, &'a ElementNode),
}

impl<'a> SceneNode<'a> {
    /// Child elements in order.
    pub fn children(self) -> impl Iterator<Item = &'a ElementNode> + 'a {
        let (board, ids): (&'a Board, &'a [ElementId]) = match self {
            SceneNode::Root(board) => (board, board.scene().roots()),
            SceneNode::Element(board, node) => (board, node.children.as_slice()),
        };
        ids.iter().filter_map(move |id| board.scene().get(id))
    }

    pub fn element(&self) -> Option<&'a Element> {
        match *self {
            SceneNode::Root(_) => None,
            SceneNode::Element(_, node) => Some(&node.element),
        }
    }
}

pub fn is_board(node: &SceneNode<'_>) -> bool {
    matches!(node, SceneNode::Root(_))
}

/// Pre-order depth-first walk over every element.
///
/// The visitor returns [`ControlFlow::Break`] to stop the walk early; the
/// break value is returned.
pub fn dfs<'a, B>(
    node: SceneNode<'a>,
    mut visit: impl FnMut(&'a ElementNode) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let board = match node {
        SceneNode::Root(board) | SceneNode::Element(board, _) => board,
    };
    let mut stack: Vec<&'a ElementNode> = match node {
        SceneNode::Root(_) => node.children().collect(),
        SceneNode::Element(_, element) => vec![element],
    };
    stack.reverse();
    while let Some(current) = stack.pop() {
        visit(current)?;
        let start = stack.len();
        stack.extend(SceneNode::Element(board, current).children());
        stack[start..].reverse();
    }
    ControlFlow::Continue(())
}

/// Level-order walk over every element. Early exit works as in [`dfs`].
pub fn bfs<'a, B>(
    node: SceneNode<'a>,
    mut visit: impl FnMut(&'a ElementNode) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let board = match node {
        SceneNode::Root(board) | SceneNode::Element(board, _) => board,
    };
    let mut queue: VecDeque<&'a ElementNode> = match node {
        SceneNode::Root(_) => node.children().collect(),
        SceneNode::Element(_, element) => VecDeque::from([element]),
    };
    while let Some(current) = queue.pop_front() {
        visit(current)?;
        queue.extend(SceneNode::Element(board, current).children());
    }
    ControlFlow::Continue(())
}

/// Every element under `point` (world coordinates), in breadth-first order.
///
/// Later entries are drawn above earlier ones, so the last hit is the
/// topmost. Never fails; no hits gives an empty list.
pub fn get_hit_elements<'a>(board: &'a Board, point: Point) -> Vec<&'a Element> {
    let mut hits = Vec::new();
    let _ = bfs::<()>(SceneNode::Root(board), |node| {
        if board.is_hit(&node.element, point) {
            hits.push(&node.element);
        }
        ControlFlow::Continue(())
    });
    hits
}

/// Elements the marquee `area` selects, in depth-first order.
pub fn get_elements_in_area<'a>(board: &'a Board, area: &SelectArea) -> Vec<&'a Element> {
    let rect = area.to_rect();
    let mut found = Vec::new();
    let _ = dfs::<()>(SceneNode::Root(board), |node| {
        if board.is_element_selected(&node.element, rect) {
            found.push(&node.element);
        }
        ControlFlow::Continue(())
    });
    found
}

pub fn all_element_ids(board: &Board) -> Vec<ElementId> {
    let mut ids = Vec::with_capacity(board.scene().len());
    let _ = dfs::<()>(SceneNode::Root(board), |node| {
        ids.push(node.element.id.clone());
        ControlFlow::Continue(())
    });
    ids
}

/// Union of the bounds of `ids`, or of every element for `None`.
pub fn elements_bounds(board: &Board, ids: Option<&[ElementId]>) -> Option<Rect> {
    match ids {
        Some(ids) => union_bounds(ids.iter().filter_map(|id| board.element(id)).map(Element::bounds)),
        None => {
            let mut rects = Vec::new();
            let _ = dfs::<()>(SceneNode::Root(board), |node| {
                rects.push(node.element.bounds());
                ControlFlow::Continue(())
            });
            union_bounds(rects)
        }
    }
}
