//! Host surfaces a board is mounted into.
//!
//! The engine never owns the surface. Hosts register one per board in a
//! thread-local side table and every transform that needs pixel geometry
//! looks it up here, doing nothing when the board is not mounted.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Rect, Size};

use crate::board::BoardId;

/// A rectangular surface on screen.
pub trait Container {
    /// Current bounds in client (window) pixels.
    fn bounding_rect(&self) -> Rect;

    fn size(&self) -> Size {
        self.bounding_rect().size()
    }
}

/// A container whose bounds the host updates by hand.
#[derive(Debug, Default)]
pub struct StaticContainer {
    rect: Cell<Rect>,
}

impl StaticContainer {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(rect),
        }
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }
}

impl Container for StaticContainer {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }
}

thread_local! {
    static BOARD_TO_CONTAINER: RefCell<HashMap<BoardId, Rc<dyn Container>>> =
        RefCell::new(HashMap::new());
}

/// Attach `container` to `board`, replacing any previous one.
pub fn mount(board: BoardId, container: Rc<dyn Container>) {
    BOARD_TO_CONTAINER.with(|map| {
        map.borrow_mut().insert(board, container);
    });
    log::debug!("Mounted container for board {board}");
}

/// Detach the container from `board`. Safe to call during thread teardown.
pub fn unmount(board: BoardId) -> Option<Rc<dyn Container>> {
    BOARD_TO_CONTAINER
        .try_with(|map| map.borrow_mut().remove(&board))
        .ok()
        .flatten()
}

pub fn get(board: BoardId) -> Option<Rc<dyn Container>> {
    BOARD_TO_CONTAINER.with(|map| map.borrow().get(&board).cloned())
}

pub fn is_mounted(board: BoardId) -> bool {
    BOARD_TO_CONTAINER.with(|map| map.borrow().contains_key(&board))
}
