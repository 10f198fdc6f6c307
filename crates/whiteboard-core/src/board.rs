//! The board: element tree, view port, selection and the plugin pipeline.
//!
//! All state changes go through [`Board::apply`], which notifies observers
//! after each successful operation.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{BoardConfig, ConfigError};
use crate::container::{self, Container};
use crate::element::{BoardElement, Element, ElementId};
use crate::input::{Cancelable, FrameEvent, KeyboardEvent, PointerEvent, WheelEvent};
use crate::kind::{BoxKind, ElementKind};
use crate::operation::{Operation, OperationError};
use crate::plugin::{BoardPlugin, EventResult, execute_sequence};
use crate::scene::SceneTree;
use crate::selection::Selection;
use crate::transforms::view_port::on_container_resize;
use crate::view_port::ViewPort;

/// Identity of a board instance, used to key its mounted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardId(Uuid);

impl BoardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a board could not be built.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid children: {0}")]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Handle returned by [`Board::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Notification sent to observers after an operation is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardChange {
    /// The element tree changed.
    Children,
    ViewPort(ViewPort),
    Selection(Selection),
    /// Properties of these elements changed.
    ElementsChanged(Vec<ElementId>),
    /// These subtrees were removed.
    ElementsRemoved(Vec<BoardElement>),
    /// Sent last for every applied operation that changed anything.
    Change,
}

type Observer = Box<dyn FnMut(&BoardChange)>;

pub struct Board {
    id: BoardId,
    scene: SceneTree,
    view_port: ViewPort,
    selection: Selection,
    config: BoardConfig,
    plugins: Vec<Box<dyn BoardPlugin>>,
    kinds: HashMap<String, Box<dyn ElementKind>>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    readonly: bool,
    destroyed: bool,
}

impl Board {
    /// Create a board from persisted children. Element ids must be unique.
    pub fn new(
        children: Vec<BoardElement>,
        view_port: ViewPort,
        selection: Selection,
    ) -> Result<Self, OperationError> {
        Self::build(children, view_port, selection, BoardConfig::default())
    }

    /// Like [`Board::new`], with a config that is validated first.
    pub fn with_config(
        children: Vec<BoardElement>,
        view_port: ViewPort,
        selection: Selection,
        config: BoardConfig,
    ) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self::build(children, view_port, selection, config)?)
    }

    fn build(
        children: Vec<BoardElement>,
        view_port: ViewPort,
        selection: Selection,
        config: BoardConfig,
    ) -> Result<Self, OperationError> {
        Ok(Self {
            id: BoardId::new(),
            scene: SceneTree::from_elements(children)?,
            view_port,
            selection,
            config,
            plugins: Vec::new(),
            kinds: HashMap::new(),
            observers: Vec::new(),
            next_subscription: 0,
            readonly: false,
            destroyed: false,
        })
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    /// Nested copy of the board's children.
    pub fn children(&self) -> Vec<BoardElement> {
        self.scene.to_elements()
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.scene.get(id).map(|node| &node.element)
    }

    pub fn view_port(&self) -> ViewPort {
        self.view_port
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replace the config. An invalid one is rejected and the current one kept.
    pub fn set_config(&mut self, config: BoardConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Read-only boards ignore element and selection edits. The view port
    /// can still be panned and zoomed.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- container -------------------------------------------------------

    /// Mount the board into a host surface and size the view port to it.
    pub fn mount(&mut self, surface: Rc<dyn Container>) {
        container::mount(self.id, surface);
        on_container_resize(self);
    }

    pub fn container(&self) -> Option<Rc<dyn Container>> {
        container::get(self.id)
    }

    /// Tear the board down: plugins and observers are dropped, the
    /// container is unmounted and further operations are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.plugins.clear();
        self.observers.clear();
        container::unmount(self.id);
        log::debug!("Destroyed board {}", self.id);
    }

    // --- plugins and kinds -----------------------------------------------

    /// Append a plugin, or replace the one registered under the same name.
    pub fn add_plugin(&mut self, plugin: Box<dyn BoardPlugin>) {
        match self.plugins.iter().position(|p| p.name() == plugin.name()) {
            Some(index) => self.plugins[index] = plugin,
            None => self.plugins.push(plugin),
        }
    }

    pub fn init_plugins(&mut self, plugins: Vec<Box<dyn BoardPlugin>>) {
        for plugin in plugins {
            self.add_plugin(plugin);
        }
    }

    pub fn remove_plugin(&mut self, name: &str) -> Option<Box<dyn BoardPlugin>> {
        let index = self.plugins.iter().position(|p| p.name() == name)?;
        Some(self.plugins.remove(index))
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Register behavior for an element type, replacing any previous one.
    pub fn register_kind(&mut self, kind: Box<dyn ElementKind>) {
        self.kinds.insert(kind.name().to_string(), kind);
    }

    /// Register each name as a [`BoxKind`].
    pub fn register_box_kinds<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.register_kind(Box::new(BoxKind::new(name)));
        }
    }

    /// Hit-test through the element's kind. Unknown kinds are never hit.
    pub fn is_hit(&self, element: &Element, point: Point) -> bool {
        self.kinds
            .get(&element.kind)
            .is_some_and(|kind| kind.is_hit(element, point))
    }

    /// Marquee test through the element's kind. Unknown kinds are never selected.
    pub fn is_element_selected(&self, element: &Element, area: Rect) -> bool {
        self.kinds
            .get(&element.kind)
            .is_some_and(|kind| kind.is_selected(element, area))
    }

    /// Properties that move `element` by `offset`.
    pub fn translate_element(&self, element: &Element, offset: Vec2) -> Map<String, Value> {
        match self.kinds.get(&element.kind) {
            Some(kind) => kind.translate(element, offset),
            None => BoxKind::new(element.kind.as_str()).translate(element, offset),
        }
    }

    // --- observers -------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl FnMut(&BoardChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, changes: &[BoardChange]) {
        for (_, observer) in &mut self.observers {
            for change in changes {
                observer(change);
            }
        }
    }

    // --- operations ------------------------------------------------------

    /// Apply one operation.
    ///
    /// Destroyed boards ignore everything; read-only boards ignore all but
    /// view port changes. Structural errors leave the board unchanged.
    pub fn apply(&mut self, op: Operation) -> Result<(), OperationError> {
        if self.destroyed {
            log::debug!("Ignoring {} on destroyed board {}", op.name(), self.id);
            return Ok(());
        }
        if self.readonly && !matches!(op, Operation::SetViewport { .. }) {
            log::debug!("Ignoring {} on read-only board {}", op.name(), self.id);
            return Ok(());
        }
        log::trace!("Applying {}", op.name());

        let mut changes = Vec::new();
        match op {
            Operation::InsertElement { path, node } => {
                self.scene.insert_at(&path, node)?;
                changes.push(BoardChange::Children);
            }
            Operation::RemoveElement { path, .. } => {
                let removed = self.scene.remove_at(&path)?;
                changes.push(BoardChange::Children);
                changes.push(BoardChange::ElementsRemoved(vec![removed]));
            }
            Operation::MoveElement { path, new_path } => {
                self.scene.move_node(&path, &new_path)?;
                changes.push(BoardChange::Children);
            }
            Operation::SetElement { path, old, new } => {
                let node = self
                    .scene
                    .node_at(&path)
                    .ok_or_else(|| OperationError::PathNotFound(path.clone()))?;
                let id = node.element.id.clone();

                // Validate on a copy so a bad key leaves the element untouched
                let mut element = node.element.clone();
                for (key, value) in &new {
                    element.set_property(key, value.clone())?;
                }
                for key in old.keys().filter(|key| !new.contains_key(*key)) {
                    element.set_property(key, Value::Null)?;
                }
                if let Some(slot) = self.scene.element_mut(&id) {
                    *slot = element;
                }
                changes.push(BoardChange::Children);
                changes.push(BoardChange::ElementsChanged(vec![id]));
            }
            Operation::SetViewport { new, .. } => {
                if new != self.view_port {
                    self.view_port = new;
                    changes.push(BoardChange::ViewPort(new));
                }
            }
            Operation::SetSelection { new, .. } => {
                if new != self.selection {
                    self.selection = new.clone();
                    changes.push(BoardChange::Selection(new));
                }
            }
        }

        if !changes.is_empty() {
            changes.push(BoardChange::Change);
            self.notify(&changes);
        }
        Ok(())
    }

    /// Apply operations in order, stopping at the first failure.
    pub fn apply_all(
        &mut self,
        ops: impl IntoIterator<Item = Operation>,
    ) -> Result<(), OperationError> {
        ops.into_iter().try_for_each(|op| self.apply(op))
    }

    // --- event entry points ----------------------------------------------

    fn dispatch<E, F>(&mut self, event: &mut E, hook: F) -> EventResult
    where
        E: Cancelable,
        F: FnMut(&mut dyn BoardPlugin, &mut E, &mut Board) -> EventResult,
    {
        if self.destroyed {
            return EventResult::NotHandled;
        }
        // Plugins get `&mut Board`, so run them detached from it
        let mut plugins = std::mem::take(&mut self.plugins);
        let result = execute_sequence(&mut plugins, event, self, hook);
        let added = std::mem::replace(&mut self.plugins, plugins);
        if self.destroyed {
            self.plugins.clear();
        } else {
            self.init_plugins(added);
        }
        result
    }

    pub fn on_pointer_down(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_pointer_down(event, board))
    }

    pub fn on_pointer_move(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_pointer_move(event, board))
    }

    pub fn on_pointer_up(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_pointer_up(event, board))
    }

    pub fn on_global_pointer_down(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| {
            plugin.on_global_pointer_down(event, board)
        })
    }

    pub fn on_global_pointer_move(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| {
            plugin.on_global_pointer_move(event, board)
        })
    }

    pub fn on_global_pointer_up(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| {
            plugin.on_global_pointer_up(event, board)
        })
    }

    pub fn on_click(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_click(event, board))
    }

    pub fn on_dbl_click(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_dbl_click(event, board))
    }

    pub fn on_context_menu(&mut self, event: &mut PointerEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_context_menu(event, board))
    }

    pub fn on_wheel(&mut self, event: &mut WheelEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_wheel(event, board))
    }

    pub fn on_key_down(&mut self, event: &mut KeyboardEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_key_down(event, board))
    }

    pub fn on_key_up(&mut self, event: &mut KeyboardEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_key_up(event, board))
    }

    pub fn on_frame(&mut self, event: &mut FrameEvent) -> EventResult {
        self.dispatch(event, |plugin, event, board| plugin.on_frame(event, board))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("id", &self.id)
            .field("elements", &self.scene.len())
            .field("view_port", &self.view_port)
            .field("selection", &self.selection)
            .field("plugins", &self.plugin_names())
            .field("readonly", &self.readonly)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        container::unmount(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::StaticContainer;
    use crate::path::Path;
    use serde_json::json;
    use std::cell::RefCell;

    fn leaf(id: &str, x: f64) -> BoardElement {
        BoardElement::leaf(Element::new(id, "card", Rect::new(x, 0.0, x + 10.0, 10.0)))
    }

    fn board() -> Board {
        Board::new(
            vec![leaf("a", 0.0), leaf("b", 20.0)],
            ViewPort::default(),
            Selection::default(),
        )
        .unwrap()
    }

    fn recorder(board: &mut Board) -> Rc<RefCell<Vec<BoardChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        board.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        seen
    }

    fn set_x(path: Vec<usize>, old: f64, new: f64) -> Operation {
        let mut before = Map::new();
        before.insert("x".into(), json!(old));
        let mut after = Map::new();
        after.insert("x".into(), json!(new));
        Operation::SetElement {
            path: Path::new(path),
            old: before,
            new: after,
        }
    }

    #[test]
    fn test_apply_insert_and_inverse() {
        let mut board = board();
        let op = Operation::insert(Path::new(vec![1]), leaf("c", 40.0));
        board.apply(op.clone()).unwrap();
        let ids: Vec<_> = board.children().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);

        board.apply(op.inverse()).unwrap();
        assert_eq!(board.children(), vec![leaf("a", 0.0), leaf("b", 20.0)]);
    }

    #[test]
    fn test_set_element_and_inverse() {
        let mut board = board();
        let op = set_x(vec![0], 0.0, 99.0);
        board.apply(op.clone()).unwrap();
        assert_eq!(board.element(&"a".into()).unwrap().x, 99.0);
        board.apply(op.inverse()).unwrap();
        assert_eq!(board.element(&"a".into()).unwrap().x, 0.0);
    }

    #[test]
    fn test_set_element_clears_keys_missing_from_new() {
        let mut board = board();
        let mut old = Map::new();
        old.insert("color".into(), Value::Null);
        let mut new = Map::new();
        new.insert("color".into(), json!("red"));
        let op = Operation::SetElement {
            path: Path::new(vec![1]),
            old,
            new,
        };
        board.apply(op.clone()).unwrap();
        assert_eq!(board.element(&"b".into()).unwrap().property("color"), Some(json!("red")));

        // The inverse has no "color" in its new map, so the key goes away.
        let Operation::SetElement { path, old, .. } = op.inverse() else {
            unreachable!()
        };
        board
            .apply(Operation::SetElement { path, old, new: Map::new() })
            .unwrap();
        assert_eq!(board.element(&"b".into()).unwrap().property("color"), None);
    }

    #[test]
    fn test_failed_set_leaves_element_untouched() {
        let mut board = board();
        let mut new = Map::new();
        new.insert("x".into(), json!(5.0));
        new.insert("y".into(), json!("oops"));
        let result = board.apply(Operation::SetElement {
            path: Path::new(vec![0]),
            old: Map::new(),
            new,
        });
        assert!(result.is_err());
        assert_eq!(board.element(&"a".into()).unwrap().x, 0.0);
    }

    #[test]
    fn test_remove_emits_removed_subtree() {
        let mut board = board();
        let seen = recorder(&mut board);
        board
            .apply(Operation::remove(Path::new(vec![0]), leaf("a", 0.0)))
            .unwrap();
        let seen = seen.borrow();
        assert_eq!(seen[0], BoardChange::Children);
        assert_eq!(seen[1], BoardChange::ElementsRemoved(vec![leaf("a", 0.0)]));
        assert_eq!(seen[2], BoardChange::Change);
    }

    #[test]
    fn test_view_port_notifies_only_on_change() {
        let mut board = board();
        let seen = recorder(&mut board);
        let same = board.view_port();
        board.apply(Operation::set_view_port(same, same)).unwrap();
        assert!(seen.borrow().is_empty());

        let moved = same.moved_to(5.0, 5.0);
        board.apply(Operation::set_view_port(same, moved)).unwrap();
        assert_eq!(board.view_port(), moved);
        assert_eq!(
            *seen.borrow(),
            vec![BoardChange::ViewPort(moved), BoardChange::Change]
        );
    }

    #[test]
    fn test_readonly_skips_edits_but_allows_view_port() {
        let mut board = board();
        board.set_readonly(true);
        board.apply(set_x(vec![0], 0.0, 50.0)).unwrap();
        assert_eq!(board.element(&"a".into()).unwrap().x, 0.0);

        let selection = Selection::with_elements(vec!["a".into()]);
        board
            .apply(Operation::set_selection(Selection::default(), selection))
            .unwrap();
        assert!(board.selection().is_empty());

        let moved = board.view_port().moved_to(1.0, 2.0);
        board
            .apply(Operation::set_view_port(board.view_port(), moved))
            .unwrap();
        assert_eq!(board.view_port(), moved);
    }

    #[test]
    fn test_unsubscribe() {
        let mut board = board();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = board.subscribe(move |_| *sink.borrow_mut() += 1);
        board.apply(set_x(vec![0], 0.0, 1.0)).unwrap();
        assert!(board.unsubscribe(id));
        board.apply(set_x(vec![0], 1.0, 2.0)).unwrap();
        assert_eq!(*count.borrow(), 3);
        assert!(!board.unsubscribe(id));
    }

    #[test]
    fn test_destroy_unmounts_and_ignores_ops() {
        let mut board = board();
        board.mount(Rc::new(StaticContainer::new(Rect::new(0.0, 0.0, 100.0, 100.0))));
        assert!(board.container().is_some());

        board.destroy();
        assert!(board.container().is_none());
        board.apply(set_x(vec![0], 0.0, 7.0)).unwrap();
        assert_eq!(board.element(&"a".into()).unwrap().x, 0.0);
    }

    #[test]
    fn test_mount_sizes_view_port() {
        let mut board = board();
        assert_eq!(board.view_port().width, 0.0);
        board.mount(Rc::new(StaticContainer::new(Rect::new(0.0, 0.0, 800.0, 600.0))));
        let vp = board.view_port();
        assert_eq!((vp.min_x, vp.min_y, vp.zoom), (0.0, 0.0, 1.0));
        assert_eq!((vp.width, vp.height), (800.0, 600.0));
    }

    #[test]
    fn test_with_config_rejects_inverted_zoom_range() {
        let config = BoardConfig {
            min_zoom: 5.0,
            max_zoom: 1.0,
            ..Default::default()
        };
        let result = Board::with_config(Vec::new(), ViewPort::default(), Selection::default(), config);
        assert!(matches!(result, Err(BoardError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_with_config_reports_duplicate_ids() {
        let result = Board::with_config(
            vec![leaf("a", 0.0), leaf("a", 5.0)],
            ViewPort::default(),
            Selection::default(),
            BoardConfig::default(),
        );
        assert!(matches!(
            result,
            Err(BoardError::Operation(OperationError::DuplicateId(_)))
        ));
    }

    #[test]
    fn test_set_config_keeps_current_on_invalid() {
        let mut board = board();
        let invalid = BoardConfig {
            min_zoom: 5.0,
            max_zoom: 1.0,
            ..Default::default()
        };
        assert!(board.set_config(invalid).is_err());
        assert_eq!(board.config(), &BoardConfig::default());

        let tighter = BoardConfig {
            max_zoom: 2.0,
            ..Default::default()
        };
        board.set_config(tighter.clone()).unwrap();
        assert_eq!(board.config(), &tighter);
    }

    #[test]
    fn test_hit_requires_registered_kind() {
        let mut board = board();
        let element = board.element(&"a".into()).unwrap().clone();
        assert!(!board.is_hit(&element, Point::new(5.0, 5.0)));
        board.register_box_kinds(["card"]);
        assert!(board.is_hit(&element, Point::new(5.0, 5.0)));
        assert!(board.is_element_selected(&element, Rect::new(8.0, 8.0, 30.0, 30.0)));
    }

    #[test]
    fn test_apply_all_stops_on_error() {
        let mut board = board();
        let result = board.apply_all([
            set_x(vec![0], 0.0, 3.0),
            set_x(vec![7], 0.0, 3.0),
            set_x(vec![1], 20.0, 3.0),
        ]);
        assert!(matches!(result, Err(OperationError::PathNotFound(_))));
        assert_eq!(board.element(&"a".into()).unwrap().x, 3.0);
        assert_eq!(board.element(&"b".into()).unwrap().x, 20.0);
    }
}
