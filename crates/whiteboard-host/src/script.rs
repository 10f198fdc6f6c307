//! Scripted input streams and the replayer that feeds them to a board.

use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use whiteboard_core::input::Instant;
use whiteboard_core::transforms::view_port::on_container_resize;
use whiteboard_core::{
    Board, BoardChange, BoardDocument, BoardPlugin, Container, FrameEvent, KeyboardEvent, Modifiers, MouseButton,
    MovePlugin, PointerEvent, SelectPlugin, StaticContainer, ViewPortPlugin, WheelEvent,
};

/// One recorded host event. Positions are client pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    /// Container pointer-up followed by the document-global one.
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    ContextMenu {
        x: f64,
        y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    Frame,
    /// Advance the virtual clock.
    Wait {
        ms: u64,
    },
}

fn log_change(change: &BoardChange) {
    match change {
        BoardChange::ViewPort(vp) => {
            log::debug!("View port: origin ({:.1}, {:.1}) zoom {:.3}", vp.min_x, vp.min_y, vp.zoom)
        }
        BoardChange::Selection(selection) => {
            log::debug!("Selection: {} element(s)", selection.selected.len())
        }
        BoardChange::ElementsChanged(ids) => log::debug!("Changed {} element(s)", ids.len()),
        BoardChange::ElementsRemoved(removed) => log::debug!("Removed {} subtree(s)", removed.len()),
        BoardChange::Children => log::trace!("Element tree changed"),
        BoardChange::Change => {}
    }
}

/// Drives a board the way a browser host would, on a virtual clock.
pub struct Replayer {
    board: Board,
    surface: Rc<StaticContainer>,
    start: Instant,
    elapsed: Duration,
}

impl Replayer {
    /// Mount `board` into a `size` container at the client origin and
    /// install the navigation, selection and move plugins.
    pub fn new(mut board: Board, size: Size) -> Self {
        let surface = Rc::new(StaticContainer::new(Rect::from_origin_size(Point::ZERO, size)));
        board.mount(surface.clone());
        board.subscribe(log_change);

        let plugins: Vec<Box<dyn BoardPlugin>> = vec![
            Box::new(ViewPortPlugin::new()),
            Box::new(SelectPlugin::new()),
            Box::new(MovePlugin::new()),
        ];
        board.init_plugins(plugins);

        Self {
            board,
            surface,
            start: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn document(&self) -> BoardDocument {
        self.board.to_document()
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn pointer(&self, x: f64, y: f64, button: MouseButton, modifiers: Modifiers) -> PointerEvent {
        PointerEvent::new(Point::new(x, y), button)
            .with_modifiers(modifiers)
            .at(self.now())
    }

    pub fn play(&mut self, event: &ScriptEvent) {
        log::trace!("Replaying {event:?}");
        match event {
            ScriptEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => {
                let template = self.pointer(*x, *y, *button, *modifiers);
                self.board.on_pointer_down(&mut template.clone());
                self.board.on_global_pointer_down(&mut template.clone());
            }
            ScriptEvent::PointerMove {
                x,
                y,
                button,
                modifiers,
            } => {
                let template = self.pointer(*x, *y, *button, *modifiers);
                self.board.on_pointer_move(&mut template.clone());
                self.board.on_global_pointer_move(&mut template.clone());
            }
            ScriptEvent::PointerUp {
                x,
                y,
                button,
                modifiers,
            } => {
                let template = self.pointer(*x, *y, *button, *modifiers);
                self.board.on_pointer_up(&mut template.clone());
                self.board.on_global_pointer_up(&mut template.clone());
            }
            ScriptEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => {
                let mut wheel = WheelEvent::new(Point::new(*x, *y), Vec2::new(*dx, *dy))
                    .with_modifiers(*modifiers)
                    .at(self.now());
                self.board.on_wheel(&mut wheel);
            }
            ScriptEvent::KeyDown { key, modifiers } => {
                let mut key = KeyboardEvent::new(key.clone())
                    .with_modifiers(*modifiers)
                    .at(self.now());
                self.board.on_key_down(&mut key);
            }
            ScriptEvent::KeyUp { key, modifiers } => {
                let mut key = KeyboardEvent::new(key.clone())
                    .with_modifiers(*modifiers)
                    .at(self.now());
                self.board.on_key_up(&mut key);
            }
            ScriptEvent::ContextMenu { x, y } => {
                let mut menu = self.pointer(*x, *y, MouseButton::Right, Modifiers::default());
                self.board.on_context_menu(&mut menu);
            }
            ScriptEvent::Resize { width, height } => {
                let origin = self.surface.bounding_rect().origin();
                self.surface
                    .set_rect(Rect::from_origin_size(origin, Size::new(*width, *height)));
                on_container_resize(&mut self.board);
            }
            ScriptEvent::Frame => {
                self.board.on_frame(&mut FrameEvent::new(self.now()));
            }
            ScriptEvent::Wait { ms } => {
                self.elapsed += Duration::from_millis(*ms);
            }
        }
    }

    pub fn play_all<'a>(&mut self, events: impl IntoIterator<Item = &'a ScriptEvent>) {
        for event in events {
            self.play(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiteboard_core::{BoardConfig, BoardElement, Element, Selection, ViewPort};

    const EPS: f64 = 1e-9;

    fn board() -> Board {
        let mut board = Board::with_config(
            vec![
                BoardElement::leaf(Element::new("a", "card", Rect::new(0.0, 0.0, 50.0, 50.0))),
                BoardElement::leaf(Element::new("b", "card", Rect::new(100.0, 0.0, 150.0, 50.0))),
            ],
            ViewPort::default(),
            Selection::default(),
            BoardConfig::default(),
        )
        .unwrap();
        board.register_box_kinds(["card"]);
        board
    }

    fn script(json: &str) -> Vec<ScriptEvent> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_mount_sizes_view_port() {
        let replayer = Replayer::new(board(), Size::new(800.0, 600.0));
        let vp = replayer.board().view_port();
        assert_eq!((vp.width, vp.height), (800.0, 600.0));
        assert_eq!(
            replayer.board().plugin_names(),
            vec!["viewport", "select", "move"]
        );
    }

    #[test]
    fn test_parse_script() {
        let events = script(
            r#"[
                { "event": "pointer_down", "x": 1, "y": 2, "button": "right", "ctrl": true },
                { "event": "wait", "ms": 20 },
                { "event": "frame" }
            ]"#,
        );
        assert_eq!(
            events[0],
            ScriptEvent::PointerDown {
                x: 1.0,
                y: 2.0,
                button: MouseButton::Right,
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            }
        );
        assert_eq!(events[1], ScriptEvent::Wait { ms: 20 });
        assert_eq!(events[2], ScriptEvent::Frame);
    }

    #[test]
    fn test_right_drag_pans() {
        let mut replayer = Replayer::new(board(), Size::new(800.0, 600.0));
        replayer.play_all(&script(
            r#"[
                { "event": "pointer_down", "x": 100, "y": 100, "button": "right" },
                { "event": "pointer_move", "x": 150, "y": 130, "button": "right" },
                { "event": "pointer_up", "x": 150, "y": 130, "button": "right" },
                { "event": "pointer_move", "x": 300, "y": 300 }
            ]"#,
        ));
        let vp = replayer.board().view_port();
        assert_eq!((vp.min_x, vp.min_y), (-50.0, -30.0));
        assert!(replayer.board().selection().is_empty());
    }

    #[test]
    fn test_coalesced_zoom_flushes_on_frame() {
        let mut replayer = Replayer::new(board(), Size::new(800.0, 600.0));
        replayer.play_all(&script(
            r#"[
                { "event": "wheel", "x": 400, "y": 300, "dy": -1, "ctrl": true },
                { "event": "wait", "ms": 10 },
                { "event": "wheel", "x": 400, "y": 300, "dy": -1, "ctrl": true },
                { "event": "frame" }
            ]"#,
        ));
        assert!((replayer.board().view_port().zoom - 1.1).abs() < EPS);

        replayer.play_all(&script(
            r#"[{ "event": "wait", "ms": 200 }, { "event": "frame" }]"#,
        ));
        assert!((replayer.board().view_port().zoom - 1.1_f64.powi(2)).abs() < EPS);
    }

    #[test]
    fn test_click_drag_and_delete() {
        let mut replayer = Replayer::new(board(), Size::new(800.0, 600.0));
        replayer.play_all(&script(
            r#"[
                { "event": "pointer_down", "x": 25, "y": 25 },
                { "event": "pointer_up", "x": 25, "y": 25 },
                { "event": "pointer_down", "x": 25, "y": 25 },
                { "event": "pointer_move", "x": 45, "y": 35 },
                { "event": "pointer_up", "x": 45, "y": 35 }
            ]"#,
        ));
        let a = replayer.board().element(&"a".into()).unwrap();
        assert_eq!((a.x, a.y), (20.0, 10.0));
        assert!(replayer.board().selection().contains(&"a".into()));

        replayer.play(&ScriptEvent::KeyDown {
            key: "Delete".into(),
            modifiers: Modifiers::default(),
        });
        let document = replayer.document();
        assert_eq!(document.children.len(), 1);
        assert!(document.selection.selected.is_empty());
    }

    #[test]
    fn test_resize_keeps_zoom() {
        let mut replayer = Replayer::new(board(), Size::new(800.0, 600.0));
        replayer.play(&ScriptEvent::KeyDown {
            key: "=".into(),
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        });
        replayer.play(&ScriptEvent::Resize {
            width: 400.0,
            height: 300.0,
        });
        let vp = replayer.board().view_port();
        assert!((vp.zoom - 1.1).abs() < EPS);
        assert!((vp.width * vp.zoom - 400.0).abs() < 1e-6);
    }
}
