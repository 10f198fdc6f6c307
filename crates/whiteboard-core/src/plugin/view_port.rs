//! Pan and zoom with the mouse, wheel and keyboard.

use kurbo::{Point, Vec2};

use super::{BoardPlugin, EventResult};
use crate::board::Board;
use crate::input::{Cancelable, FrameEvent, Instant, KeyboardEvent, MouseButton, PointerEvent, WheelEvent};
use crate::point::{container_point, is_inside_container};
use crate::transforms::view_port::{fit_all_elements, move_view_port, zoom_by_steps};

const ARROW_KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

/// Right-button drag in progress.
#[derive(Debug, Clone, Copy)]
struct PanGesture {
    /// Client position where the drag started.
    start: Point,
    /// View port corner and zoom when the drag started.
    origin: Point,
    zoom: f64,
}

/// Zoom ticks that arrived inside the debounce window.
#[derive(Debug, Clone, Copy)]
struct PendingZoom {
    steps: i32,
    /// Container-relative cursor position of the latest tick.
    anchor: Point,
}

/// Viewport navigation.
///
/// - Right-button drag pans.
/// - Wheel pans; Ctrl/Cmd + wheel zooms about the cursor.
/// - Arrow keys nudge the view when nothing is selected (Alt for a finer step).
/// - `mod+=` / `mod+-` zoom about the center, `mod+o` fits the selection or
///   all content into view.
#[derive(Debug, Default)]
pub struct ViewPortPlugin {
    pan: Option<PanGesture>,
    last_zoom_at: Option<Instant>,
    pending_zoom: Option<PendingZoom>,
}

impl ViewPortPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    fn wheel_zoom(&mut self, event: &WheelEvent, board: &mut Board) {
        let step = if event.delta.y < 0.0 {
            1
        } else if event.delta.y > 0.0 {
            -1
        } else {
            return;
        };
        let Some(anchor) = container_point(board, event.position) else {
            return;
        };

        let window = board.config().wheel_debounce();
        let in_window = self
            .last_zoom_at
            .is_some_and(|last| event.time.saturating_duration_since(last) < window);
        if in_window {
            let pending = self.pending_zoom.get_or_insert(PendingZoom { steps: 0, anchor });
            pending.steps += step;
            pending.anchor = anchor;
            return;
        }

        let carried = self.pending_zoom.take().map_or(0, |pending| pending.steps);
        self.last_zoom_at = Some(event.time);
        zoom_by_steps(board, step + carried, Some(anchor));
    }

    fn wheel_pan(event: &WheelEvent, board: &mut Board) {
        let config = board.config();
        let threshold = config.touchpad_delta_threshold;
        let touchpad = event.delta.x.abs() < threshold && event.delta.y.abs() < threshold;
        let scale = if touchpad {
            Vec2::new(config.touchpad_pan_scale, config.touchpad_pan_scale)
        } else {
            Vec2::new(config.mouse_pan_scale_x, config.mouse_pan_scale_y)
        };
        let vp = board.view_port();
        move_view_port(
            board,
            vp.min_x + scale.x * event.delta.x,
            vp.min_y + scale.y * event.delta.y,
        );
    }

    fn arrow_pan(event: &KeyboardEvent, board: &mut Board) {
        let config = board.config();
        let step = if event.modifiers.alt {
            config.precise_arrow_pan_step
        } else {
            config.arrow_pan_step
        };
        let offset = match event.key.as_str() {
            "ArrowUp" => Vec2::new(0.0, -step),
            "ArrowDown" => Vec2::new(0.0, step),
            "ArrowLeft" => Vec2::new(-step, 0.0),
            _ => Vec2::new(step, 0.0),
        };
        let vp = board.view_port();
        move_view_port(board, vp.min_x + offset.x, vp.min_y + offset.y);
    }
}

impl BoardPlugin for ViewPortPlugin {
    fn name(&self) -> &str {
        "viewport"
    }

    fn on_pointer_down(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        if event.button != MouseButton::Right {
            return EventResult::NotHandled;
        }
        let vp = board.view_port();
        self.pan = Some(PanGesture {
            start: event.position,
            origin: vp.origin(),
            zoom: vp.zoom,
        });
        EventResult::Handled
    }

    fn on_pointer_move(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        let Some(pan) = self.pan else {
            return EventResult::NotHandled;
        };
        // Zoom captured at drag start, not the live one
        let delta = (pan.start - event.position) / pan.zoom;
        move_view_port(board, pan.origin.x + delta.x, pan.origin.y + delta.y);
        EventResult::Handled
    }

    fn on_global_pointer_up(&mut self, _event: &mut PointerEvent, _board: &mut Board) -> EventResult {
        self.pan = None;
        EventResult::NotHandled
    }

    fn on_context_menu(&mut self, event: &mut PointerEvent, _board: &mut Board) -> EventResult {
        event.prevent_default();
        EventResult::Handled
    }

    fn on_wheel(&mut self, event: &mut WheelEvent, board: &mut Board) -> EventResult {
        if !is_inside_container(board, event.position) {
            return EventResult::NotHandled;
        }
        event.prevent_default();
        if event.modifiers.is_mod() {
            self.wheel_zoom(event, board);
        } else {
            Self::wheel_pan(event, board);
        }
        EventResult::Handled
    }

    fn on_key_down(&mut self, event: &mut KeyboardEvent, board: &mut Board) -> EventResult {
        if ARROW_KEYS.contains(&event.key.as_str()) && board.selection().is_empty() {
            event.prevent_default();
            Self::arrow_pan(event, board);
            return EventResult::Handled;
        }

        if event.is_hotkey("mod+=") || event.is_hotkey("mod++") {
            event.prevent_default();
            zoom_by_steps(board, 1, None);
        } else if event.is_hotkey("mod+-") {
            event.prevent_default();
            zoom_by_steps(board, -1, None);
        } else if event.is_hotkey("mod+o") {
            event.prevent_default();
            let selected = board.selection().selected.clone();
            let ids = (!selected.is_empty()).then_some(selected.as_slice());
            fit_all_elements(board, ids);
        } else {
            return EventResult::NotHandled;
        }
        EventResult::Handled
    }

    fn on_frame(&mut self, event: &mut FrameEvent, board: &mut Board) -> EventResult {
        let Some(pending) = self.pending_zoom else {
            return EventResult::NotHandled;
        };
        let window = board.config().wheel_debounce();
        let elapsed = self
            .last_zoom_at
            .map_or(window, |last| event.time.saturating_duration_since(last));
        if elapsed >= window {
            self.pending_zoom = None;
            self.last_zoom_at = Some(event.time);
            zoom_by_steps(board, pending.steps, Some(pending.anchor));
        }
        EventResult::NotHandled
    }
}
