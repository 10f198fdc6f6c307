//! Input plugins and the pipeline that runs them.
//!
//! A board holds an ordered list of plugins. Each host event is offered to
//! them in order until one reports [`EventResult::Handled`] or calls
//! `prevent_default` on the event.

mod moving;
mod select;
mod view_port;

pub use moving::MovePlugin;
pub use select::SelectPlugin;
pub use view_port::ViewPortPlugin;

use crate::board::Board;
use crate::input::{Cancelable, FrameEvent, KeyboardEvent, PointerEvent, WheelEvent};

/// Whether a plugin consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Stop here; later plugins do not see the event.
    Handled,
    NotHandled,
}

impl EventResult {
    pub fn is_handled(self) -> bool {
        self == EventResult::Handled
    }
}

/// A unit of interactive behavior. Every hook defaults to doing nothing.
///
/// Pointer hooks receive client-pixel positions; use
/// [`screen_to_view_port`](crate::point::screen_to_view_port) to get world
/// coordinates. The `on_global_*` hooks fire for pointer activity anywhere
/// in the document, so drags continue outside the container.
#[allow(unused_variables)]
pub trait BoardPlugin {
    /// Plugins registered under the same name replace each other.
    fn name(&self) -> &str;

    fn on_pointer_down(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_pointer_move(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_pointer_up(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_global_pointer_down(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_global_pointer_move(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_global_pointer_up(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_click(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_dbl_click(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_context_menu(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_wheel(&mut self, event: &mut WheelEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_key_down(&mut self, event: &mut KeyboardEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_key_up(&mut self, event: &mut KeyboardEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }

    fn on_frame(&mut self, event: &mut FrameEvent, board: &mut Board) -> EventResult {
        EventResult::NotHandled
    }
}

/// Offer `event` to each plugin in order.
///
/// Stops after the first plugin that returns [`EventResult::Handled`] or
/// leaves the event default-prevented, and reports `Handled` in that case.
pub fn execute_sequence<E, F>(
    plugins: &mut [Box<dyn BoardPlugin>],
    event: &mut E,
    board: &mut Board,
    mut hook: F,
) -> EventResult
where
    E: Cancelable,
    F: FnMut(&mut dyn BoardPlugin, &mut E, &mut Board) -> EventResult,
{
    for plugin in plugins.iter_mut() {
        let result = hook(plugin.as_mut(), event, board);
        if result.is_handled() || event.default_prevented() {
            log::trace!("Event consumed by plugin {}", plugin.name());
            return EventResult::Handled;
        }
    }
    EventResult::NotHandled
}
