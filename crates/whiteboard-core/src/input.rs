//! Input events forwarded from the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index.
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn is_mod(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Events whose default host behavior a plugin can suppress.
pub trait Cancelable {
    fn prevent_default(&mut self);
    fn default_prevented(&self) -> bool;
}

macro_rules! impl_cancelable {
    ($($event:ty),* $(,)?) => {
        $(impl Cancelable for $event {
            fn prevent_default(&mut self) {
                self.default_prevented = true;
            }

            fn default_prevented(&self) -> bool {
                self.default_prevented
            }
        })*
    };
}

/// Pointer press, move, release or click. `position` is in client pixels.
#[derive(Debug, Clone)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub time: Instant,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn new(position: Point, button: MouseButton) -> Self {
        Self {
            position,
            button,
            modifiers: Modifiers::default(),
            time: Instant::now(),
            default_prevented: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }
}

/// Mouse wheel or touchpad scroll.
#[derive(Debug, Clone)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
    pub time: Instant,
    default_prevented: bool,
}

impl WheelEvent {
    pub fn new(position: Point, delta: Vec2) -> Self {
        Self {
            position,
            delta,
            modifiers: Modifiers::default(),
            time: Instant::now(),
            default_prevented: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }
}

/// Key press or release. `key` follows DOM `KeyboardEvent.key` naming.
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub time: Instant,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            time: Instant::now(),
            default_prevented: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }

    /// Match a hotkey such as `"mod+a"` or `"shift+ArrowUp"`.
    ///
    /// `mod` means Ctrl or Cmd. Modifiers not named must be released,
    /// except Shift for single printable keys like `=`.
    pub fn is_hotkey(&self, hotkey: &str) -> bool {
        let mut wanted = Modifiers::default();
        let mut wants_mod = false;
        let mut key = None;
        for part in hotkey.split('+') {
            match part.to_ascii_lowercase().as_str() {
                "mod" => wants_mod = true,
                "ctrl" | "control" => wanted.ctrl = true,
                "meta" | "cmd" => wanted.meta = true,
                "alt" | "option" => wanted.alt = true,
                "shift" => wanted.shift = true,
                "" => {}
                _ => key = Some(part),
            }
        }
        let Some(key) = key.or_else(|| hotkey.ends_with("++").then_some("+")) else {
            return false;
        };
        if !self.key.eq_ignore_ascii_case(key) {
            return false;
        }

        let m = self.modifiers;
        let mod_ok = if wants_mod {
            m.is_mod()
        } else {
            m.ctrl == wanted.ctrl && m.meta == wanted.meta
        };
        let printable = key.chars().count() == 1;
        let shift_ok = m.shift == wanted.shift || (printable && !wanted.shift);
        mod_ok && m.alt == wanted.alt && shift_ok
    }
}

/// Animation frame tick.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    pub time: Instant,
    default_prevented: bool,
}

impl FrameEvent {
    pub fn new(time: Instant) -> Self {
        Self {
            time,
            default_prevented: false,
        }
    }
}

impl_cancelable!(PointerEvent, WheelEvent, KeyboardEvent, FrameEvent);
