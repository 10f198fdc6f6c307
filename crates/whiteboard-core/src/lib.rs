//! Whiteboard Core Library
//!
//! Platform-agnostic whiteboard engine: an element tree addressed by id and
//! path, a zoomable view port, selection, and an ordered pipeline of input
//! plugins. Rendering and DOM concerns stay with the host.

pub mod board;
pub mod config;
pub mod container;
pub mod document;
pub mod element;
pub mod geometry;
pub mod input;
pub mod kind;
pub mod operation;
pub mod path;
pub mod plugin;
pub mod point;
pub mod scene;
pub mod selection;
pub mod transforms;
pub mod traverse;
pub mod view_port;

pub use board::{Board, BoardChange, BoardError, BoardId, SubscriptionId};
pub use config::{BoardConfig, ConfigError};
pub use container::{Container, StaticContainer};
pub use document::{BoardDocument, DocumentError};
pub use element::{BoardElement, Element, ElementId};
pub use input::{Cancelable, FrameEvent, KeyboardEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use kind::{BoxKind, DEFAULT_BOX_KINDS, ElementKind};
pub use operation::{Operation, OperationError};
pub use path::Path;
pub use plugin::{BoardPlugin, EventResult, MovePlugin, SelectPlugin, ViewPortPlugin, execute_sequence};
pub use scene::{ElementNode, SceneTree};
pub use selection::{SelectArea, Selection};
pub use traverse::SceneNode;
pub use view_port::{MAX_ZOOM, MIN_ZOOM, ViewPort};
