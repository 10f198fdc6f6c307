//! Higher-level edits expressed as board operations.
//!
//! Transforms never touch board state directly; each one builds
//! [`Operation`](crate::operation::Operation)s and hands them to
//! [`Board::apply`](crate::board::Board::apply).

pub mod element;
pub mod selection;
pub mod view_port;

pub use element::{
    insert_element, move_element_to, remove_elements, set_element_properties, translate_elements,
};
pub use selection::{clear_selection, set_selected, update_select_area};
pub use view_port::{
    fit_all_elements, move_view_port, on_container_resize, update_zoom, zoom_by_steps,
};
