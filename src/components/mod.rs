//! The components module contains the controller page and its pieces.

mod icons;
mod jukebox_view;
mod queue_panel;

pub use icons::*;
pub use jukebox_view::*;
pub use queue_panel::*;
