//! The game's screens.

pub mod main_menu;
pub mod map_editor;

pub use main_menu::{MainMenu, MenuCommand};
pub use map_editor::MapEditor;
