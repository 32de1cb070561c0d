//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard input to actions and navigation intents
//! - `events` - location changes and background task results
//! - `render` - layout and view dispatch
//! - `helpers` - background task spawning
//! - `nav` - navigation panel widget
//! - `listing` - paginated article listing widget
//! - `reader` - article detail widget and Markdown styling
//! - `not_found` - unmatched location view
//! - `status` - status bar widget
//! - `help` - keybinding overlay

mod events;
mod help;
mod helpers;
mod input;
mod listing;
mod loop_runner;
mod nav;
mod not_found;
pub mod reader;
mod render;
mod status;

pub use loop_runner::{run, Action};
