//! Text helpers shared by the terminal views and print mode.
//!
//! - **Width**: Unicode-aware display width and truncation
//! - **Sanitizing**: control-character and escape-sequence stripping for
//!   text that came from outside the process

mod text;

pub use text::{display_width, strip_control_chars, truncate_to_width};
