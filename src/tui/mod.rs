//! Terminal UI module using ratatui
//!
//! - `Selector` - The "pick one of N" boundary used by the binary
//! - `FuzzyPicker` - Full-screen fuzzy finder implementing it
//! - `Theme` - Picker colors per terminal color depth

mod event;
mod picker;
mod selector;
mod theme;

pub use event::*;
pub use picker::*;
pub use selector::*;
pub use theme::*;
