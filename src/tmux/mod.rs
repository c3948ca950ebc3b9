//! Async tmux integration module
//!
//! - `Multiplexer` - The session commands needed from tmux
//! - `TmuxExecutor` - Timeout-controlled tmux command execution
//! - `SessionOrchestrator` - Reuse, create and attach project sessions

mod executor;
mod orchestrator;

pub use executor::*;
pub use orchestrator::*;
