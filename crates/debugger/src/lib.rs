//! Breakpoints and the mock debug session
//!
//! The session does not control any execution. Starting it produces a fixed snapshot of a
//! call stack and local variables for the active file, which the debug panel displays.
mod breakpoints;
mod session;
pub(crate) mod state;
mod types;

pub use breakpoints::{BreakpointSet, Toggled};
pub use session::{DebugSession, EVENT_BACKLOG};
pub use state::{DebugState, Event};
pub use types::{Breakpoint, Error};
