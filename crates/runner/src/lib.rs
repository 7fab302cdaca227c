//! Simulated execution of editor files
//!
//! Only javascript is really executed, in a separate `node` process. Every other language
//! is handled by pattern matching on the source text: print statements are picked out and
//! their literal arguments become the output.
mod engine;
mod output;
mod simulator;
mod strategy;

pub use engine::{Capture, NodeEngine, ScriptEngine};
pub use output::OutputBuffer;
pub use simulator::{DEFAULT_DELAY, Simulator};
pub use strategy::{
    C_FAMILY_FALLBACK, HTML_MESSAGE, JAVASCRIPT_NO_OUTPUT, PYTHON_FALLBACK, generic_fallback,
};
