//! In-memory store of the files open in the editor, and the static project tree.
mod store;
mod tree;

pub use store::{CloseOutcome, FileStore, FileTab, Validation};
pub use tree::{ProjectFile, default_project};
