//! The code editor: open files, breakpoints, the mock debugger, simulated runs and the
//! panels around them, driven through a single [`CodeEditor`] controller.
mod boundary;
mod code_editor;
mod layout;
mod notification;
mod surface;

pub use boundary::{Clipboard, Download, Downloader, Fullscreen, share_url};
pub use code_editor::{CodeEditor, EditorHandle};
pub use layout::{LEFT_PANEL_RANGE, Layout, RIGHT_PANEL_RANGE, RightTab};
pub use notification::{Level, NOTIFICATION_BACKLOG, Notification};
pub use surface::{EditorOptions, EditorSurface, HostAdapter, Key, KeyChord, Shortcut};

// re-exports for front ends
pub use config::{Config, EditorSettings, Theme};
pub use debugger::{Breakpoint, DebugState};
pub use files::{CloseOutcome, FileTab, ProjectFile, Validation};
pub use language::LanguageId;
pub use runner::{NodeEngine, OutputBuffer, ScriptEngine, Simulator};
