use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub(crate) enum DebuggerState {
    Idle,
    Debugging(DebugState),
}

/// Snapshot shown in the debug panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugState {
    pub is_debugging: bool,
    pub current_line: Option<usize>,
    pub call_stack: Vec<String>,
    pub local_variables: BTreeMap<String, String>,
}

/// Published on every session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(DebugState),
    Stopped,
}

impl<'a> From<&'a DebuggerState> for Event {
    fn from(value: &'a DebuggerState) -> Self {
        match value {
            DebuggerState::Idle => Event::Stopped,
            DebuggerState::Debugging(state) => Event::Started(state.clone()),
        }
    }
}

impl<'a> From<&'a DebuggerState> for DebugState {
    fn from(value: &'a DebuggerState) -> Self {
        match value {
            DebuggerState::Idle => DebugState::default(),
            DebuggerState::Debugging(state) => state.clone(),
        }
    }
}
