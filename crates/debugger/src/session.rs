use std::collections::BTreeMap;

use crossbeam_channel::TrySendError;

use crate::{
    BreakpointSet, Error, Event,
    state::{DebugState, DebuggerState},
};

/// Transitions kept for a subscriber that has not read them yet; older ones are dropped first
pub const EVENT_BACKLOG: usize = 32;

/// The process wide mock debug session
///
/// Only [`DebugSession::start`] and [`DebugSession::stop`] change whether a session is running.
pub struct DebugSession {
    state: DebuggerState,
    publisher: crossbeam_channel::Sender<Event>,
    rx: crossbeam_channel::Receiver<Event>,
}

impl Default for DebugSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSession {
    pub fn new() -> Self {
        let (publisher, rx) = crossbeam_channel::bounded(EVENT_BACKLOG);
        Self {
            state: DebuggerState::Idle,
            publisher,
            rx,
        }
    }

    /// Subscribe to session transitions
    pub fn events(&self) -> crossbeam_channel::Receiver<Event> {
        self.rx.clone()
    }

    pub fn is_debugging(&self) -> bool {
        matches!(self.state, DebuggerState::Debugging(_))
    }

    pub fn state(&self) -> DebugState {
        DebugState::from(&self.state)
    }

    /// Begin a mock session for `file`
    ///
    /// The session pauses on the first enabled breakpoint of the file, or on line 1.
    #[tracing::instrument(skip(self, breakpoints))]
    pub fn start(&mut self, file: &str, breakpoints: &BreakpointSet) -> Result<DebugState, Error> {
        if self.is_debugging() {
            tracing::warn!("debug session already running");
            return Err(Error::AlreadyDebugging);
        }
        if file.is_empty() {
            tracing::warn!("no file to debug");
            return Err(Error::NoActiveFile);
        }

        let line = breakpoints
            .for_file(file)
            .find(|b| b.enabled)
            .map(|b| b.line)
            .unwrap_or(1);

        let snapshot = DebugState {
            is_debugging: true,
            current_line: Some(line),
            call_stack: vec![format!("main() at {file}:{line}")],
            local_variables: mock_variables(),
        };
        tracing::debug!(line, "starting mock debug session");
        self.set_state(DebuggerState::Debugging(snapshot.clone()));
        Ok(snapshot)
    }

    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self) -> Result<(), Error> {
        if !self.is_debugging() {
            tracing::warn!("no debug session to stop");
            return Err(Error::NotDebugging);
        }
        tracing::debug!("stopping mock debug session");
        self.set_state(DebuggerState::Idle);
        Ok(())
    }

    fn set_state(&mut self, new_state: DebuggerState) {
        let event = Event::from(&new_state);
        self.state = new_state;
        if let Err(TrySendError::Full(event)) = self.publisher.try_send(event) {
            tracing::debug!("event backlog full, dropping the oldest");
            let _ = self.rx.try_recv();
            let _ = self.publisher.try_send(event);
        }
    }
}

fn mock_variables() -> BTreeMap<String, String> {
    [
        ("count", "0"),
        ("message", "\"Hello, World!\""),
        ("items", "[1, 2, 3]"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
