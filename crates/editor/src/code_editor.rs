use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use config::{Config, EditorSettings};
use crossbeam_channel::TrySendError;
use debugger::{BreakpointSet, DebugSession, DebugState, Toggled};
use files::{CloseOutcome, FileStore, FileTab, ProjectFile, Validation, default_project};
use language::LanguageId;
use runner::{NodeEngine, OutputBuffer, Simulator};

use crate::{
    boundary::{self, Clipboard, Download, Downloader, Fullscreen},
    layout::{Layout, RightTab},
    notification::{Level, NOTIFICATION_BACKLOG, Notification},
};

/// All state of one editor, owned in one place
///
/// Views read through the accessors and change state only through the operations below.
pub struct CodeEditor {
    files: FileStore,
    project: ProjectFile,
    breakpoints: BreakpointSet,
    debug: DebugSession,
    output: OutputBuffer,
    layout: Layout,
    settings: EditorSettings,
    share_base: String,
    is_running: bool,
    pending_close: Option<String>,
    publisher: crossbeam_channel::Sender<Notification>,
    rx: crossbeam_channel::Receiver<Notification>,
}

impl Default for CodeEditor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl CodeEditor {
    pub fn new(config: &Config) -> Self {
        let (publisher, rx) = crossbeam_channel::bounded(NOTIFICATION_BACKLOG);
        Self {
            files: FileStore::default(),
            project: default_project(),
            breakpoints: BreakpointSet::new(),
            debug: DebugSession::new(),
            output: OutputBuffer::new(),
            layout: Layout::default(),
            settings: config.editor.clone(),
            share_base: config.share.base_url.clone(),
            is_running: false,
            pending_close: None,
            publisher,
            rx,
        }
    }

    /// Subscribe to user facing messages
    pub fn notifications(&self) -> crossbeam_channel::Receiver<Notification> {
        self.rx.clone()
    }

    /// Subscribe to debug session transitions
    pub fn debug_events(&self) -> crossbeam_channel::Receiver<debugger::Event> {
        self.debug.events()
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        if let Err(TrySendError::Full(notification)) = self.publisher.try_send(notification) {
            tracing::debug!("notification backlog full, dropping the oldest");
            let _ = self.rx.try_recv();
            let _ = self.publisher.try_send(notification);
        }
    }

    fn reject<T>(&self, err: Validation) -> Result<T, Validation> {
        tracing::warn!(error = %err, "operation rejected");
        self.notify(Level::Error, err.to_string());
        Err(err)
    }

    // --- accessors

    pub fn files(&self) -> &[FileTab] {
        self.files.tabs()
    }

    pub fn file(&self, key: &str) -> Option<&FileTab> {
        self.files.get(key)
    }

    pub fn active(&self) -> Option<&FileTab> {
        self.files.active()
    }

    pub fn project(&self) -> &ProjectFile {
        &self.project
    }

    pub fn breakpoints(&self) -> &BreakpointSet {
        &self.breakpoints
    }

    pub fn debug_state(&self) -> DebugState {
        self.debug.state()
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_debugging(&self) -> bool {
        self.debug.is_debugging()
    }

    /// The stop button is only enabled while something is running
    pub fn is_stop_enabled(&self) -> bool {
        self.is_running || self.is_debugging()
    }

    /// File waiting for the user to confirm discarding its changes
    pub fn pending_close(&self) -> Option<&str> {
        self.pending_close.as_deref()
    }

    // --- files

    #[tracing::instrument(skip(self))]
    pub fn create_file(&mut self, name: &str, language: LanguageId) -> Result<(), Validation> {
        match self.files.create_file(name, language) {
            Ok(tab) => {
                let message = format!("created {}", tab.key());
                self.notify(Level::Success, message);
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Open a leaf of the project tree; directories are ignored
    #[tracing::instrument(skip(self))]
    pub fn open_from_tree(&mut self, key: &str) -> Result<(), Validation> {
        let Some(node) = self.project.find(key) else {
            return self.reject(Validation::UnknownFile(key.to_string()));
        };
        if !node.is_leaf {
            tracing::debug!("not a file");
            return Ok(());
        }
        let key = node.key.clone();
        match self.files.open(&key) {
            Ok(_) => Ok(()),
            Err(e) => self.reject(e),
        }
    }

    pub fn set_active(&mut self, key: &str) {
        self.files.set_active(key);
    }

    /// Close a file; a file with unsaved changes waits for [`CodeEditor::confirm_close`]
    #[tracing::instrument(skip(self))]
    pub fn close_file(&mut self, key: &str) -> CloseOutcome {
        let outcome = self.files.close_file(key);
        self.report_close(key, outcome);
        outcome
    }

    /// Answer the pending close confirmation. Declining changes nothing.
    #[tracing::instrument(skip(self))]
    pub fn confirm_close(&mut self, confirmed: bool) -> Option<CloseOutcome> {
        let key = self.pending_close.take()?;
        if !confirmed {
            tracing::debug!(%key, "close cancelled");
            return None;
        }
        let outcome = self.files.confirm_close_file(&key);
        self.report_close(&key, outcome);
        Some(outcome)
    }

    fn report_close(&mut self, key: &str, outcome: CloseOutcome) {
        match outcome {
            CloseOutcome::Closed => {
                self.breakpoints.remove_file(key);
                self.notify(Level::Info, format!("closed {key}"));
            }
            CloseOutcome::NeedsConfirmation => {
                self.pending_close = Some(key.to_string());
                self.notify(
                    Level::Warning,
                    format!("{key} has unsaved changes, close anyway?"),
                );
            }
            CloseOutcome::LastFile => {
                self.notify(Level::Warning, "cannot close the last open file");
            }
            CloseOutcome::NotFound => {
                self.notify(Level::Error, Validation::UnknownFile(key.to_string()).to_string());
            }
        }
    }

    pub fn update_content(
        &mut self,
        key: &str,
        content: impl Into<String>,
    ) -> Result<(), Validation> {
        self.files.update_content(key, content)
    }

    /// Mark a file saved. Nothing is written anywhere.
    pub fn save(&mut self, key: &str) -> Result<(), Validation> {
        match self.files.save(key) {
            Ok(()) => {
                self.notify(Level::Success, format!("saved {key}"));
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    pub fn save_active(&mut self) -> Result<(), Validation> {
        let Some(key) = self.files.active_key().map(str::to_string) else {
            return Ok(());
        };
        self.save(&key)
    }

    pub fn change_language(&mut self, key: &str, language: LanguageId) -> Result<(), Validation> {
        match self.files.change_language(key, language) {
            Ok(()) => Ok(()),
            Err(e) => self.reject(e),
        }
    }

    // --- breakpoints and the mock debugger

    /// Toggle a breakpoint on a line of the active file
    pub fn toggle_breakpoint(&mut self, line: usize) -> Result<Toggled, debugger::Error> {
        let Some(key) = self.files.active_key().map(str::to_string) else {
            return self.no_active_file();
        };
        self.breakpoints.toggle(&key, line).inspect_err(|e| {
            self.notify(Level::Error, e.to_string());
        })
    }

    pub fn remove_breakpoint(&mut self, file: &str, line: usize) -> Result<(), debugger::Error> {
        self.breakpoints.remove(file, line).inspect_err(|e| {
            self.notify(Level::Error, e.to_string());
        })
    }

    pub fn set_breakpoint_enabled(
        &mut self,
        file: &str,
        line: usize,
        enabled: bool,
    ) -> Result<(), debugger::Error> {
        self.breakpoints
            .set_enabled(file, line, enabled)
            .inspect_err(|e| {
                self.notify(Level::Error, e.to_string());
            })
    }

    /// Start the mock debug session on the active file and show the debug tab
    pub fn start_debug(&mut self) -> Result<DebugState, debugger::Error> {
        let Some(key) = self.files.active_key().map(str::to_string) else {
            return self.no_active_file();
        };
        match self.debug.start(&key, &self.breakpoints) {
            Ok(state) => {
                self.layout.select_tab(RightTab::Debug);
                self.notify(Level::Info, "mock debug session started");
                Ok(state)
            }
            Err(e) => {
                self.notify(Level::Warning, e.to_string());
                Err(e)
            }
        }
    }

    fn no_active_file<T>(&self) -> Result<T, debugger::Error> {
        let err = debugger::Error::NoActiveFile;
        tracing::warn!(error = %err, "operation rejected");
        self.notify(Level::Warning, err.to_string());
        Err(err)
    }

    pub fn stop_debug(&mut self) -> Result<(), debugger::Error> {
        match self.debug.stop() {
            Ok(()) => {
                self.notify(Level::Info, "mock debug session stopped");
                Ok(())
            }
            Err(e) => {
                self.notify(Level::Warning, e.to_string());
                Err(e)
            }
        }
    }

    // --- runs

    /// First half of a run: flag it, print the header and hand back a copy of the file.
    ///
    /// There is no guard against a run that is already in flight.
    pub fn begin_run(&mut self) -> Option<FileTab> {
        let tab = self.files.active()?.clone();
        tracing::debug!(key = tab.key(), "run started");
        self.is_running = true;
        self.layout.select_tab(RightTab::Output);
        self.output.append(&format!("> Running {}...", tab.key()));
        Some(tab)
    }

    /// Second half of a run: append the result and clear the running flag
    pub fn finish_run(&mut self, file: &FileTab, output: &str) {
        tracing::debug!(key = file.key(), "run finished");
        self.output.append(output);
        self.output.append("");
        self.is_running = false;
        self.notify(Level::Success, format!("{} finished", file.key()));
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    // --- layout and settings

    pub fn select_tab(&mut self, tab: RightTab) {
        self.layout.select_tab(tab);
    }

    pub fn resize_left_panel(&mut self, width: u32) -> u32 {
        self.layout.resize_left(width)
    }

    pub fn resize_right_panel(&mut self, width: u32) -> u32 {
        self.layout.resize_right(width)
    }

    pub fn drag_left_panel(&mut self, delta: i32) -> u32 {
        self.layout.drag_left(delta)
    }

    pub fn drag_right_panel(&mut self, delta: i32) -> u32 {
        self.layout.drag_right(delta)
    }

    pub fn toggle_fullscreen(&mut self, fullscreen: &mut dyn Fullscreen) {
        self.layout.toggle_fullscreen(fullscreen);
    }

    /// Change a setting from the settings tab; surfaces should re-apply options afterwards
    pub fn update_settings(&mut self, f: impl FnOnce(&mut EditorSettings)) {
        f(&mut self.settings);
        tracing::debug!(settings = ?self.settings, "settings changed");
    }

    // --- host boundary

    /// Copy a share link for the active file to the clipboard and return it
    pub fn share(&self, clipboard: &mut dyn Clipboard) -> eyre::Result<String> {
        let tab = self
            .active()
            .ok_or_else(|| eyre::eyre!("no file to share"))?;
        let url = boundary::share_url(&self.share_base, tab);
        clipboard.write_text(&url)?;
        self.notify(Level::Success, "share link copied to clipboard");
        Ok(url)
    }

    /// Hand the active file to the host as a download
    pub fn download(&self, downloader: &mut dyn Downloader) -> eyre::Result<()> {
        let tab = self
            .active()
            .ok_or_else(|| eyre::eyre!("no file to download"))?;
        downloader.save(Download::of(tab))?;
        self.notify(Level::Success, format!("downloaded {}", tab.key()));
        Ok(())
    }
}

/// Shared handle to a [`CodeEditor`] and the simulator that runs its files
///
/// Cloned into every view and event handler.
#[derive(Clone)]
pub struct EditorHandle {
    inner: Arc<Mutex<CodeEditor>>,
    simulator: Simulator,
}

impl EditorHandle {
    pub fn new(editor: CodeEditor, simulator: Simulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(editor)),
            simulator,
        }
    }

    /// Build the editor and a node backed simulator from configuration
    pub fn from_config(config: &Config) -> Self {
        let engine = NodeEngine::new(&config.runner.node_path, config.runner.timeout());
        Self::new(
            CodeEditor::new(config),
            Simulator::new(config.runner.delay(), engine),
        )
    }

    pub fn lock(&self) -> MutexGuard<'_, CodeEditor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the active file and return its output, or `None` when no file is open.
    ///
    /// The editor is not locked while the simulator waits, so views stay responsive and
    /// further runs may start before this one finishes.
    #[tracing::instrument(skip(self))]
    pub async fn run_active(&self) -> Option<String> {
        let tab = self.lock().begin_run()?;
        let output = self.simulator.run(&tab).await;
        self.lock().finish_run(&tab, &output);
        Some(output)
    }
}
