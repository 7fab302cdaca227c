//! Binding between the active file and a text editing widget

use config::{EditorSettings, Theme};
use language::LanguageId;

use crate::code_editor::CodeEditor;

/// Options passed to the editing widget when it mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub font_size: u16,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub minimap: bool,
    pub folding: bool,
}

impl From<&EditorSettings> for EditorOptions {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            font_size: settings.font_size,
            word_wrap: settings.word_wrap,
            line_numbers: settings.line_numbers,
            minimap: settings.minimap,
            folding: settings.folding,
        }
    }
}

/// A text editing widget
///
/// The widget reports edits by calling [`HostAdapter::on_change`] with its full text.
pub trait EditorSurface {
    /// Replace the displayed text and its highlighting language
    fn set_model(&mut self, value: &str, language: LanguageId);

    fn apply_options(&mut self, theme: Theme, options: EditorOptions);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Other,
}

/// A key press with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    /// Ctrl on most platforms, Cmd on macOS
    pub fn command(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }
}

/// Editor level commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Save,
    Run,
}

impl Shortcut {
    pub fn from_key_chord(chord: KeyChord) -> Option<Shortcut> {
        if !(chord.ctrl || chord.meta) {
            return None;
        }
        match chord.key {
            Key::Char('s') | Key::Char('S') => Some(Shortcut::Save),
            Key::Enter => Some(Shortcut::Run),
            _ => None,
        }
    }
}

/// Keeps an [`EditorSurface`] showing the active file and feeds edits back into the store
pub struct HostAdapter<S> {
    surface: S,
    bound: Option<(String, LanguageId)>,
    focused: bool,
}

impl<S: EditorSurface> HostAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            bound: None,
            focused: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Key of the file currently shown
    pub fn bound_key(&self) -> Option<&str> {
        self.bound.as_ref().map(|(k, _)| k.as_str())
    }

    /// Apply theme and options, then show the active file
    #[tracing::instrument(skip_all)]
    pub fn on_mount(&mut self, editor: &CodeEditor) {
        self.apply_settings(editor.settings());
        self.bound = None;
        self.sync(editor);
    }

    pub fn apply_settings(&mut self, settings: &EditorSettings) {
        self.surface
            .apply_options(settings.theme, EditorOptions::from(settings));
    }

    /// Push the active file to the surface if a different file or language is now active
    pub fn sync(&mut self, editor: &CodeEditor) {
        let active = editor
            .active()
            .map(|tab| (tab.key().to_string(), tab.language));
        if active == self.bound {
            return;
        }
        if let Some(tab) = editor.active() {
            tracing::debug!(key = tab.key(), "binding file to surface");
            self.surface.set_model(&tab.content, tab.language);
        }
        self.bound = active;
    }

    /// Push the active file to the surface unconditionally
    pub fn refresh(&mut self, editor: &CodeEditor) {
        self.bound = None;
        self.sync(editor);
    }

    /// Called by the surface with its full text after every edit
    pub fn on_change(&mut self, editor: &mut CodeEditor, value: impl Into<String>) {
        let Some((key, _)) = &self.bound else {
            tracing::warn!("edit with no file bound");
            return;
        };
        if let Err(e) = editor.update_content(key, value) {
            tracing::warn!(error = %e, "could not apply edit");
        }
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Translate a key press into a shortcut; only while the surface has focus
    pub fn on_key(&self, chord: KeyChord) -> Option<Shortcut> {
        if !self.focused {
            return None;
        }
        Shortcut::from_key_chord(chord)
    }
}
