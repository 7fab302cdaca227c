use language::LanguageId;
use serde::{Deserialize, Serialize};

/// Reasons a file operation is refused
///
/// A refused operation leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Validation {
    #[error("file name cannot be empty")]
    EmptyName,
    #[error("a file named {0} is already open")]
    DuplicateName(String),
    #[error("no open file named {0}")]
    UnknownFile(String),
}

/// One open virtual file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTab {
    key: String,
    pub language: LanguageId,
    pub content: String,
    pub modified: bool,
}

impl FileTab {
    /// A new unmodified file seeded with the language's starter template
    pub fn from_template(key: impl Into<String>, language: LanguageId) -> Self {
        Self {
            key: key.into(),
            language,
            content: language.template().to_string(),
            modified: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name; the same as the key
    pub fn title(&self) -> &str {
        &self.key
    }
}

/// Result of asking to close a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The file has unsaved changes, nothing was closed. Close again with
    /// [`FileStore::confirm_close_file`] to discard them.
    NeedsConfirmation,
    /// The only open file cannot be closed
    LastFile,
    NotFound,
}

/// Ordered collection of open files with a single active file
#[derive(Debug, Clone)]
pub struct FileStore {
    tabs: Vec<FileTab>,
    active: Option<String>,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::with_tabs(vec![FileTab::from_template("main.js", LanguageId::JavaScript)])
    }
}

impl FileStore {
    /// Build a store from existing tabs; the first becomes active.
    ///
    /// Tabs with a key that is already present are dropped.
    pub fn with_tabs(tabs: impl IntoIterator<Item = FileTab>) -> Self {
        let mut unique: Vec<FileTab> = Vec::new();
        for tab in tabs {
            if unique.iter().any(|t| t.key == tab.key) {
                tracing::warn!(key = %tab.key, "dropping duplicate file");
                continue;
            }
            unique.push(tab);
        }
        let active = unique.first().map(|t| t.key.clone());
        Self {
            tabs: unique,
            active,
        }
    }

    pub fn tabs(&self) -> &[FileTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FileTab> {
        self.tabs.iter().find(|t| t.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Result<&mut FileTab, Validation> {
        self.tabs
            .iter_mut()
            .find(|t| t.key == key)
            .ok_or_else(|| Validation::UnknownFile(key.to_string()))
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&FileTab> {
        self.active.as_deref().and_then(|key| self.get(key))
    }

    /// Create a new file from the language template and make it active
    #[tracing::instrument(skip(self))]
    pub fn create_file(&mut self, name: &str, language: LanguageId) -> Result<&FileTab, Validation> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Validation::EmptyName);
        }
        if self.get(name).is_some() {
            return Err(Validation::DuplicateName(name.to_string()));
        }

        tracing::debug!("creating file");
        self.tabs.push(FileTab::from_template(name, language));
        self.active = Some(name.to_string());
        Ok(&self.tabs[self.tabs.len() - 1])
    }

    /// Open a tab for `key`, or just activate it when it is already open.
    ///
    /// New tabs take their language from the file extension. Returns true if a tab was created.
    #[tracing::instrument(skip(self))]
    pub fn open(&mut self, key: &str) -> Result<bool, Validation> {
        if self.get(key).is_some() {
            self.set_active(key);
            return Ok(false);
        }
        let language = LanguageId::from_file_name(key);
        self.create_file(key, language)?;
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    pub fn close_file(&mut self, key: &str) -> CloseOutcome {
        match self.get(key) {
            None => CloseOutcome::NotFound,
            Some(_) if self.tabs.len() == 1 => CloseOutcome::LastFile,
            Some(tab) if tab.modified => {
                tracing::debug!("close deferred, file has unsaved changes");
                CloseOutcome::NeedsConfirmation
            }
            Some(_) => self.remove(key),
        }
    }

    /// Close a file even if it has unsaved changes
    #[tracing::instrument(skip(self))]
    pub fn confirm_close_file(&mut self, key: &str) -> CloseOutcome {
        match self.get(key) {
            None => CloseOutcome::NotFound,
            Some(_) if self.tabs.len() == 1 => CloseOutcome::LastFile,
            Some(_) => self.remove(key),
        }
    }

    fn remove(&mut self, key: &str) -> CloseOutcome {
        self.tabs.retain(|t| t.key != key);
        if self.active.as_deref() == Some(key) {
            self.active = self.tabs.first().map(|t| t.key.clone());
        }
        tracing::debug!(active = ?self.active, "file closed");
        CloseOutcome::Closed
    }

    /// Make `key` the active file; unknown keys are ignored
    pub fn set_active(&mut self, key: &str) {
        if self.get(key).is_some() {
            self.active = Some(key.to_string());
        }
    }

    /// Replace the content of a file. Always marks it modified, even when the text is unchanged.
    pub fn update_content(&mut self, key: &str, content: impl Into<String>) -> Result<(), Validation> {
        let tab = self.get_mut(key)?;
        tab.content = content.into();
        tab.modified = true;
        Ok(())
    }

    /// Acknowledge a save; there is no backing storage
    #[tracing::instrument(skip(self))]
    pub fn save(&mut self, key: &str) -> Result<(), Validation> {
        self.get_mut(key)?.modified = false;
        tracing::debug!("file saved");
        Ok(())
    }

    /// Relabel a file with another language without touching its content
    #[tracing::instrument(skip(self))]
    pub fn change_language(&mut self, key: &str, language: LanguageId) -> Result<(), Validation> {
        let tab = self.get_mut(key)?;
        tab.language = language;
        tab.modified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use language::LanguageId;
    use rstest::rstest;

    use super::{CloseOutcome, FileStore, FileTab, Validation};

    fn store_with(keys: &[(&str, LanguageId)]) -> FileStore {
        FileStore::with_tabs(keys.iter().map(|(k, l)| FileTab::from_template(*k, *l)))
    }

    #[test]
    fn default_store_has_one_active_javascript_file() {
        let store = FileStore::default();
        assert_eq!(store.len(), 1);
        let active = store.active().unwrap();
        assert_eq!(active.key(), "main.js");
        assert_eq!(active.language, LanguageId::JavaScript);
        assert!(!active.modified);
    }

    #[test]
    fn create_file_seeds_template_and_activates() {
        let mut store = FileStore::default();
        store.create_file("main.cpp", LanguageId::Cpp).unwrap();

        let active = store.active().unwrap();
        assert_eq!(active.key(), "main.cpp");
        assert_eq!(active.title(), "main.cpp");
        assert_eq!(active.content, LanguageId::Cpp.template());
        assert_eq!(store.tabs().last().unwrap().key(), "main.cpp");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn create_file_rejects_blank_names(#[case] name: &str) {
        let mut store = FileStore::default();
        let before = store.tabs().to_vec();

        assert_eq!(
            store.create_file(name, LanguageId::Python).unwrap_err(),
            Validation::EmptyName
        );
        assert_eq!(store.tabs(), before.as_slice());
        assert_eq!(store.active_key(), Some("main.js"));
    }

    #[test]
    fn create_file_rejects_duplicates() {
        let mut store = FileStore::default();
        store.create_file("a.py", LanguageId::Python).unwrap();
        store.set_active("main.js");

        let err = store.create_file(" a.py ", LanguageId::Cpp).unwrap_err();
        assert_eq!(err, Validation::DuplicateName("a.py".to_string()));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a.py").unwrap().language, LanguageId::Python);
        assert_eq!(store.active_key(), Some("main.js"));
    }

    #[test]
    fn keys_stay_unique_over_many_creates() {
        let mut store = FileStore::default();
        let names = ["a.js", "b.js", "a.js", "c.py", "b.js", "main.js", "c.py"];
        for name in names {
            let _ = store.create_file(name, LanguageId::JavaScript);
        }
        let mut keys: Vec<_> = store.tabs().iter().map(|t| t.key().to_string()).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 4);
    }

    #[test]
    fn closing_the_last_file_is_refused() {
        let mut store = FileStore::default();
        assert_eq!(store.close_file("main.js"), CloseOutcome::LastFile);
        assert_eq!(store.confirm_close_file("main.js"), CloseOutcome::LastFile);
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_key(), Some("main.js"));
    }

    #[test]
    fn closing_a_modified_file_needs_confirmation() {
        let mut store = store_with(&[("a.js", LanguageId::JavaScript), ("b.py", LanguageId::Python)]);
        store.set_active("b.py");
        store.update_content("a.js", "console.log(1)").unwrap();

        assert_eq!(store.close_file("a.js"), CloseOutcome::NeedsConfirmation);
        assert_eq!(store.len(), 2);

        assert_eq!(store.confirm_close_file("a.js"), CloseOutcome::Closed);
        assert!(store.get("a.js").is_none());
        assert_eq!(store.active_key(), Some("b.py"));
    }

    #[test]
    fn closing_the_active_file_activates_the_first_remaining() {
        let mut store = store_with(&[
            ("a.js", LanguageId::JavaScript),
            ("b.js", LanguageId::JavaScript),
            ("c.js", LanguageId::JavaScript),
        ]);
        store.set_active("b.js");
        assert_eq!(store.close_file("b.js"), CloseOutcome::Closed);
        assert_eq!(store.active_key(), Some("a.js"));

        assert_eq!(store.close_file("a.js"), CloseOutcome::Closed);
        assert_eq!(store.active_key(), Some("c.js"));
    }

    #[test]
    fn closing_an_unknown_file_is_reported() {
        let mut store = FileStore::default();
        assert_eq!(store.close_file("nope.js"), CloseOutcome::NotFound);
    }

    #[test]
    fn set_active_ignores_unknown_keys() {
        let mut store = FileStore::default();
        store.set_active("missing.py");
        assert_eq!(store.active_key(), Some("main.js"));
    }

    #[test]
    fn update_marks_modified_even_when_unchanged() {
        let mut store = FileStore::default();
        let same = store.active().unwrap().content.clone();
        store.update_content("main.js", same).unwrap();
        assert!(store.get("main.js").unwrap().modified);

        store.save("main.js").unwrap();
        assert!(!store.get("main.js").unwrap().modified);

        store.update_content("main.js", "x").unwrap();
        assert!(store.get("main.js").unwrap().modified);
    }

    #[test]
    fn change_language_keeps_content() {
        let mut store = FileStore::default();
        let before = store.get("main.js").unwrap().content.clone();
        store.change_language("main.js", LanguageId::TypeScript).unwrap();

        let tab = store.get("main.js").unwrap();
        assert_eq!(tab.language, LanguageId::TypeScript);
        assert_eq!(tab.content, before);
        assert!(tab.modified);
    }

    #[test]
    fn operations_on_unknown_files_fail() {
        let mut store = FileStore::default();
        let unknown = Validation::UnknownFile("x".to_string());
        assert_eq!(store.update_content("x", "").unwrap_err(), unknown);
        assert_eq!(store.save("x").unwrap_err(), unknown);
        assert_eq!(store.change_language("x", LanguageId::C).unwrap_err(), unknown);
    }

    #[test]
    fn open_activates_existing_or_synthesises() {
        let mut store = FileStore::default();
        assert!(store.open("utils.py").unwrap());
        let tab = store.active().unwrap();
        assert_eq!(tab.language, LanguageId::Python);
        assert_eq!(tab.content, LanguageId::Python.template());

        store.update_content("utils.py", "print('kept')").unwrap();
        store.set_active("main.js");
        assert!(!store.open("utils.py").unwrap());
        assert_eq!(store.active().unwrap().content, "print('kept')");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn with_tabs_drops_duplicates() {
        let store = store_with(&[("a.js", LanguageId::JavaScript), ("a.js", LanguageId::Python)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.js").unwrap().language, LanguageId::JavaScript);
    }
}
