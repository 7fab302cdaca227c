//! The terminal's implementations of the editor's host interfaces

use std::{io::Write, path::PathBuf};

use editor::{
    Breakpoint, Clipboard, Download, Downloader, EditorOptions, EditorSurface, Fullscreen,
    LanguageId, Theme,
};
use eyre::WrapErr;

/// Editing surface that keeps the text and prints it on demand
pub(crate) struct TerminalSurface {
    value: String,
    language: LanguageId,
    theme: Theme,
    options: Option<EditorOptions>,
}

impl TerminalSurface {
    pub(crate) fn new() -> Self {
        Self {
            value: String::new(),
            language: LanguageId::Plaintext,
            theme: Theme::Dark,
            options: None,
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Render the text, marking lines that carry a breakpoint
    pub(crate) fn render(&self, breakpoints: &[Breakpoint]) -> String {
        let options = self.options.unwrap_or(EditorOptions {
            font_size: 14,
            word_wrap: false,
            line_numbers: true,
            minimap: false,
            folding: false,
        });
        let mut out = format!("--- {} ({})\n", self.language.display_name(), self.theme);
        for (i, line) in self.value.lines().enumerate() {
            let lineno = i + 1;
            let marker = match breakpoints.iter().find(|b| b.line == lineno) {
                Some(b) if b.enabled => '●',
                Some(_) => '○',
                None => ' ',
            };
            if options.line_numbers {
                out.push_str(&format!("{marker}{lineno:>4} | {line}\n"));
            } else {
                out.push_str(&format!("{marker} {line}\n"));
            }
        }
        out
    }
}

impl EditorSurface for TerminalSurface {
    fn set_model(&mut self, value: &str, language: LanguageId) {
        self.value = value.to_string();
        self.language = language;
    }

    fn apply_options(&mut self, theme: Theme, options: EditorOptions) {
        tracing::debug!(%theme, ?options, "applying editor options");
        self.theme = theme;
        self.options = Some(options);
    }
}

/// There is no system clipboard here; the link is printed for the user to copy
pub(crate) struct PrintClipboard;

impl Clipboard for PrintClipboard {
    fn write_text(&mut self, text: &str) -> eyre::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").wrap_err("writing share link")?;
        Ok(())
    }
}

/// Saves downloads into a directory
pub(crate) struct DirDownloader {
    pub(crate) dir: PathBuf,
}

impl Downloader for DirDownloader {
    fn save(&mut self, download: Download) -> eyre::Result<()> {
        let path = self.dir.join(&download.file_name);
        tracing::debug!(path = %path.display(), mime = download.mime, "saving download");
        std::fs::write(&path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("saved {}", path.display());
        Ok(())
    }
}

/// Uses the terminal's alternate screen as "fullscreen"
pub(crate) struct AlternateScreen;

impl Fullscreen for AlternateScreen {
    fn request(&mut self) {
        print!("\x1b[?1049h\x1b[H");
        let _ = std::io::stdout().flush();
    }

    fn exit(&mut self) {
        print!("\x1b[?1049l");
        let _ = std::io::stdout().flush();
    }
}
