use std::{sync::Arc, time::Duration};

use files::FileTab;
use language::LanguageId;

use crate::{
    engine::{NodeEngine, ScriptEngine},
    strategy,
};

/// Latency added before every run, to feel like a compile step
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Produces the output of a file, choosing a strategy by language
#[derive(Clone)]
pub struct Simulator {
    delay: Duration,
    engine: Arc<dyn ScriptEngine>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, NodeEngine::default())
    }
}

impl Simulator {
    pub fn new(delay: Duration, engine: impl ScriptEngine + 'static) -> Self {
        Self {
            delay,
            engine: Arc::new(engine),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the artificial delay, then simulate the file. Never fails: problems are
    /// reported in the returned text.
    #[tracing::instrument(skip(self, file), fields(key = file.key(), language = %file.language))]
    pub async fn run(&self, file: &FileTab) -> String {
        tokio::time::sleep(self.delay).await;
        self.simulate(file.language, &file.content).await
    }

    /// The output for `content` without the delay
    pub async fn simulate(&self, language: LanguageId, content: &str) -> String {
        match language {
            LanguageId::JavaScript => self.javascript(content).await,
            LanguageId::Python => strategy::python(content),
            LanguageId::Cpp => strategy::cpp(content),
            LanguageId::C => strategy::c(content),
            LanguageId::Html => strategy::HTML_MESSAGE.to_string(),
            LanguageId::TypeScript
            | LanguageId::Css
            | LanguageId::Java
            | LanguageId::Php
            | LanguageId::Plaintext => strategy::generic_fallback(language),
        }
    }

    async fn javascript(&self, content: &str) -> String {
        match self.engine.evaluate(content).await {
            Ok(capture) => {
                let mut lines = capture.lines;
                if let Some(message) = capture.error {
                    tracing::debug!(%message, "script threw");
                    lines.push(format!("Error: {message}"));
                }
                if lines.is_empty() {
                    strategy::JAVASCRIPT_NO_OUTPUT.to_string()
                } else {
                    lines.join("\n")
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "javascript engine failed");
                format!("Error: {e}")
            }
        }
    }
}
