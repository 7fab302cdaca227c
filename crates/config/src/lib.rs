//! User configuration for the editor, read from a TOML file
//!
//! ```toml
//! [editor]
//! theme = "light"
//! font_size = 16
//!
//! [runner]
//! delay_ms = 250
//! node_path = "/usr/local/bin/node"
//! ```
//!
//! Every key is optional. Nothing is ever written back.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use eyre::WrapErr;
use serde::{Deserialize, Serialize};

/// Colour theme of the editing surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "light")]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "vs-dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vs-dark" | "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(eyre::eyre!("invalid theme {other}")),
        }
    }
}

/// Settings shown in the settings tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub theme: Theme,
    pub font_size: u16,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub minimap: bool,
    pub folding: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_size: 14,
            word_wrap: false,
            line_numbers: true,
            minimap: true,
            folding: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Artificial latency before each run
    pub delay_ms: u64,
    /// Interpreter used for javascript
    pub node_path: PathBuf,
    /// Wall clock limit for a javascript run
    pub timeout_ms: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            node_path: PathBuf::from("node"),
            timeout_ms: 5000,
        }
    }
}

impl RunnerSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    /// Page the share links point at
    pub base_url: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            base_url: "https://playground.example.com/editor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub runner: RunnerSettings,
    pub share: ShareSettings,
}

/// Where the configuration lives when no path is given
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playground").join("config.toml"))
}

impl Config {
    pub fn from_toml(contents: &str) -> eyre::Result<Self> {
        let config = toml::from_str(contents).wrap_err("parsing configuration")?;
        Ok(config)
    }

    /// Read configuration from `path`; a missing file gives the defaults
    pub fn load_from(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let span = tracing::debug_span!("Config", path = %path.display());
        let _guard = span.enter();

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!("configuration loaded");
                Self::from_toml(&contents)
                    .with_context(|| format!("reading configuration {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("opening configuration {}", path.display())),
        }
    }

    /// Read configuration from the default location, if there is one
    pub fn load() -> eyre::Result<Self> {
        match default_path() {
            Some(path) => Self::load_from(path),
            None => {
                tracing::warn!("cannot determine configuration directory, using defaults");
                Ok(Self::default())
            }
        }
    }
}
