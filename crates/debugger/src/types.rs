use eyre::Context;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors from breakpoint and session operations; none of them change any state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("line numbers start at 1")]
    InvalidLine,
    #[error("no breakpoint at {file}:{line}")]
    UnknownBreakpoint { file: String, line: usize },
    #[error("a debug session is already running")]
    AlreadyDebugging,
    #[error("no debug session is running")]
    NotDebugging,
    #[error("no file is open")]
    NoActiveFile,
}

// Serialize/Deserialize are required for the breakpoints panel export
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    pub file: String,
    pub line: usize,
    pub enabled: bool,
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if !self.enabled {
            f.write_str(" (disabled)")?;
        }
        Ok(())
    }
}

impl FromStr for Breakpoint {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (file, lineno_str) = s
            .rsplit_once(':')
            .ok_or_else(|| eyre::eyre!("breakpoint specification '{s}' has no colon"))?;

        let line: usize = lineno_str.parse().wrap_err("invalid line number")?;
        eyre::ensure!(!file.is_empty(), "breakpoint specification '{s}' has no file");
        eyre::ensure!(line > 0, "line numbers start at 1");

        Ok(Self {
            file: file.to_string(),
            line,
            enabled: true,
        })
    }
}
