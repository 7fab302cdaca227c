use std::fmt;

/// Notifications kept for a front end that has not read them yet; older ones are dropped first
pub const NOTIFICATION_BACKLOG: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user, like a toast in the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.level {
            Level::Info => "info",
            Level::Success => "ok",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(f, "[{prefix}] {}", self.message)
    }
}
