use std::collections::BTreeMap;

use crate::types::{Breakpoint, Error};

/// What a toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Line breakpoints across all open files, at most one per `(file, line)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointSet {
    // value is the enabled flag
    breakpoints: BTreeMap<(String, usize), bool>,
}

impl BreakpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an enabled breakpoint if there is none on this line, otherwise remove it
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, file: &str, line: usize) -> Result<Toggled, Error> {
        if line == 0 {
            return Err(Error::InvalidLine);
        }
        let key = (file.to_string(), line);
        if self.breakpoints.remove(&key).is_some() {
            tracing::debug!("removed breakpoint");
            Ok(Toggled::Removed)
        } else {
            tracing::debug!("added breakpoint");
            self.breakpoints.insert(key, true);
            Ok(Toggled::Added)
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, file: &str, line: usize) -> Result<(), Error> {
        self.breakpoints
            .remove(&(file.to_string(), line))
            .map(|_| ())
            .ok_or_else(|| Error::UnknownBreakpoint {
                file: file.to_string(),
                line,
            })
    }

    pub fn set_enabled(&mut self, file: &str, line: usize, enabled: bool) -> Result<(), Error> {
        let slot = self
            .breakpoints
            .get_mut(&(file.to_string(), line))
            .ok_or_else(|| Error::UnknownBreakpoint {
                file: file.to_string(),
                line,
            })?;
        *slot = enabled;
        Ok(())
    }

    /// Drop every breakpoint belonging to `file`
    pub fn remove_file(&mut self, file: &str) -> usize {
        let before = self.breakpoints.len();
        self.breakpoints.retain(|(f, _), _| f != file);
        before - self.breakpoints.len()
    }

    pub fn contains(&self, file: &str, line: usize) -> bool {
        self.breakpoints.contains_key(&(file.to_string(), line))
    }

    /// Breakpoints ordered by file then line
    pub fn iter(&self) -> impl Iterator<Item = Breakpoint> + '_ {
        self.breakpoints
            .iter()
            .map(|((file, line), enabled)| Breakpoint {
                file: file.clone(),
                line: *line,
                enabled: *enabled,
            })
    }

    pub fn for_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = Breakpoint> + 'a {
        self.iter().filter(move |b| b.file == file)
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}
