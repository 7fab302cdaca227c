use std::{path::PathBuf, process::Stdio, time::Duration};

use eyre::WrapErr;
use futures::future::BoxFuture;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

/// Console output captured from a script, and the message of the error that stopped it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Capture {
    pub lines: Vec<String>,
    pub error: Option<String>,
}

/// Something that can really execute javascript source
///
/// `Err` means the engine itself failed (could not start, timed out); errors thrown by the
/// script are reported in [`Capture::error`].
pub trait ScriptEngine: Send + Sync {
    fn evaluate<'a>(&'a self, source: &'a str) -> BoxFuture<'a, eyre::Result<Capture>>;
}

const RESULT_MARKER: &str = "\u{1e}__playground_result__";

// The user source is spliced in as a JSON string literal and compiled with `new Function`,
// so syntax errors are caught like any other thrown error.
const PRELUDE: &str = r#"
const __lines = [];
const __format = (value) => {
  if (typeof value === "string") return value;
  try {
    const json = JSON.stringify(value);
    return json === undefined ? String(value) : json;
  } catch (_) {
    return String(value);
  }
};
for (const level of ["log", "info", "warn", "error", "debug"]) {
  console[level] = (...args) => { __lines.push(args.map(__format).join(" ")); };
}
let __error = null;
try {
  new Function(__SOURCE__)();
} catch (e) {
  __error = e !== null && typeof e === "object" && "message" in e ? String(e.message) : String(e);
}
process.stdout.write(__MARKER__ + JSON.stringify({ lines: __lines, error: __error }));
"#;

/// Runs javascript in a child `node` process with a wall clock limit
///
/// The child runs with the privileges of the current user; it is isolated from this process
/// but not sandboxed.
#[derive(Debug, Clone)]
pub struct NodeEngine {
    node: PathBuf,
    timeout: Duration,
}

impl Default for NodeEngine {
    fn default() -> Self {
        Self::new("node", Duration::from_secs(5))
    }
}

impl NodeEngine {
    pub fn new(node: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            node: node.into(),
            timeout,
        }
    }

    fn script(source: &str) -> eyre::Result<String> {
        let source = serde_json::to_string(source).wrap_err("encoding source")?;
        let marker = serde_json::to_string(RESULT_MARKER).wrap_err("encoding marker")?;
        // marker first, the user source may contain either placeholder
        Ok(PRELUDE
            .replace("__MARKER__", &marker)
            .replace("__SOURCE__", &source))
    }

    #[tracing::instrument(skip(self, source), fields(node = %self.node.display()))]
    async fn run(&self, source: &str) -> eyre::Result<Capture> {
        let script = Self::script(source)?;

        tracing::debug!("starting node process");
        let mut child = tokio::process::Command::new(&self.node)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| eyre::eyre!("could not start {}: {e}", self.node.display()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| eyre::eyre!("node stdin unavailable"))?;
        stdin
            .write_all(script.as_bytes())
            .await
            .wrap_err("writing script to node")?;
        drop(stdin);

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.wrap_err("waiting for node")?,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "script timed out");
                eyre::bail!("script timed out after {} ms", self.timeout.as_millis());
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.rsplit_once(RESULT_MARKER) {
            Some((_, json)) => {
                let capture = serde_json::from_str(json).wrap_err("decoding script result")?;
                tracing::debug!("script finished");
                Ok(capture)
            }
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let reason = stderr
                    .lines()
                    .rev()
                    .find(|l| !l.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("node exited with {}", output.status));
                eyre::bail!(reason)
            }
        }
    }
}

impl ScriptEngine for NodeEngine {
    fn evaluate<'a>(&'a self, source: &'a str) -> BoxFuture<'a, eyre::Result<Capture>> {
        Box::pin(self.run(source))
    }
}

#[cfg(test)]
mod tests {
    use super::NodeEngine;

    #[test]
    fn script_embeds_source_as_a_string_literal() {
        let script = NodeEngine::script("console.log(\"a\");\n// `tick`").unwrap();
        assert!(script.contains(r#"new Function("console.log(\"a\");\n// `tick`")()"#));
        assert!(!script.contains("__SOURCE__"));
        assert!(!script.contains("__MARKER__"));
    }

    #[test]
    fn placeholders_in_user_source_survive() {
        let script = NodeEngine::script("const s = '__MARKER__';").unwrap();
        assert!(script.contains("'__MARKER__'"));
    }
}
