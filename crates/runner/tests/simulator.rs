use std::{
    io::IsTerminal,
    sync::{Arc, Mutex},
    time::Duration,
};

use files::FileTab;
use futures::future::BoxFuture;
use language::LanguageId;
use rstest::rstest;
use runner::{
    C_FAMILY_FALLBACK, Capture, HTML_MESSAGE, JAVASCRIPT_NO_OUTPUT, NodeEngine, PYTHON_FALLBACK,
    ScriptEngine, Simulator, generic_fallback,
};
use tracing_subscriber::EnvFilter;

// test suite "constructor"
#[ctor::ctor]
fn init() {
    let in_ci = std::env::var("CI")
        .map(|val| val == "true")
        .unwrap_or(false);

    if std::io::stderr().is_terminal() || in_ci {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .json()
            .try_init();
    }

    // error traces
    let _ = color_eyre::install();
}

/// Engine double that returns a canned result and remembers what it was asked to run
#[derive(Clone, Default)]
struct FakeEngine {
    result: Option<Capture>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl FakeEngine {
    fn returning(lines: &[&str], error: Option<&str>) -> Self {
        Self {
            result: Some(Capture {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                error: error.map(str::to_string),
            }),
            seen: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self::default()
    }
}

impl ScriptEngine for FakeEngine {
    fn evaluate<'a>(&'a self, source: &'a str) -> BoxFuture<'a, eyre::Result<Capture>> {
        self.seen.lock().unwrap().push(source.to_string());
        let result = self
            .result
            .clone()
            .ok_or_else(|| eyre::eyre!("could not start node: not found"));
        Box::pin(async move { result })
    }
}

fn file(key: &str, language: LanguageId, content: &str) -> FileTab {
    let mut tab = FileTab::from_template(key, language);
    tab.content = content.to_string();
    tab
}

fn instant(engine: impl ScriptEngine + 'static) -> Simulator {
    Simulator::new(Duration::ZERO, engine)
}

fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn cpp_cout_literal_is_output() {
    let simulator = instant(FakeEngine::failing());
    let out = simulator
        .run(&file("main.cpp", LanguageId::Cpp, r#"cout << "Hello, World!";"#))
        .await;
    assert_eq!(out, "Hello, World!");
}

#[tokio::test]
async fn python_print_literal_is_output() {
    let simulator = instant(FakeEngine::failing());
    let out = simulator
        .run(&file("script.py", LanguageId::Python, r#"print("test")"#))
        .await;
    assert_eq!(out, "test");
}

#[tokio::test]
async fn javascript_lines_are_joined_in_order() {
    let engine = FakeEngine::returning(&["a", "b"], None);
    let simulator = instant(engine.clone());
    let source = r#"console.log("a"); console.log("b");"#;

    let out = simulator
        .run(&file("app.js", LanguageId::JavaScript, source))
        .await;

    assert_eq!(out, "a\nb");
    assert_eq!(engine.seen.lock().unwrap().as_slice(), [source.to_string()]);
}

#[tokio::test]
async fn javascript_errors_follow_earlier_output() {
    let simulator = instant(FakeEngine::returning(&["before"], Some("boom")));
    let out = simulator.simulate(LanguageId::JavaScript, "").await;
    assert_eq!(out, "before\nError: boom");
}

#[tokio::test]
async fn javascript_without_output() {
    let simulator = instant(FakeEngine::returning(&[], None));
    let out = simulator.simulate(LanguageId::JavaScript, "let x = 1;").await;
    assert_eq!(out, JAVASCRIPT_NO_OUTPUT);
}

#[tokio::test]
async fn engine_failure_becomes_output() {
    let simulator = instant(FakeEngine::failing());
    let out = simulator.simulate(LanguageId::JavaScript, "1").await;
    assert_eq!(out, "Error: could not start node: not found");
}

#[rstest]
#[case(LanguageId::Html, "<p>hi</p>")]
#[case(LanguageId::Html, "")]
#[case(LanguageId::Css, "body { }")]
#[case(LanguageId::Java, r#"System.out.println("x");"#)]
#[case(LanguageId::Php, "<?php echo 'x'; ?>")]
#[case(LanguageId::TypeScript, r#"console.log("ts")"#)]
#[case(LanguageId::Plaintext, "anything")]
#[tokio::test]
async fn fallback_languages_ignore_content(#[case] language: LanguageId, #[case] content: &str) {
    let engine = FakeEngine::returning(&["should not run"], None);
    let simulator = instant(engine.clone());

    let out = simulator.simulate(language, content).await;
    let empty = simulator.simulate(language, "").await;

    assert_eq!(out, empty);
    if language == LanguageId::Html {
        assert_eq!(out, HTML_MESSAGE);
    } else {
        assert_eq!(out, generic_fallback(language));
    }
    assert!(engine.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fallbacks_when_nothing_matches() {
    let simulator = instant(FakeEngine::failing());
    assert_eq!(
        simulator.simulate(LanguageId::Python, "x = 1").await,
        PYTHON_FALLBACK
    );
    assert_eq!(
        simulator.simulate(LanguageId::C, "int x;").await,
        C_FAMILY_FALLBACK
    );
}

#[tokio::test(start_paused = true)]
async fn run_waits_for_the_delay() {
    let simulator = Simulator::new(Duration::from_millis(1000), FakeEngine::failing());
    let tab = file("script.py", LanguageId::Python, r#"print("late")"#);

    let started = tokio::time::Instant::now();
    let out = simulator.run(&tab).await;

    assert_eq!(out, "late");
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test]
async fn node_engine_captures_console() -> eyre::Result<()> {
    if !node_available() {
        eprintln!("node not found on PATH, skipping");
        return Ok(());
    }

    let simulator = instant(NodeEngine::default());
    let out = simulator
        .simulate(
            LanguageId::JavaScript,
            r#"console.log("a"); console.log("b", 1, {x: 2});"#,
        )
        .await;
    assert_eq!(out, "a\nb 1 {\"x\":2}");

    let out = simulator
        .simulate(
            LanguageId::JavaScript,
            r#"console.log("first"); throw new Error("bad thing");"#,
        )
        .await;
    assert_eq!(out, "first\nError: bad thing");

    let out = simulator.simulate(LanguageId::JavaScript, "let = ;").await;
    assert!(out.starts_with("Error: "), "{out}");
    Ok(())
}

#[tokio::test]
async fn node_engine_enforces_the_time_limit() {
    if !node_available() {
        eprintln!("node not found on PATH, skipping");
        return;
    }

    let simulator = instant(NodeEngine::new("node", Duration::from_millis(300)));
    let out = simulator
        .simulate(LanguageId::JavaScript, "while (true) {}")
        .await;
    assert_eq!(out, "Error: script timed out after 300 ms");
}

#[tokio::test]
async fn missing_node_binary_is_reported() {
    let simulator = instant(NodeEngine::new(
        "/nonexistent/playground-node",
        Duration::from_secs(1),
    ));
    let out = simulator.simulate(LanguageId::JavaScript, "1").await;
    assert!(
        out.starts_with("Error: could not start /nonexistent/playground-node"),
        "{out}"
    );
}
