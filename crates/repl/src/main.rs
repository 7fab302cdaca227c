use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread::JoinHandle;

use clap::Parser;
use color_eyre::eyre::{self, Context};
use crossbeam_channel::{Receiver, Sender};
use debugger::Toggled;
use editor::{
    CloseOutcome, Config, EditorHandle, HostAdapter, LanguageId, Level, Notification, RightTab,
    Theme,
};
use tracing_subscriber::filter::EnvFilter;

use crate::commands::{Command, HELP, Side};
use crate::terminal::{AlternateScreen, DirDownloader, PrintClipboard, TerminalSurface};

mod commands;
mod terminal;

struct App {
    handle: EditorHandle,
    adapter: HostAdapter<TerminalSurface>,
    runtime: tokio::runtime::Runtime,
    fullscreen: AlternateScreen,

    /// Lines collected by `edit`, until a line containing only `.`
    editing: Option<Vec<String>>,

    notifications: Receiver<Notification>,
    debug_events: Receiver<debugger::Event>,
    run_tx: Sender<String>,
    run_rx: Receiver<String>,
    input_rx: Receiver<String>,

    #[allow(dead_code)]
    input_thread: JoinHandle<()>,
}

impl App {
    fn new(handle: EditorHandle) -> eyre::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime")?;

        let (notifications, debug_events) = {
            let editor = handle.lock();
            (editor.notifications(), editor.debug_events())
        };

        let mut adapter = HostAdapter::new(TerminalSurface::new());
        adapter.on_mount(&handle.lock());
        adapter.set_focus(true);

        // handle input
        let (input_tx, input_rx) = crossbeam_channel::unbounded();
        let input_thread = std::thread::spawn(move || {
            let mut buffer = String::new();
            loop {
                match std::io::stdin().read_line(&mut buffer) {
                    Ok(0) => {
                        // end of input
                        let _ = input_tx.send("q".to_string());
                        return;
                    }
                    Ok(_) => {
                        let input = buffer.trim_end_matches(['\r', '\n']).to_owned();
                        if input_tx.send(input).is_err() {
                            return;
                        }
                        buffer.clear();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "reading from stdin");
                        return;
                    }
                }
            }
        });

        let (run_tx, run_rx) = crossbeam_channel::unbounded();

        Ok(Self {
            handle,
            adapter,
            runtime,
            fullscreen: AlternateScreen,
            editing: None,
            notifications,
            debug_events,
            run_tx,
            run_rx,
            input_rx,
            input_thread,
        })
    }

    fn loop_step(&mut self) -> eyre::Result<ShouldQuit> {
        if self.editing.is_some() {
            print!(".. ");
        } else {
            print!("> ");
        }
        std::io::stdout().flush()?;

        crossbeam_channel::select! {
            recv(self.input_rx) -> input => match input {
                Ok(input) => self.handle_input(&input).context("handling command"),
                Err(_) => Ok(ShouldQuit::True),
            },
            recv(self.notifications) -> notification => {
                if let Ok(notification) = notification {
                    self.handle_notification(notification);
                }
                Ok(ShouldQuit::False)
            },
            recv(self.debug_events) -> event => {
                if let Ok(event) = event {
                    self.handle_debug_event(event);
                }
                Ok(ShouldQuit::False)
            },
            recv(self.run_rx) -> output => {
                if let Ok(output) = output {
                    println!("\n{output}");
                }
                Ok(ShouldQuit::False)
            },
        }
    }

    fn handle_notification(&self, notification: Notification) {
        match notification.level {
            Level::Error | Level::Warning => eprintln!("\n{notification}"),
            Level::Info | Level::Success => println!("\n{notification}"),
        }
    }

    #[tracing::instrument(skip(self))]
    fn handle_debug_event(&mut self, event: debugger::Event) {
        match event {
            debugger::Event::Started(state) => {
                let line = state
                    .current_line
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "?".to_string());
                println!("\npaused at line {line}");
                for frame in &state.call_stack {
                    println!("  {frame}");
                }
                for (name, value) in &state.local_variables {
                    println!("  {name} = {value}");
                }
            }
            debugger::Event::Stopped => println!("\ndebug session ended"),
        }
    }

    fn handle_input(&mut self, input: &str) -> eyre::Result<ShouldQuit> {
        if let Some(lines) = self.editing.as_mut() {
            if input == "." {
                let content = lines.join("\n");
                self.editing = None;
                let mut editor = self.handle.lock();
                self.adapter.on_change(&mut editor, content);
                self.adapter.refresh(&editor);
            } else {
                lines.push(input.to_string());
            }
            return Ok(ShouldQuit::False);
        }

        let command = match input.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                return Ok(ShouldQuit::False);
            }
        };
        tracing::debug!(?command, "executing command");
        let should_quit = self.execute(command)?;

        let editor = self.handle.lock();
        self.adapter.sync(&editor);
        Ok(should_quit)
    }

    fn execute(&mut self, command: Command) -> eyre::Result<ShouldQuit> {
        match command {
            Command::Empty => {}
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(ShouldQuit::True),
            Command::List => {
                let editor = self.handle.lock();
                let active = editor.active().map(|t| t.key().to_string());
                for tab in editor.files() {
                    let marker = if Some(tab.key()) == active.as_deref() {
                        '*'
                    } else {
                        ' '
                    };
                    println!("{marker} {}  [{}]", tab.title(), tab.language);
                }
            }
            Command::Tree => print_tree(self.handle.lock().project(), 0),
            Command::New { name, language } => {
                let _ = self.handle.lock().create_file(&name, language);
            }
            Command::Open(key) => {
                let _ = self.handle.lock().open_from_tree(&key);
            }
            Command::Use(key) => self.handle.lock().set_active(&key),
            Command::Close(key) => {
                let outcome = self.handle.lock().close_file(&key);
                if outcome == CloseOutcome::NeedsConfirmation {
                    println!("answer 'yes' or 'no'");
                }
            }
            Command::Confirm(confirmed) => {
                if self.handle.lock().confirm_close(confirmed).is_none() && confirmed {
                    println!("nothing to confirm");
                }
            }
            Command::Show => {
                let editor = self.handle.lock();
                let key = editor.active().map(|t| t.key().to_string());
                let breakpoints: Vec<_> = match &key {
                    Some(key) => editor.breakpoints().for_file(key).collect(),
                    None => Vec::new(),
                };
                print!("{}", self.adapter.surface().render(&breakpoints));
            }
            Command::Edit => {
                println!("enter the new contents, finish with a line containing only '.'");
                self.editing = Some(Vec::new());
            }
            Command::Append(text) => {
                let mut editor = self.handle.lock();
                let mut content = self.adapter.surface().value().to_string();
                if !content.is_empty() && !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push_str(&text);
                self.adapter.on_change(&mut editor, content);
                self.adapter.refresh(&editor);
            }
            Command::Save => {
                let _ = self.handle.lock().save_active();
            }
            Command::Language(language) => {
                let mut editor = self.handle.lock();
                if let Some(key) = editor.active().map(|t| t.key().to_string()) {
                    let _ = editor.change_language(&key, language);
                }
            }
            Command::Run => self.spawn_run(),
            Command::Output => print!("{}", self.handle.lock().output().as_str()),
            Command::Clear => self.handle.lock().clear_output(),
            Command::ToggleBreakpoint(line) => {
                if let Ok(toggled) = self.handle.lock().toggle_breakpoint(line) {
                    match toggled {
                        Toggled::Added => println!("breakpoint set on line {line}"),
                        Toggled::Removed => println!("breakpoint removed from line {line}"),
                    }
                }
            }
            Command::Breakpoints => {
                let editor = self.handle.lock();
                if editor.breakpoints().is_empty() {
                    println!("no breakpoints");
                }
                for breakpoint in editor.breakpoints().iter() {
                    println!("{breakpoint}");
                }
            }
            Command::RemoveBreakpoint(bp) => {
                let _ = self.handle.lock().remove_breakpoint(&bp.file, bp.line);
            }
            Command::EnableBreakpoint(bp, enabled) => {
                let _ = self
                    .handle
                    .lock()
                    .set_breakpoint_enabled(&bp.file, bp.line, enabled);
            }
            Command::Debug => {
                let _ = self.handle.lock().start_debug();
            }
            Command::Stop => {
                let mut editor = self.handle.lock();
                if editor.is_debugging() {
                    let _ = editor.stop_debug();
                } else if editor.is_running() {
                    // runs cannot be cancelled
                    println!("the run will finish on its own");
                } else {
                    println!("nothing to stop");
                }
            }
            Command::Tab(tab) => {
                let mut editor = self.handle.lock();
                editor.select_tab(tab);
                match tab {
                    RightTab::Output => print!("{}", editor.output().as_str()),
                    RightTab::Debug => println!("{:#?}", editor.debug_state()),
                    RightTab::Settings => println!("{:#?}", editor.settings()),
                }
            }
            Command::Width { side, px } => {
                let mut editor = self.handle.lock();
                let width = match side {
                    Side::Left => editor.resize_left_panel(px),
                    Side::Right => editor.resize_right_panel(px),
                };
                println!("{side:?} panel is {width}px wide");
            }
            Command::Set { option, value } => self.set_option(&option, &value)?,
            Command::Share => {
                if let Err(e) = self.handle.lock().share(&mut PrintClipboard) {
                    println!("could not share: {e}");
                }
            }
            Command::Download(dir) => {
                let dir = match dir {
                    Some(dir) => dir,
                    None => std::env::current_dir().context("finding current directory")?,
                };
                let mut downloader = DirDownloader { dir };
                if let Err(e) = self.handle.lock().download(&mut downloader) {
                    println!("could not download: {e:#}");
                }
            }
            Command::Fullscreen => self
                .handle
                .lock()
                .toggle_fullscreen(&mut self.fullscreen),
            Command::Status => {
                let editor = self.handle.lock();
                let layout = editor.layout();
                println!(
                    "active: {}  running: {}  debugging: {}  tab: {}  panels: {}px / {}px{}",
                    editor.active().map(|t| t.title()).unwrap_or_default(),
                    editor.is_running(),
                    editor.is_debugging(),
                    layout.active_right_tab(),
                    layout.left_panel_width(),
                    layout.right_panel_width(),
                    if layout.is_fullscreen() {
                        "  (fullscreen)"
                    } else {
                        ""
                    },
                );
            }
        }
        Ok(ShouldQuit::False)
    }

    fn spawn_run(&self) {
        let handle = self.handle.clone();
        let tx = self.run_tx.clone();
        self.runtime.spawn(async move {
            match handle.run_active().await {
                Some(output) => {
                    let _ = tx.send(output);
                }
                None => tracing::debug!("no active file to run"),
            }
        });
    }

    fn set_option(&mut self, option: &str, value: &str) -> eyre::Result<()> {
        if let Err(e) = self.apply_setting(option, value) {
            println!("{e}");
        }
        Ok(())
    }

    fn apply_setting(&mut self, option: &str, value: &str) -> eyre::Result<()> {
        let mut editor = self.handle.lock();
        match option {
            "theme" => {
                let theme = value.parse::<Theme>()?;
                editor.update_settings(|s| s.theme = theme);
            }
            "font_size" => {
                let size = value.parse::<u16>().context("invalid font size")?;
                editor.update_settings(|s| s.font_size = size);
            }
            "word_wrap" => {
                let on = parse_switch(value)?;
                editor.update_settings(|s| s.word_wrap = on);
            }
            "line_numbers" => {
                let on = parse_switch(value)?;
                editor.update_settings(|s| s.line_numbers = on);
            }
            "minimap" => {
                let on = parse_switch(value)?;
                editor.update_settings(|s| s.minimap = on);
            }
            "folding" => {
                let on = parse_switch(value)?;
                editor.update_settings(|s| s.folding = on);
            }
            other => eyre::bail!("unknown setting {other}"),
        }
        self.adapter.apply_settings(editor.settings());
        Ok(())
    }
}

fn parse_switch(value: &str) -> eyre::Result<bool> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => eyre::bail!("expected on or off, got {other}"),
    }
}

fn print_tree(node: &editor::ProjectFile, depth: usize) {
    let suffix = if node.is_leaf { "" } else { "/" };
    println!("{:indent$}{}{suffix}", "", node.title, indent = depth * 2);
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

#[derive(Debug, Parser)]
struct Args {
    /// Files to open; the language follows the extension
    files: Vec<PathBuf>,

    /// Configuration file, defaults to the user configuration directory
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Override the simulated execution delay
    #[clap(long)]
    delay_ms: Option<u64>,

    /// Node executable used to run javascript
    #[clap(long)]
    node: Option<PathBuf>,

    #[clap(long, default_value = "playground.log")]
    log_file: PathBuf,
}

fn load_file(handle: &EditorHandle, path: &PathBuf) -> eyre::Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre::eyre!("invalid file name {}", path.display()))?;

    let mut editor = handle.lock();
    if editor.file(name).is_some() {
        // replaces the starter file of the same name
        editor.set_active(name);
    } else {
        editor
            .create_file(name, LanguageId::from_file_name(name))
            .with_context(|| format!("opening {name}"))?;
    }
    editor
        .update_content(name, contents)
        .with_context(|| format!("loading {name}"))?;
    editor.save(name).context("marking file saved")?;
    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install().context("installing color_eyre")?;
    let args = Args::parse();

    let log_file = std::fs::File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(log_file))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(delay_ms) = args.delay_ms {
        config.runner.delay_ms = delay_ms;
    }
    if let Some(node) = args.node {
        config.runner.node_path = node;
    }
    tracing::debug!(?config, "configuration loaded");

    let handle = EditorHandle::from_config(&config);
    for path in &args.files {
        load_file(&handle, path)?;
    }

    let mut app = App::new(handle)?;
    println!("type 'help' for a list of commands");
    loop {
        match app.loop_step() {
            Ok(ShouldQuit::True) => break,
            Ok(ShouldQuit::False) => {}
            Err(e) => eyre::bail!("Error running command: {e}"),
        }
    }

    Ok(())
}

enum ShouldQuit {
    True,
    False,
}
