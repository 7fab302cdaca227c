use std::{path::PathBuf, str::FromStr};

use debugger::Breakpoint;
use editor::{LanguageId, RightTab};
use eyre::WrapErr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// One line of user input
#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Empty,
    Help,
    Quit,
    List,
    Tree,
    New { name: String, language: LanguageId },
    Open(String),
    Use(String),
    Close(String),
    Confirm(bool),
    Show,
    Edit,
    Append(String),
    Save,
    Language(LanguageId),
    Run,
    Output,
    Clear,
    ToggleBreakpoint(usize),
    Breakpoints,
    RemoveBreakpoint(Breakpoint),
    EnableBreakpoint(Breakpoint, bool),
    Debug,
    Stop,
    Tab(RightTab),
    Width { side: Side, px: u32 },
    Set { option: String, value: String },
    Share,
    Download(Option<PathBuf>),
    Fullscreen,
    Status,
}

pub(crate) const HELP: &str = "\
files:      ls | tree | new <name> [language] | open <tree entry> | use <file> | close <file>
            yes | no (answer a close confirmation)
editing:    show | edit (end with a line containing only '.') | append <text> | save | lang <language>
running:    run | output | clear | stop
debugging:  bp <line> | bps | bp-rm <file>:<line> | bp-enable <file>:<line> | bp-disable <file>:<line>
            debug | stop
layout:     tab <output|debug|settings> | width <left|right> <px> | fullscreen
settings:   set <theme|font_size|word_wrap|line_numbers|minimap|folding> <value>
host:       share | download [dir] | status | help | q";

fn required<'a>(arg: Option<&'a str>, what: &str) -> eyre::Result<&'a str> {
    arg.filter(|s| !s.is_empty())
        .ok_or_else(|| eyre::eyre!("missing {what}"))
}

impl FromStr for Command {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = s.split_once(' ').unwrap_or((s, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match name {
            "" => Command::Empty,
            "help" | "?" => Command::Help,
            "q" | "quit" => Command::Quit,
            "ls" => Command::List,
            "tree" => Command::Tree,
            "new" => {
                let name = required(args.next(), "file name")?.to_string();
                let language = match args.next() {
                    Some(l) => l.parse::<LanguageId>()?,
                    None => LanguageId::from_file_name(&name),
                };
                Command::New { name, language }
            }
            "open" => Command::Open(required(args.next(), "tree entry")?.to_string()),
            "use" => Command::Use(required(args.next(), "file name")?.to_string()),
            "close" => Command::Close(required(args.next(), "file name")?.to_string()),
            "yes" | "y" => Command::Confirm(true),
            "no" | "n" => Command::Confirm(false),
            "show" => Command::Show,
            "edit" => Command::Edit,
            "append" => Command::Append(rest.to_string()),
            "save" => Command::Save,
            "lang" => Command::Language(required(args.next(), "language")?.parse()?),
            "run" => Command::Run,
            "output" => Command::Output,
            "clear" => Command::Clear,
            "bp" => {
                let line = required(args.next(), "line number")?
                    .parse::<usize>()
                    .wrap_err("invalid line number")?;
                Command::ToggleBreakpoint(line)
            }
            "bps" => Command::Breakpoints,
            "bp-rm" => Command::RemoveBreakpoint(required(args.next(), "breakpoint")?.parse()?),
            "bp-enable" => {
                Command::EnableBreakpoint(required(args.next(), "breakpoint")?.parse()?, true)
            }
            "bp-disable" => {
                Command::EnableBreakpoint(required(args.next(), "breakpoint")?.parse()?, false)
            }
            "debug" => Command::Debug,
            "stop" => Command::Stop,
            "tab" => Command::Tab(required(args.next(), "tab")?.parse()?),
            "width" => {
                let side = match required(args.next(), "side")? {
                    "left" => Side::Left,
                    "right" => Side::Right,
                    other => eyre::bail!("invalid side {other}"),
                };
                let px = required(args.next(), "width")?
                    .parse::<u32>()
                    .wrap_err("invalid width")?;
                Command::Width { side, px }
            }
            "set" => {
                let option = required(args.next(), "option")?.to_string();
                let value = required(args.next(), "value")?.to_string();
                Command::Set { option, value }
            }
            "share" => Command::Share,
            "download" => Command::Download(args.next().map(PathBuf::from)),
            "fullscreen" => Command::Fullscreen,
            "status" => Command::Status,
            other => eyre::bail!("unknown command '{other}', try 'help'"),
        };
        Ok(command)
    }
}
