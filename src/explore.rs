//! Line-oriented interactive session driven from stdin.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Result, anyhow, bail};
use log::debug;

use crate::{
    insight::InsightView,
    session::Session,
    source::{RawSource, SourceKind},
    visualize::Visualizer,
};

pub const HELP: &str = "\
Commands:
  upload PATH [csv|excel]   load a file (kind defaults to the extension)
  sheet NAME                read NAME from the uploaded workbook
  header N                  use row N (0-100) of the sheet as the header
  view types|summary|distribution
  field [NAME]              text field for the value distribution
  clear                     discard the uploaded file
  show                      render the current state again
  help                      print this message
  quit                      leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload {
        path: PathBuf,
        kind: Option<SourceKind>,
    },
    Sheet(String),
    Header(usize),
    View(InsightView),
    Field(Option<String>),
    Clear,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        let command = match word.to_ascii_lowercase().as_str() {
            "upload" => {
                if rest.is_empty() {
                    bail!("upload needs a file path");
                }
                let (path, kind) = match rest.rsplit_once(char::is_whitespace) {
                    Some((path, kind)) => match parse_kind(kind) {
                        Some(kind) => (path.trim(), Some(kind)),
                        None => (rest, None),
                    },
                    None => (rest, None),
                };
                Command::Upload {
                    path: PathBuf::from(path),
                    kind,
                }
            }
            "sheet" if !rest.is_empty() => Command::Sheet(rest.to_string()),
            "sheet" => bail!("sheet needs a sheet name"),
            "header" => Command::Header(
                rest.parse()
                    .map_err(|_| anyhow!("header needs a row number, got '{rest}'"))?,
            ),
            "view" => Command::View(rest.parse().map_err(|err: String| anyhow!(err))?),
            "field" => Command::Field((!rest.is_empty()).then(|| rest.to_string())),
            "clear" => Command::Clear,
            "show" | "" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("Unknown command '{other}' (type 'help')"),
        };
        Ok(command)
    }
}

fn parse_kind(value: &str) -> Option<SourceKind> {
    match value.to_ascii_lowercase().as_str() {
        "csv" => Some(SourceKind::Csv),
        "excel" => Some(SourceKind::Excel),
        _ => None,
    }
}

/// Applies one command to the session. Returns `false` when the session
/// should end.
pub fn apply(session: &mut Session, command: Command, output: &mut dyn Write) -> Result<bool> {
    debug!("Applying {command:?}");
    match command {
        Command::Upload { path, kind } => {
            let name = path.to_string_lossy();
            let kind = kind
                .or_else(|| SourceKind::detect(&name))
                .unwrap_or(SourceKind::Csv);
            match RawSource::from_path(&path, kind) {
                Ok(source) => session.upload(source),
                Err(err) => writeln!(output, "error: {}", err.reason())?,
            }
        }
        Command::Sheet(name) => session.select_sheet(name),
        Command::Header(row) => session.select_header_row(row),
        Command::View(view) => session.select_view(view),
        Command::Field(field) => session.select_field(field),
        Command::Clear => session.request_clear(),
        Command::Show => {}
        Command::Help => {
            writeln!(output, "{HELP}")?;
            return Ok(true);
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands until `quit` or end of input, rendering after each one.
pub fn run<R: BufRead>(
    session: &mut Session,
    input: R,
    output: &mut dyn Write,
    visualizer: &mut dyn Visualizer,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                continue;
            }
        };
        let rerender = !matches!(command, Command::Help | Command::Quit);
        if !apply(session, command, output)? {
            break;
        }
        if rerender {
            let frame = session.render(visualizer);
            write!(output, "{}", frame.to_text())?;
        }
        output.flush()?;
    }
    Ok(())
}
