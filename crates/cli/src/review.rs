//! Interactive review loop: one line command per action.

use crate::console::Console;
use anyhow::Result;
use curator_core::{Decision, Session};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

pub const HELP: &str = "\
commands:
  k, keep        mark current record keep
  r, remove      mark current record remove
  u, unsure      mark current record unsure
  n, next        next record
  p, prev        previous record
  g, goto N      jump to record N (0-based)
  s, save        write the ledger file
  t, table       redraw the current record and table
  h, help        this help
  q, quit        quit (refused with unsaved changes)
  q!, quit!      quit and discard unsaved changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Decide(Decision),
    Next,
    Previous,
    Goto(usize),
    Save,
    Table,
    Help,
    Quit { force: bool },
}

impl FromStr for ReviewCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let head = parts.next().unwrap_or("").to_lowercase();
        let mut arg = parts.next();
        let cmd = match head.as_str() {
            "k" | "keep" => ReviewCommand::Decide(Decision::Keep),
            "r" | "remove" => ReviewCommand::Decide(Decision::Remove),
            "u" | "unsure" => ReviewCommand::Decide(Decision::Unsure),
            "n" | "next" => ReviewCommand::Next,
            "p" | "prev" | "previous" => ReviewCommand::Previous,
            "g" | "goto" => {
                let raw = arg.take().ok_or_else(|| "goto needs an index".to_string())?;
                let index = raw
                    .parse()
                    .map_err(|_| format!("'{raw}' is not a record index"))?;
                ReviewCommand::Goto(index)
            }
            "s" | "save" => ReviewCommand::Save,
            "t" | "table" => ReviewCommand::Table,
            "h" | "help" | "?" => ReviewCommand::Help,
            "q" | "quit" => ReviewCommand::Quit { force: false },
            "q!" | "quit!" => ReviewCommand::Quit { force: true },
            "" => return Err("empty command, h for help".to_string()),
            other => return Err(format!("unknown command '{other}', h for help")),
        };
        if arg.is_some() {
            return Err(format!("'{head}' takes no argument"));
        }
        if let Some(extra) = parts.next() {
            return Err(format!("unexpected '{extra}' after '{head}'"));
        }
        Ok(cmd)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewOptions {
    /// Step to the next record after each decision.
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewExit {
    Quit,
    Discarded,
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewReport {
    pub exit: ReviewExit,
    pub decisions: usize,
    pub unsaved: bool,
}

/// Runs commands from `input` against `session` until quit or end of input.
/// Ledger errors are reported and the loop continues; only console I/O errors end it.
pub fn run<R: BufRead>(
    session: &mut Session,
    input: R,
    console: &mut Console,
    opts: ReviewOptions,
) -> Result<ReviewReport> {
    let mut decisions = 0usize;
    let mut lines = input.lines();
    loop {
        write!(console, "> ")?;
        console.flush()?;
        let Some(line) = lines.next() else {
            writeln!(console)?;
            if session.has_unsaved_changes() {
                writeln!(console, "input closed; unsaved changes discarded")?;
            }
            return Ok(report(session, ReviewExit::EndOfInput, decisions));
        };
        let line = line?;
        let cmd = match line.parse::<ReviewCommand>() {
            Ok(cmd) => cmd,
            Err(msg) => {
                writeln!(console, "{}", msg)?;
                continue;
            }
        };
        debug!("review command {:?}", cmd);

        let outcome = match cmd {
            ReviewCommand::Decide(decision) => {
                decisions += 1;
                session.on_decision(decision).and_then(|_| {
                    if opts.auto_advance {
                        session.on_next().map(|_| ())
                    } else {
                        Ok(())
                    }
                })
            }
            ReviewCommand::Next => session.on_next().map(|_| ()),
            ReviewCommand::Previous => {
                session.on_previous();
                Ok(())
            }
            ReviewCommand::Goto(index) => session.on_jump(index).map(|_| ()),
            ReviewCommand::Save => session.on_save(),
            ReviewCommand::Table => {
                session.refresh();
                Ok(())
            }
            ReviewCommand::Help => {
                writeln!(console, "{}", HELP)?;
                Ok(())
            }
            ReviewCommand::Quit { force: false } if session.has_unsaved_changes() => {
                writeln!(console, "unsaved changes: s to save, q! to discard")?;
                Ok(())
            }
            ReviewCommand::Quit { force } => {
                let exit = if force && session.has_unsaved_changes() {
                    ReviewExit::Discarded
                } else {
                    ReviewExit::Quit
                };
                return Ok(report(session, exit, decisions));
            }
        };
        if let Err(e) = outcome {
            writeln!(console, "error: {}", e)?;
        }
    }
}

fn report(session: &Session, exit: ReviewExit, decisions: usize) -> ReviewReport {
    ReviewReport {
        exit,
        decisions,
        unsaved: session.has_unsaved_changes(),
    }
}
