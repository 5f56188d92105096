//! Terminal rendering of the record under the cursor and the rows around it.

use crate::console::Console;
use colored::{ColoredString, Colorize};
use curator_core::window::window;
use curator_core::{Ledger, SessionEvent, SessionObserver, SessionView, Status};
use std::io::{self, Write};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: (u8, u8, u8),
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: (0x00, 0x72, 0xb5),
        }
    }
}

impl Palette {
    /// Parses `#rrggbb`; anything else keeps the default accent.
    pub fn from_accent(accent: &str) -> Self {
        match parse_hex(accent) {
            Some(rgb) => Self { accent: rgb },
            None => {
                warn!("ignoring accent {:?}, expected #rrggbb", accent);
                Self::default()
            }
        }
    }

    pub fn accent(&self, text: &str) -> ColoredString {
        let (r, g, b) = self.accent;
        text.truecolor(r, g, b).bold()
    }

    pub fn status(&self, status: Status) -> ColoredString {
        let label = status.to_string();
        match status {
            Status::Keep => label.green(),
            Status::Remove => label.red(),
            Status::Unsure => label.truecolor(0xff, 0xba, 0x00),
            Status::Unassigned => label.normal(),
        }
    }
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn render_header<W: Write>(
    out: &mut W,
    view: &SessionView<'_>,
    palette: &Palette,
) -> io::Result<()> {
    let Some(record) = view.current() else {
        return writeln!(out, "(empty ledger)");
    };
    let summary = view.summary();
    writeln!(
        out,
        "{} {}  [{}/{}]",
        palette.accent("File Name:"),
        record.file_name(),
        view.cursor + 1,
        summary.total
    )?;
    writeln!(out, "{} {}", palette.accent("Status:"), palette.status(record.status()))?;
    let mut footer = format!("reviewed {}/{}", summary.reviewed(), summary.total);
    if view.dirty {
        footer.push_str(", unsaved changes");
    }
    if let Some(at) = view.last_saved {
        footer.push_str(&format!(", saved {}", at.format("%H:%M:%S")));
    }
    writeln!(out, "{}", footer.dimmed())
}

pub fn render_window<W: Write>(
    out: &mut W,
    ledger: &Ledger,
    cursor: usize,
    size: usize,
    palette: &Palette,
) -> io::Result<()> {
    writeln!(out, "  {:>5}  {:>4} {:>6} {:>6}  data_record", "index", "keep", "remove", "unsure")?;
    for index in window(cursor, ledger.len(), size) {
        let r = &ledger.records()[index];
        let marker = if index == cursor { ">" } else { " " };
        let line = format!(
            "{} {:>5}  {:>4} {:>6} {:>6}  {}",
            marker,
            index,
            u8::from(r.keep),
            u8::from(r.remove),
            u8::from(r.unsure),
            r.path
        );
        if index == cursor {
            writeln!(out, "{}", palette.accent(&line))?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Redraws after each session event.
pub struct TerminalPresenter {
    console: Console,
    palette: Palette,
    window: usize,
}

impl TerminalPresenter {
    pub fn new(console: Console, palette: Palette, window: usize) -> Self {
        Self {
            console,
            palette,
            window,
        }
    }

    fn draw(&mut self, event: &SessionEvent, view: &SessionView<'_>) -> io::Result<()> {
        let out = &mut self.console;
        match event {
            SessionEvent::EndOfLedger { index } => {
                writeln!(out, "already at the last record ({})", index)
            }
            SessionEvent::Saved { path, records } => {
                writeln!(out, "saved {} records to {}", records, path.display())
            }
            SessionEvent::Refreshed
            | SessionEvent::Moved { .. }
            | SessionEvent::StatusChanged { .. } => {
                writeln!(out)?;
                render_header(out, view, &self.palette)?;
                render_window(out, view.ledger, view.cursor, self.window, &self.palette)
            }
        }
    }
}

impl SessionObserver for TerminalPresenter {
    fn on_event(&mut self, event: &SessionEvent, view: &SessionView<'_>) {
        if let Err(e) = self.draw(event, view) {
            warn!("render failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::Decision;

    #[test]
    fn parses_accent_colours() {
        assert_eq!(parse_hex("#ffba00"), Some((0xff, 0xba, 0x00)));
        assert_eq!(parse_hex("ffba00"), None);
        assert_eq!(parse_hex("#ffba0"), None);
        assert_eq!(Palette::from_accent("teal"), Palette::default());
    }

    #[test]
    fn window_marks_the_cursor_row() {
        colored::control::set_override(false);
        let mut ledger = Ledger::from_paths((0..8).map(|i| format!("imgs/{i}.png")));
        ledger.set_status(3, Decision::Remove).unwrap();

        let mut out = Vec::new();
        render_window(&mut out, &ledger, 3, 5, &Palette::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("imgs/1.png"));
        assert!(lines[3].starts_with('>'));
        assert!(lines[3].ends_with("0      1      0  imgs/3.png"), "{}", lines[3]);
        assert!(lines[5].contains("imgs/5.png"));
    }

    #[test]
    fn header_shows_name_status_and_progress() {
        colored::control::set_override(false);
        let mut ledger = Ledger::from_paths(["imgs/a.png", "imgs/b.png"]);
        ledger.set_status(0, Decision::Keep).unwrap();
        let view = SessionView {
            ledger: &ledger,
            cursor: 0,
            dirty: true,
            last_saved: None,
        };
        let mut out = Vec::new();
        render_header(&mut out, &view, &Palette::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("File Name: a.png  [1/2]"), "{text}");
        assert!(text.contains("Status: Keep"));
        assert!(text.contains("reviewed 1/2, unsaved changes"));
    }
}
