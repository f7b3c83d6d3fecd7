//! Screen layout.
//!
//! ```text
//! iconpack · 42 icons · 3 selected
//! loading icons | <banner>
//! ──────────────────────────────
//! > [x] arrow-left        24x24
//!   [ ] broken            HTTP 403
//! ──────────────────────────────
//! space toggle  enter click  a all  n none  r refresh  d download  q quit
//! ```

use crate::client::{
    app::StatusBar,
    render::{EmbedState, IconCard},
    selection::SelectionCounter,
};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Rows taken by the header and footer.
pub const CHROME_ROWS: usize = 5;

const STATUS_ROW: u16 = 1;

const HELP: &str = "space toggle  enter click  a all  n none  r refresh  d download  q quit";

pub struct Frame<'a> {
    pub cards: &'a [IconCard],
    pub counter: SelectionCounter,
    pub status: &'a StatusBar,
    pub cursor: usize,
    pub offset: usize,
    pub width: usize,
    pub height: usize,
}

impl Frame<'_> {
    pub fn lines(&self) -> Vec<String> {
        let rule = "─".repeat(self.width.max(1));
        let selected = format!("{} selected", self.counter.count);
        let selected = if self.counter.highlighted {
            selected.bold().bright_green().to_string()
        } else {
            selected.dimmed().to_string()
        };

        let mut lines = vec![
            format!("iconpack · {} icons · {}", self.cards.len(), selected),
            status_line(self.status),
            rule.dimmed().to_string(),
        ];

        let rows = self.height.saturating_sub(CHROME_ROWS);
        lines.extend(
            self.cards
                .iter()
                .enumerate()
                .skip(self.offset)
                .take(rows)
                .map(|(i, card)| card_line(card, i == self.cursor)),
        );
        if self.cards.is_empty() && self.status.loading().is_none() {
            lines.push("no icons".dimmed().to_string());
        }

        lines.push(rule.dimmed().to_string());
        lines.push(HELP.dimmed().to_string());
        lines
    }
}

/// Loading message and banner, as shown on the second row.
fn status_line(status: &StatusBar) -> String {
    let loading = status
        .loading()
        .map(|m| format!("{}", format!("{m}...").cyan()));
    let banner = status.banner().map(|m| m.red().to_string());
    match (loading, banner) {
        (Some(l), Some(b)) => format!("{l} | {b}"),
        (Some(l), None) => l,
        (None, Some(b)) => b,
        (None, None) => String::new(),
    }
}

pub fn card_line(card: &IconCard, focused: bool) -> String {
    let marker = if focused { ">" } else { " " };
    let check = if card.checked { "[x]" } else { "[ ]" };
    let state = match &card.embed.state {
        EmbedState::Pending | EmbedState::Requested => "…".dimmed().to_string(),
        EmbedState::Loaded(doc) => match doc.size {
            Some((w, h)) => format!("{w}x{h}"),
            None => "ready".to_string(),
        },
        EmbedState::Failed(reason) => reason.red().to_string(),
    };
    let line = format!("{marker} {check} {:<28} {state}", card.name);
    if focused {
        line.bold().to_string()
    } else {
        line
    }
}

pub fn draw(out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.lines().iter().enumerate().take(frame.height) {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row), Print(line))?;
    }
    out.flush()
}

/// Redraw only the status row, while an operation holds the app.
pub fn draw_status(out: &mut impl Write, status: &StatusBar) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, STATUS_ROW),
        Clear(ClearType::CurrentLine),
        Print(status_line(status))
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<IconCard> {
        let mut done = IconCard::new("1:1", "home", None);
        done.checked = true;
        let mut failed = IconCard::new("1:2", "broken", None);
        failed.embed.state = EmbedState::Failed("HTTP 403".into());
        vec![done, failed, IconCard::new("1:3", "star", None)]
    }

    #[test]
    fn test_card_line() {
        let cards = cards();
        assert!(card_line(&cards[0], true).contains("> [x] home"));
        let failed = card_line(&cards[1], false);
        assert!(failed.starts_with("  [ ] broken"));
        assert!(failed.contains("HTTP 403"));
    }

    #[test]
    fn test_frame_window() {
        let cards = cards();
        let status = StatusBar::default();
        let frame = Frame {
            cards: &cards,
            counter: SelectionCounter {
                count: 1,
                highlighted: true,
            },
            status: &status,
            cursor: 1,
            offset: 1,
            width: 10,
            height: CHROME_ROWS + 1,
        };

        let lines = frame.lines();
        assert!(lines[0].starts_with("iconpack · 3 icons · "));
        assert!(lines[0].contains("1 selected"));
        assert_eq!(lines.len(), CHROME_ROWS + 1);
        assert!(lines[3].contains("> [ ] broken"));
        assert!(lines[5].contains(HELP));
    }

    #[test]
    fn test_status_row_follows_loading() {
        let status = StatusBar::default();
        let mut out = Vec::new();
        {
            let _loading = status.begin("packaging download");
            draw_status(&mut out, &status).unwrap();
        }
        assert!(String::from_utf8_lossy(&out).contains("packaging download..."));
        assert_eq!(status_line(&status), "");
    }
}
