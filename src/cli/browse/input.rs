//! Key bindings and cursor movement.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    PageUp,
    PageDown,
    /// Flip the checkbox under the cursor.
    Toggle,
    /// Click the vector under the cursor.
    Click,
    SelectAll,
    ClearAll,
    Refresh,
    Download,
    Quit,
}

pub fn action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    Some(match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Enter => Action::Click,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Char('n') => Action::ClearAll,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('d') => Action::Download,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    })
}

/// Cursor and scroll position over a list of `len` rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub cursor: usize,
    pub offset: usize,
}

impl View {
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Keep the cursor inside a window of `height` rows.
    pub fn scroll(&mut self, height: usize, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }
}
