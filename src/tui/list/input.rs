use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::list::state::{Mode, Msg};

/// Translate a key press into a reducer message for the current mode
pub fn key_to_msg(mode: Mode, key: KeyEvent) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Msg::Quit),
            _ => None,
        };
    }

    match mode {
        Mode::Exiting => None,
        Mode::LiveSearching => match key.code {
            KeyCode::Esc => Some(Msg::ExitSearch),
            KeyCode::Enter => Some(Msg::CommitSearch),
            KeyCode::Backspace => Some(Msg::Backspace),
            KeyCode::Char(c) if !c.is_control() => Some(Msg::TypeChar(c)),
            _ => None,
        },
        Mode::Browsing | Mode::SearchApplied => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Msg::MoveSelection(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Msg::MoveSelection(1)),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Msg::Page(-1)),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Msg::Page(1)),
            KeyCode::Char('/') => Some(Msg::EnterSearch),
            KeyCode::Char('d') => Some(Msg::ToggleDone),
            KeyCode::Char('a') => Some(Msg::ToggleArchive),
            KeyCode::Char('q') => Some(Msg::Quit),
            KeyCode::Esc if mode == Mode::SearchApplied => Some(Msg::ExitSearch),
            KeyCode::Esc => Some(Msg::Quit),
            _ => None,
        },
    }
}
