use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::add::state::{Mode, Msg};

/// Translate a key press into a form message. `now` resolves relative due
/// dates when the key commits a step.
pub fn key_to_msg(mode: Mode, key: KeyEvent, now: DateTime<Local>) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Msg::Cancel),
            _ => None,
        };
    }

    match mode {
        Mode::Finished => None,
        Mode::Confirming { save } => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => Some(Msg::ToggleChoice),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Msg::ConfirmSave(now)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Msg::Discard),
            KeyCode::Enter if save => Some(Msg::ConfirmSave(now)),
            KeyCode::Enter => Some(Msg::Discard),
            KeyCode::Esc => Some(Msg::CloseConfirm),
            _ => None,
        },
        Mode::Editing => match key.code {
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => Some(Msg::Next(now)),
            KeyCode::BackTab | KeyCode::Up => Some(Msg::Back),
            KeyCode::Esc => Some(Msg::Escape),
            KeyCode::Backspace => Some(Msg::Backspace),
            KeyCode::Left => Some(Msg::CursorLeft),
            KeyCode::Right => Some(Msg::CursorRight),
            KeyCode::Home => Some(Msg::Home),
            KeyCode::End => Some(Msg::End),
            KeyCode::Char(c) if !c.is_control() => Some(Msg::TypeChar(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(
            key_to_msg(Mode::Editing, key(KeyCode::Enter), now()),
            Some(Msg::Next(now()))
        );
        assert_eq!(
            key_to_msg(Mode::Editing, key(KeyCode::Down), now()),
            Some(Msg::Next(now()))
        );
        assert_eq!(
            key_to_msg(Mode::Editing, key(KeyCode::BackTab), now()),
            Some(Msg::Back)
        );
        assert_eq!(
            key_to_msg(Mode::Editing, key(KeyCode::Char('q')), now()),
            Some(Msg::TypeChar('q'))
        );
        assert_eq!(
            key_to_msg(
                Mode::Editing,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                now()
            ),
            Some(Msg::Cancel)
        );
    }

    #[test]
    fn test_confirm_keys_follow_choice() {
        let yes = Mode::Confirming { save: true };
        let no = Mode::Confirming { save: false };
        assert_eq!(
            key_to_msg(yes, key(KeyCode::Enter), now()),
            Some(Msg::ConfirmSave(now()))
        );
        assert_eq!(key_to_msg(no, key(KeyCode::Enter), now()), Some(Msg::Discard));
        assert_eq!(key_to_msg(no, key(KeyCode::Char('n')), now()), Some(Msg::Discard));
        assert_eq!(
            key_to_msg(no, key(KeyCode::Right), now()),
            Some(Msg::ToggleChoice)
        );
        assert_eq!(key_to_msg(yes, key(KeyCode::Esc), now()), Some(Msg::CloseConfirm));
        assert_eq!(key_to_msg(yes, key(KeyCode::Char('x')), now()), None);
        assert_eq!(key_to_msg(Mode::Finished, key(KeyCode::Enter), now()), None);
    }
}
