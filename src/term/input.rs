//! Keyboard mapping for the terminal front-end

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Command;

/// What a single key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    Quit,
    Ignore,
}

/// Translate a raw key event; releases and repeats of non-movement keys are ignored
pub fn map_key(event: &KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    let repeat = event.kind == KeyEventKind::Repeat;
    match event.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => KeyAction::Command(Command::MoveUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => {
            KeyAction::Command(Command::MoveDown)
        }
        KeyCode::Char(' ') if !repeat => KeyAction::Command(Command::Jump),
        KeyCode::Enter | KeyCode::Char('r') if !repeat => KeyAction::Command(Command::Restart),
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyAction {
        map_key(&key(code, KeyEventKind::Press))
    }

    #[test]
    fn test_movement_keys() {
        for code in [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('k')] {
            assert_eq!(press(code), KeyAction::Command(Command::MoveUp));
        }
        for code in [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('j')] {
            assert_eq!(press(code), KeyAction::Command(Command::MoveDown));
        }
        // Held arrows keep stepping
        assert_eq!(
            map_key(&key(KeyCode::Up, KeyEventKind::Repeat)),
            KeyAction::Command(Command::MoveUp)
        );
    }

    #[test]
    fn test_one_shot_keys() {
        assert_eq!(press(KeyCode::Char(' ')), KeyAction::Command(Command::Jump));
        assert_eq!(press(KeyCode::Enter), KeyAction::Command(Command::Restart));
        assert_eq!(press(KeyCode::Char('r')), KeyAction::Command(Command::Restart));
        assert_eq!(
            map_key(&key(KeyCode::Enter, KeyEventKind::Repeat)),
            KeyAction::Ignore
        );
    }

    #[test]
    fn test_quit_and_ignore() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(press(KeyCode::Char('x')), KeyAction::Ignore);
        assert_eq!(map_key(&key(KeyCode::Up, KeyEventKind::Release)), KeyAction::Ignore);
    }
}
