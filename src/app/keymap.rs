use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Next,
    Previous,
    /// Press the focused button or toggle the focused radio/checkbox.
    Activate,
    /// Pan a report sideways.
    Left,
    Right,
    /// Close the top box.
    Cancel,
    /// Leave the program, whatever box is open.
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') => Some(Input::Quit),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(Input::Next),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(Input::Previous),
        KeyCode::Left | KeyCode::Char('h') => Some(Input::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Input::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Activate),
        KeyCode::Esc => Some(Input::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_key(press(KeyCode::Down)), Some(Input::Next));
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(Input::Next));
        assert_eq!(map_key(press(KeyCode::Up)), Some(Input::Previous));
        assert_eq!(map_key(press(KeyCode::Char('k'))), Some(Input::Previous));
        assert_eq!(map_key(press(KeyCode::Left)), Some(Input::Left));
        assert_eq!(map_key(press(KeyCode::Char('h'))), Some(Input::Left));
        assert_eq!(map_key(press(KeyCode::Right)), Some(Input::Right));
        assert_eq!(map_key(press(KeyCode::Char('l'))), Some(Input::Right));
    }

    #[test]
    fn activation_cancel_and_quit() {
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Input::Activate));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Input::Activate));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Input::Cancel));
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }
}
