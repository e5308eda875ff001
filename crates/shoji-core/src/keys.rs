#![forbid(unsafe_code)]

//! Normalized keystroke model.
//!
//! Backends translate whatever their terminal layer reports into this
//! enum, so widgets never see raw escape sequences or backend key types.
//! The two "commit" keys every modal loop understands are [`Key::Enter`]
//! (confirm) and [`Key::Escape`] (cancel).

/// A normalized keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Enter/Return: the confirm key.
    Enter,
    /// Escape: the cancel key.
    Escape,
    /// Backspace.
    Backspace,
    /// Delete (forward delete).
    Delete,
    /// Tab.
    Tab,
    /// A printable character.
    Char(char),
    /// Anything the backend could not map (function keys, media keys, ...).
    Other,
}

impl Key {
    /// The default stop keys for modal loops: confirm and cancel.
    pub const STOP_DEFAULT: &'static [Key] = &[Key::Escape, Key::Enter];

    /// Whether this key participates in list navigation.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::Up
                | Key::Down
                | Key::Left
                | Key::Right
                | Key::PageUp
                | Key::PageDown
                | Key::Home
                | Key::End
        )
    }

    /// Whether this key is a specific printable character.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(ch) if *ch == c)
    }
}

/// Convert a crossterm event into a normalized key, if it maps to one.
///
/// Release events are dropped so terminals reporting key-up do not
/// double-dispatch; mouse, focus, and paste events are ignored entirely.
#[must_use]
pub fn key_from_crossterm(event: &crossterm::event::Event) -> Option<Key> {
    use crossterm::event::{Event, KeyCode, KeyEventKind};

    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }

    Some(match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    #[test]
    fn navigation_keys_are_navigation() {
        for key in [
            Key::Up,
            Key::Down,
            Key::Left,
            Key::Right,
            Key::PageUp,
            Key::PageDown,
            Key::Home,
            Key::End,
        ] {
            assert!(key.is_navigation(), "{key:?} should be navigation");
        }
    }

    #[test]
    fn stop_keys_are_not_navigation() {
        assert!(!Key::Enter.is_navigation());
        assert!(!Key::Escape.is_navigation());
        assert!(!Key::Char('x').is_navigation());
    }

    #[test]
    fn is_char_matches_exactly() {
        assert!(Key::Char('q').is_char('q'));
        assert!(!Key::Char('q').is_char('Q'));
        assert!(!Key::Enter.is_char('\n'));
    }

    #[test]
    fn crossterm_press_maps() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(key_from_crossterm(&event), Some(Key::Char('a')));

        let event = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(key_from_crossterm(&event), Some(Key::Escape));
    }

    #[test]
    fn crossterm_release_is_dropped() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_from_crossterm(&Event::Key(key)), None);
    }

    #[test]
    fn crossterm_unknown_maps_to_other() {
        let event = Event::Key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(key_from_crossterm(&event), Some(Key::Other));
    }

    #[test]
    fn crossterm_resize_is_ignored() {
        assert_eq!(key_from_crossterm(&Event::Resize(80, 24)), None);
    }
}
