//! Key handling for the picker

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Picker commands triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerCommand {
    /// Move the cursor up one row
    NavigateUp,
    /// Move the cursor down one row
    NavigateDown,
    /// Move the cursor up one page
    PageUp,
    /// Move the cursor down one page
    PageDown,
    /// Choose the highlighted item
    Select,
    /// Leave without choosing
    Cancel,
    /// Append a character to the query
    TextInput(char),
    /// Delete the last query character
    Backspace,
    /// Clear the query
    ClearQuery,
}

impl PickerCommand {
    /// Convert a key event to a picker command
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match (key.code, key.modifiers) {
            // Navigation
            (KeyCode::Up, _) => Some(PickerCommand::NavigateUp),
            (KeyCode::Down, _) => Some(PickerCommand::NavigateDown),
            (KeyCode::Char('p' | 'k'), KeyModifiers::CONTROL) => Some(PickerCommand::NavigateUp),
            (KeyCode::Char('n' | 'j'), KeyModifiers::CONTROL) => {
                Some(PickerCommand::NavigateDown)
            }
            (KeyCode::PageUp, _) => Some(PickerCommand::PageUp),
            (KeyCode::PageDown, _) => Some(PickerCommand::PageDown),

            // Selection
            (KeyCode::Enter, _) => Some(PickerCommand::Select),

            // Cancel
            (KeyCode::Esc, _) => Some(PickerCommand::Cancel),
            (KeyCode::Char('c' | 'd' | 'q'), KeyModifiers::CONTROL) => {
                Some(PickerCommand::Cancel)
            }

            // Query editing
            (KeyCode::Backspace, _) => Some(PickerCommand::Backspace),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(PickerCommand::ClearQuery),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                Some(PickerCommand::TextInput(c))
            }

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_command() {
        // Navigation
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::NavigateDown));

        let key = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::NavigateUp));

        // Letters are query text, not navigation
        let key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::TextInput('j')));

        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::TextInput('A')));

        // Cancel
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::Cancel));

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::Cancel));

        // Query editing
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(PickerCommand::from_key(key), Some(PickerCommand::ClearQuery));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(PickerCommand::from_key(key), None);
    }
}
