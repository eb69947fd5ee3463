use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable text buffer with a character cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
    max_chars: usize,
    multiline: bool,
}

impl TextField {
    pub fn new(max_chars: usize) -> Self {
        TextField {
            value: String::new(),
            cursor: 0,
            max_chars,
            multiline: false,
        }
    }

    /// Field where Enter inserts a line break
    pub fn multiline(max_chars: usize) -> Self {
        TextField {
            multiline: true,
            ..Self::new(max_chars)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Replace the contents, truncated to the limit, with the cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.max_chars).collect();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) -> bool {
        if self.value.chars().count() >= self.max_chars {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Apply an editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.insert(c);
                true
            }
            KeyCode::Enter if self.multiline => {
                self.insert('\n');
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                true
            }
            _ => false,
        }
    }

    /// Cursor as (line, column) within the value
    pub fn cursor_position(&self) -> (u16, u16) {
        let before: String = self.value.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let column = before.rsplit('\n').next().map_or(0, |s| s.chars().count());
        (line as u16, column as u16)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_editing_at_cursor() {
        let mut field = TextField::new(20);
        type_str(&mut field, "hllo");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Right));
        type_str(&mut field, "e");
        assert_eq!(field.value(), "hello");

        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "hell");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "ell");
    }

    #[test]
    fn test_limit_counts_characters() {
        let mut field = TextField::new(3);
        type_str(&mut field, "가나다라");
        assert_eq!(field.value(), "가나다");
        field.set_value("abcdef");
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_multiline_enter() {
        let mut single = TextField::new(10);
        assert!(!single.handle_key(key(KeyCode::Enter)));

        let mut memo = TextField::multiline(50);
        type_str(&mut memo, "ab");
        memo.handle_key(key(KeyCode::Enter));
        type_str(&mut memo, "c");
        assert_eq!(memo.value(), "ab\nc");
        assert_eq!(memo.cursor_position(), (1, 1));
    }

    #[test]
    fn test_control_keys_pass_through() {
        let mut field = TextField::new(10);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!field.handle_key(ctrl_s));
        assert!(field.value().is_empty());
    }
}
