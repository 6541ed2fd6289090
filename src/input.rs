/// Single-line text buffer with a cursor counted in chars, not bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Empty the buffer, returning what it held
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputLine {
        let mut input = InputLine::default();
        s.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn test_insert_in_middle_of_multibyte_text() {
        let mut input = typed("héllo");
        input.move_home();
        input.move_right();
        input.move_right();
        input.insert('é');
        assert_eq!(input.text(), "hééllo");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = typed("añb");
        input.backspace();
        assert_eq!(input.text(), "añ");
        input.move_home();
        input.delete();
        assert_eq!(input.text(), "ñ");
        input.move_end();
        input.delete();
        assert_eq!(input.text(), "ñ");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut input = typed("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_home();
        input.move_left();
        input.backspace();
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_take_resets() {
        let mut input = typed("  ");
        assert!(input.is_blank());
        assert_eq!(input.take(), "  ");
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }
}
