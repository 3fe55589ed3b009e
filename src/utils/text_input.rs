use crossterm::event::KeyCode;

/// A text input field with encapsulated state.
///
/// Holds the prompt being typed on the generate screen together with its
/// cursor position (counted in characters, not bytes).
///
/// # Example
/// ```
/// use genframe::utils::text_input::TextInput;
///
/// let mut input = TextInput::new();
/// input.insert_char('h');
/// input.insert_char('i');
/// assert_eq!(input.text(), "hi");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    /// Create a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current text as a string slice.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Clear the text and reset cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        handle_char_insertion(&mut self.text, &mut self.cursor, c);
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        handle_backspace(&mut self.text, &mut self.cursor);
    }

    /// Handle an editing key.
    ///
    /// Returns true if the key was handled.
    pub fn handle_key(&mut self, key_code: KeyCode) -> bool {
        match key_code {
            KeyCode::Char(c) => handle_char_insertion(&mut self.text, &mut self.cursor, c),
            KeyCode::Backspace => handle_backspace(&mut self.text, &mut self.cursor),
            KeyCode::Delete => handle_delete(&mut self.text, &mut self.cursor),
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                handle_cursor_movement(&self.text, &mut self.cursor, key_code);
            }
            _ => return false,
        }
        true
    }
}

fn handle_char_insertion(text: &mut String, cursor_pos: &mut usize, c: char) {
    if !c.is_control() {
        let byte_index = text
            .char_indices()
            .map(|(i, _)| i)
            .nth(*cursor_pos)
            .unwrap_or(text.len());
        text.insert(byte_index, c);
        *cursor_pos = (*cursor_pos + 1).min(text.chars().count());
    }
}

fn handle_cursor_movement(text: &str, cursor_pos: &mut usize, key_code: KeyCode) {
    match key_code {
        KeyCode::Left => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
            }
        }
        KeyCode::Right => {
            let char_count = text.chars().count();
            if *cursor_pos < char_count {
                *cursor_pos += 1;
            }
        }
        KeyCode::Home => {
            *cursor_pos = 0;
        }
        KeyCode::End => {
            *cursor_pos = text.chars().count();
        }
        _ => {}
    }
}

fn handle_backspace(text: &mut String, cursor_pos: &mut usize) {
    if *cursor_pos > 0 {
        let before_cursor = text.chars().take(*cursor_pos - 1);
        let after_cursor = text.chars().skip(*cursor_pos);
        *text = before_cursor.chain(after_cursor).collect();
        *cursor_pos -= 1;
    }
}

fn handle_delete(text: &mut String, cursor_pos: &mut usize) {
    let char_count = text.chars().count();
    if *cursor_pos < char_count {
        let before_cursor = text.chars().take(*cursor_pos);
        let after_cursor = text.chars().skip(*cursor_pos + 1);
        *text = before_cursor.chain(after_cursor).collect();
    }
}
