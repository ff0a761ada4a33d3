//! Single-line text input (pure state transitions).
//!
//! Backs the search box, the inline editors and the ask form fields. The
//! cursor is a character index, never a byte offset, so multi-byte input
//! (Hangul, emoji) edits correctly.

/// Text buffer with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars, `0..=char_count`.
    cursor: usize,
}

impl TextInput {
    /// Input pre-filled with `value`, cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Consume the input, returning its text.
    pub fn into_value(self) -> String {
        self.value
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }
}

/// Insert `ch` at the cursor and advance it.
pub fn handle_char_input(input: TextInput, ch: char) -> TextInput {
    let at = input.byte_offset(input.cursor);
    let TextInput { mut value, cursor } = input;
    value.insert(at, ch);
    TextInput {
        value,
        cursor: cursor + 1,
    }
}

/// Delete the char before the cursor. No-op at position 0.
pub fn handle_backspace(input: TextInput) -> TextInput {
    if input.cursor == 0 {
        return input;
    }
    let at = input.byte_offset(input.cursor - 1);
    let TextInput { mut value, cursor } = input;
    value.remove(at);
    TextInput {
        value,
        cursor: cursor - 1,
    }
}

/// Delete the char under the cursor. No-op at the end.
pub fn handle_delete(input: TextInput) -> TextInput {
    if input.cursor >= input.char_count() {
        return input;
    }
    let at = input.byte_offset(input.cursor);
    let TextInput { mut value, cursor } = input;
    value.remove(at);
    TextInput { value, cursor }
}

/// Move the cursor left. Saturates at 0.
pub fn handle_cursor_left(input: TextInput) -> TextInput {
    TextInput {
        cursor: input.cursor.saturating_sub(1),
        ..input
    }
}

/// Move the cursor right. Saturates at the end of the text.
pub fn handle_cursor_right(input: TextInput) -> TextInput {
    let max = input.char_count();
    TextInput {
        cursor: (input.cursor + 1).min(max),
        ..input
    }
}

/// Move the cursor to the start.
pub fn handle_home(input: TextInput) -> TextInput {
    TextInput { cursor: 0, ..input }
}

/// Move the cursor to the end.
pub fn handle_end(input: TextInput) -> TextInput {
    let cursor = input.char_count();
    TextInput { cursor, ..input }
}

/// Erase everything.
pub fn handle_clear(_input: TextInput) -> TextInput {
    TextInput::default()
}

// ===== Tests =====

#[cfg(test)]
#[path = "text_input_tests.rs"]
mod tests;
