//! Ask-a-question form (pure).

use crate::model::{NewQuestion, ValidationError, parse_tag_list};
use crate::state::effects::Mutation;
use crate::state::text_input::TextInput;

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskField {
    /// Question title.
    Title,
    /// Markdown body.
    Content,
    /// Author name.
    Author,
    /// Comma-separated tags.
    Tags,
}

impl AskField {
    const ORDER: [AskField; 4] = [
        AskField::Title,
        AskField::Content,
        AskField::Author,
        AskField::Tags,
    ];

    /// Field caption.
    pub fn label(self) -> &'static str {
        match self {
            AskField::Title => "Title",
            AskField::Content => "Content (markdown)",
            AskField::Author => "Author",
            AskField::Tags => "Tags (comma separated)",
        }
    }

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// All fields in tab order.
    pub fn all() -> [AskField; 4] {
        Self::ORDER
    }
}

/// Ask form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskForm {
    title: TextInput,
    content: TextInput,
    author: TextInput,
    tags: TextInput,
    focus: AskField,
    submitting: bool,
}

impl AskForm {
    /// Empty form; the author field is pre-filled with `default_author`.
    pub fn new(default_author: &str) -> Self {
        Self {
            title: TextInput::default(),
            content: TextInput::default(),
            author: TextInput::with_value(default_author),
            tags: TextInput::default(),
            focus: AskField::Title,
            submitting: false,
        }
    }

    /// Focused field.
    pub fn focus(&self) -> AskField {
        self.focus
    }

    /// Move focus forward (wraps).
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move focus backward (wraps).
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Contents of `field`.
    pub fn field(&self, field: AskField) -> &TextInput {
        match field {
            AskField::Title => &self.title,
            AskField::Content => &self.content,
            AskField::Author => &self.author,
            AskField::Tags => &self.tags,
        }
    }

    fn field_mut(&mut self, field: AskField) -> &mut TextInput {
        match field {
            AskField::Title => &mut self.title,
            AskField::Content => &mut self.content,
            AskField::Author => &mut self.author,
            AskField::Tags => &mut self.tags,
        }
    }

    /// Apply a text transition to the focused field. Ignored while submitting.
    pub fn update_focused(&mut self, f: impl FnOnce(TextInput) -> TextInput) {
        if self.submitting {
            return;
        }
        let input = self.field_mut(self.focus);
        *input = f(std::mem::take(input));
    }

    /// Whether a submit is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and produce the insert. `Ok(None)` if already submitting.
    pub fn submit(&mut self) -> Result<Option<Mutation>, ValidationError> {
        if self.submitting {
            return Ok(None);
        }
        let question = NewQuestion::new(
            self.title.value(),
            self.content.value(),
            self.author.value(),
            parse_tag_list(self.tags.value()),
        )?;
        self.submitting = true;
        Ok(Some(Mutation::InsertQuestion(question)))
    }

    /// The insert failed; allow editing and resubmitting.
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }
}
