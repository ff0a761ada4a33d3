//! Question detail screen: load, inline editing, answer management (pure).
//!
//! # Editing
//!
//! ```text
//! Viewing ──begin_edit──▶ Editing ──save──▶ Saving ──ok──▶ Viewing (+ reload)
//!    ▲                       │  ▲             │
//!    └──────cancel───────────┘  └────error────┘
//! ```
//!
//! A failed save keeps the editor open with the typed text so the user can
//! retry. Detail loads carry their own [`RequestSeq`] guard.

use crate::model::{
    AnswerId, AnswerPatch, AnswerRow, NewAnswer, QuestionId, QuestionPatch, StoreError,
    ValidationError,
};
use crate::state::effects::{Effect, Mutation};
use crate::state::list_controller::{Completion, RequestSeq, SeqCounter};
use crate::state::text_input::TextInput;
use crate::store::QuestionDetail;
use tracing::debug;

/// What an open editor writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Question title.
    Title,
    /// Question tags, edited as a comma-separated list.
    Tags,
    /// Body of an existing answer.
    Answer(AnswerId),
    /// A new answer.
    NewAnswer,
}

impl EditTarget {
    /// Editor caption.
    pub fn label(&self) -> &'static str {
        match self {
            EditTarget::Title => "Edit title",
            EditTarget::Tags => "Edit tags (comma separated)",
            EditTarget::Answer(_) => "Edit answer",
            EditTarget::NewAnswer => "Write answer",
        }
    }
}

/// Inline editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    /// No editor open.
    Viewing,
    /// Editor open.
    Editing {
        /// Field being edited.
        target: EditTarget,
        /// Typed text.
        input: TextInput,
        /// A save is in flight.
        saving: bool,
    },
}

/// Load state of the detail screen.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    /// Fetch in flight.
    Loading,
    /// Question and answers available.
    Loaded(QuestionDetail),
    /// Fetch failed.
    Failed {
        /// Store message, verbatim.
        message: String,
    },
}

/// State of one open question.
#[derive(Debug, Clone)]
pub struct DetailState {
    id: QuestionId,
    status: DetailStatus,
    seq: SeqCounter,
    edit: EditState,
    selected_answer: usize,
}

impl DetailState {
    /// Open `id`; returns the state and its initial load.
    pub fn open(id: QuestionId) -> (Self, Effect) {
        Self::open_with(id, SeqCounter::default())
    }

    /// Open `id`, continuing the numbering of a previously open question.
    pub fn open_with(id: QuestionId, seq: SeqCounter) -> (Self, Effect) {
        let mut state = Self {
            id,
            status: DetailStatus::Loading,
            seq,
            edit: EditState::Viewing,
            selected_answer: 0,
        };
        let effect = state.reload();
        (state, effect)
    }

    /// Question shown.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Sequence counter, for handing on to the next opened question.
    pub fn counter(&self) -> &SeqCounter {
        &self.seq
    }

    /// Load state.
    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    /// Editor state.
    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    /// Whether an editor is open.
    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing { .. })
    }

    /// Loaded data, if any.
    pub fn detail(&self) -> Option<&QuestionDetail> {
        match &self.status {
            DetailStatus::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    /// Index of the highlighted answer.
    pub fn selected_answer(&self) -> usize {
        self.selected_answer
    }

    fn selected_answer_row(&self) -> Option<&AnswerRow> {
        self.detail()?.answers.get(self.selected_answer)
    }

    /// Re-fetch the question and its answers.
    pub fn reload(&mut self) -> Effect {
        let seq = self.seq.issue();
        self.status = DetailStatus::Loading;
        Effect::LoadDetail {
            seq,
            id: self.id.clone(),
        }
    }

    /// Feed a load result back. Stale results are discarded.
    pub fn complete(
        &mut self,
        seq: RequestSeq,
        result: Result<QuestionDetail, StoreError>,
    ) -> Completion {
        if !self.seq.is_latest(seq) {
            debug!(seq = seq.get(), "Discarding stale detail response");
            return Completion::Stale;
        }
        self.status = match result {
            Ok(detail) => {
                let last = detail.answers.len().saturating_sub(1);
                self.selected_answer = self.selected_answer.min(last);
                DetailStatus::Loaded(detail)
            }
            Err(err) => DetailStatus::Failed {
                message: err.to_string(),
            },
        };
        Completion::Applied
    }

    /// Highlight the next answer.
    pub fn next_answer(&mut self) {
        let count = self.detail().map_or(0, |d| d.answers.len());
        if self.selected_answer + 1 < count {
            self.selected_answer += 1;
        }
    }

    /// Highlight the previous answer.
    pub fn prev_answer(&mut self) {
        self.selected_answer = self.selected_answer.saturating_sub(1);
    }

    /// Open an editor pre-filled with the current value.
    ///
    /// Returns `false` when nothing is loaded, an editor is already open, or
    /// the target answer does not exist.
    pub fn begin_edit(&mut self, target: EditTarget) -> bool {
        if self.is_editing() {
            return false;
        }
        let Some(detail) = self.detail() else {
            return false;
        };
        let initial = match &target {
            EditTarget::Title => detail.question.title.clone(),
            EditTarget::Tags => detail
                .question
                .tags
                .as_deref()
                .unwrap_or_default()
                .join(", "),
            EditTarget::Answer(id) => match detail.answers.iter().find(|a| &a.id == id) {
                Some(answer) => answer.content.clone(),
                None => return false,
            },
            EditTarget::NewAnswer => String::new(),
        };
        self.edit = EditState::Editing {
            target,
            input: TextInput::with_value(initial),
            saving: false,
        };
        true
    }

    /// Open an editor on the highlighted answer.
    pub fn begin_edit_selected_answer(&mut self) -> bool {
        match self.selected_answer_row().map(|a| a.id.clone()) {
            Some(id) => self.begin_edit(EditTarget::Answer(id)),
            None => false,
        }
    }

    /// Apply a text transition to the open editor. Ignored while saving.
    pub fn update_input(&mut self, f: impl FnOnce(TextInput) -> TextInput) {
        if let EditState::Editing {
            input,
            saving: false,
            ..
        } = &mut self.edit
        {
            *input = f(std::mem::take(input));
        }
    }

    /// Close the editor without writing anything.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    /// Validate the editor contents and produce the write.
    ///
    /// `Ok(None)` when no editor is open, a save is already in flight, or the
    /// value is unchanged (the editor closes in that last case).
    pub fn save(&mut self, author: &str) -> Result<Option<Mutation>, ValidationError> {
        let EditState::Editing {
            target,
            input,
            saving,
        } = &self.edit
        else {
            return Ok(None);
        };
        if *saving {
            return Ok(None);
        }
        let Some(detail) = self.detail() else {
            return Ok(None);
        };
        let text = input.value();
        let question = &detail.question;
        let mutation = match target {
            EditTarget::Title => {
                let patch = QuestionPatch::title(text)?;
                if patch.title.as_deref() == Some(question.title.as_str()) {
                    None
                } else {
                    Some(Mutation::UpdateQuestion {
                        id: self.id.clone(),
                        patch,
                    })
                }
            }
            EditTarget::Tags => {
                let patch = QuestionPatch::tags(text);
                let current = question.tags.clone().unwrap_or_default();
                if patch.tags.as_ref() == Some(&current) {
                    None
                } else {
                    Some(Mutation::UpdateQuestion {
                        id: self.id.clone(),
                        patch,
                    })
                }
            }
            EditTarget::Answer(id) => {
                let patch = AnswerPatch::content(text)?;
                let unchanged = detail
                    .answers
                    .iter()
                    .any(|a| &a.id == id && a.content == patch.content);
                (!unchanged).then(|| Mutation::UpdateAnswer {
                    id: id.clone(),
                    patch,
                })
            }
            EditTarget::NewAnswer => Some(Mutation::InsertAnswer(NewAnswer::new(
                self.id.clone(),
                author,
                text,
            )?)),
        };
        match &mutation {
            Some(_) => {
                if let EditState::Editing { saving, .. } = &mut self.edit {
                    *saving = true;
                }
            }
            None => self.edit = EditState::Viewing,
        }
        Ok(mutation)
    }

    /// Produce the delete for the highlighted answer, if deletion is allowed.
    pub fn request_delete(&self, allowed: bool) -> Result<Option<Mutation>, ValidationError> {
        if !allowed {
            return Err(ValidationError::Disabled {
                action: "answer deletion",
            });
        }
        Ok(self
            .selected_answer_row()
            .map(|a| Mutation::DeleteAnswer(a.id.clone())))
    }

    /// A write for this question finished. On success the editor closes and
    /// a reload is returned; on failure the editor stays open for retry.
    pub fn mutation_finished(&mut self, result: &Result<(), StoreError>) -> Option<Effect> {
        match result {
            Ok(()) => {
                self.edit = EditState::Viewing;
                Some(self.reload())
            }
            Err(_) => {
                if let EditState::Editing { saving, .. } = &mut self.edit {
                    *saving = false;
                }
                None
            }
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "detail_tests.rs"]
mod tests;
