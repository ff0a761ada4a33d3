//! Side effects requested by the pure state layer and their outcomes.
//!
//! State transitions never touch the store. They return [`Effect`]s; the
//! shell executes them (see `crate::fetch`) and feeds the resulting
//! [`Outcome`] back through `AppState::apply_outcome`.

use crate::model::{
    AnswerId, AnswerPatch, NewAnswer, NewQuestion, QuestionId, QuestionPatch, StoreError,
};
use crate::state::list_controller::{FetchRequest, RequestSeq};
use crate::state::tag_index::TagUniverse;
use crate::store::{PageResult, QuestionDetail};

/// A write against the record store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create a question (ask form).
    InsertQuestion(NewQuestion),
    /// Patch a question's title or tags.
    UpdateQuestion {
        /// Target row.
        id: QuestionId,
        /// Fields to replace.
        patch: QuestionPatch,
    },
    /// Add an answer.
    InsertAnswer(NewAnswer),
    /// Replace an answer body.
    UpdateAnswer {
        /// Target row.
        id: AnswerId,
        /// New body.
        patch: AnswerPatch,
    },
    /// Remove an answer.
    DeleteAnswer(AnswerId),
}

impl Mutation {
    /// Short past-tense description for the status line.
    pub fn done_message(&self) -> &'static str {
        match self {
            Mutation::InsertQuestion(_) => "Question posted",
            Mutation::UpdateQuestion { .. } => "Question updated",
            Mutation::InsertAnswer(_) => "Answer posted",
            Mutation::UpdateAnswer { .. } => "Answer updated",
            Mutation::DeleteAnswer(_) => "Answer deleted",
        }
    }
}

/// Work for the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a list page + count query.
    LoadPage(FetchRequest),
    /// Recompute the tag universe.
    LoadTags {
        /// Sequence for the tag guard.
        seq: RequestSeq,
    },
    /// Load a question and its answers.
    LoadDetail {
        /// Sequence for the detail guard.
        seq: RequestSeq,
        /// Question to load.
        id: QuestionId,
    },
    /// Apply a write.
    Mutate(Mutation),
}

/// Result of an executed [`Effect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Answer to [`Effect::LoadPage`].
    Page {
        /// Sequence of the request.
        seq: RequestSeq,
        /// Rows and count, or the store error.
        result: Result<PageResult, StoreError>,
    },
    /// Answer to [`Effect::LoadTags`].
    Tags {
        /// Sequence of the request.
        seq: RequestSeq,
        /// Distinct tags, or the store error.
        result: Result<TagUniverse, StoreError>,
    },
    /// Answer to [`Effect::LoadDetail`].
    Detail {
        /// Sequence of the request.
        seq: RequestSeq,
        /// Question that was loaded.
        id: QuestionId,
        /// Question and answers, or the store error.
        result: Result<QuestionDetail, StoreError>,
    },
    /// Answer to [`Effect::Mutate`].
    Mutated {
        /// The write that was attempted.
        mutation: Mutation,
        /// Store verdict.
        result: Result<(), StoreError>,
    },
}
