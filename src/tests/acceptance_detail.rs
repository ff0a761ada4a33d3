//! Acceptance tests for the question detail screen and inline editing.

use crate::state::{DetailStatus, EditState, Route, Screen, Settings, StatusKind};
use crate::store::{MemoryStore, QuestionDetail, RecordStore};
use crate::test_harness::{AcceptanceTestHarness, answer, insert_fixtures};
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;

fn store_with_answered_question() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let rows = insert_fixtures(store.as_ref(), &[("Password policy", &["auth"])]);
    answer(store.as_ref(), &rows[0].id, "Rotate on compromise only.");
    answer(store.as_ref(), &rows[0].id, "Use a manager.");
    store
}

fn loaded(harness: &AcceptanceTestHarness) -> QuestionDetail {
    let Screen::Detail(detail) = harness.state().screen() else {
        panic!("Expected detail screen, got {:?}", harness.state().screen());
    };
    let DetailStatus::Loaded(data) = detail.status() else {
        panic!("Expected loaded detail, got {:?}", detail.status());
    };
    data.clone()
}

#[test]
fn enter_opens_question_with_answers() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    assert_eq!(harness.state().list().view().rows[0].answer_count, 2);

    harness.send_key(KeyCode::Enter);
    let data = loaded(&harness);
    assert_eq!(data.question.title, "Password policy");
    assert_eq!(data.answers.len(), 2);
    assert_eq!(data.answers[0].content, "Rotate on compromise only.");

    let screen = harness.render_to_string();
    assert!(screen.contains("Password policy"));
    assert!(screen.contains("Answers (2)"));
}

#[test]
fn esc_returns_to_list() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    harness.send_key(KeyCode::Enter);
    harness.send_key(KeyCode::Esc);
    assert!(matches!(harness.state().screen(), Screen::List));
    assert_eq!(harness.state().list().view().total_count, 1);
}

#[test]
fn opening_a_missing_question_shows_error() {
    let store = Arc::new(MemoryStore::new());
    let id = crate::model::QuestionId::new("gone").unwrap();
    let harness =
        AcceptanceTestHarness::with_settings(store, Settings::default(), Route::Detail(id), 80, 24);
    let Screen::Detail(detail) = harness.state().screen() else {
        panic!("Expected detail screen");
    };
    assert!(matches!(detail.status(), DetailStatus::Failed { .. }));
}

#[test]
fn editing_title_saves_and_reloads() {
    let store = store_with_answered_question();
    let mut harness = AcceptanceTestHarness::new(store.clone());
    harness.send_key(KeyCode::Enter);

    harness.send_key(KeyCode::Char('e'));
    assert!(harness.state().is_text_entry());
    harness.type_text(" (2024)");
    harness.send_key(KeyCode::Enter);

    assert_eq!(loaded(&harness).question.title, "Password policy (2024)");
    assert!(!harness.state().is_text_entry());
    let status = harness.state().status().unwrap();
    assert_eq!(status.kind, StatusKind::Info);
    assert_eq!(status.text, "Question updated");

    let id = loaded(&harness).question.id;
    assert_eq!(
        store.get_question(&id).unwrap().unwrap().title,
        "Password policy (2024)"
    );
}

#[test]
fn cancelling_an_edit_writes_nothing() {
    let store = store_with_answered_question();
    let mut harness = AcceptanceTestHarness::new(store.clone());
    harness.send_key(KeyCode::Enter);

    harness.send_key(KeyCode::Char('T'));
    harness.type_text(", extra");
    harness.send_key(KeyCode::Esc);

    let Screen::Detail(detail) = harness.state().screen() else {
        panic!("Expected detail screen");
    };
    assert_eq!(detail.edit(), &EditState::Viewing);
    assert_eq!(loaded(&harness).question.tags, Some(vec!["auth".to_string()]));
}

#[test]
fn writing_an_answer_adds_it() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    harness.send_key(KeyCode::Enter);

    harness.send_key(KeyCode::Char('w'));
    harness.type_text("MFA first");
    harness.send_key_with_mods(KeyCode::Char('j'), KeyModifiers::CONTROL);
    harness.type_text("then length");
    harness.send_key(KeyCode::Enter);

    let data = loaded(&harness);
    assert_eq!(data.answers.len(), 3);
    assert_eq!(data.answers[2].content, "MFA first\nthen length");
}

#[test]
fn blank_answer_is_rejected_without_store_call() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    harness.send_key(KeyCode::Enter);
    harness.send_key(KeyCode::Char('w'));
    harness.type_text("   ");
    harness.send_key(KeyCode::Enter);

    assert_eq!(harness.state().status().unwrap().kind, StatusKind::Error);
    assert!(harness.state().is_text_entry(), "Editor stays open");
    assert_eq!(loaded(&harness).answers.len(), 2);
}

#[test]
fn editing_selected_answer() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    harness.send_key(KeyCode::Enter);
    harness.send_key(KeyCode::Char('j'));
    harness.send_key(KeyCode::Char('E'));
    harness.type_text(" Really.");
    harness.send_key(KeyCode::Enter);

    assert_eq!(loaded(&harness).answers[1].content, "Use a manager. Really.");
}

#[test]
fn delete_is_refused_when_disabled() {
    let mut harness = AcceptanceTestHarness::new(store_with_answered_question());
    harness.send_key(KeyCode::Enter);
    harness.send_key(KeyCode::Char('d'));

    let status = harness.state().status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.ends_with("is disabled"));
    assert_eq!(loaded(&harness).answers.len(), 2);
}

#[test]
fn delete_removes_selected_answer_when_enabled() {
    let settings = Settings {
        allow_answer_delete: true,
        ..Settings::default()
    };
    let mut harness = AcceptanceTestHarness::with_settings(
        store_with_answered_question(),
        settings,
        Route::List,
        80,
        24,
    );
    harness.send_key(KeyCode::Enter);
    harness.send_key(KeyCode::Char('d'));

    let data = loaded(&harness);
    assert_eq!(data.answers.len(), 1);
    assert_eq!(data.answers[0].content, "Use a manager.");
}
