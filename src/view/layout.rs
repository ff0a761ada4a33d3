//! Screen layout rendering.
//!
//! Pure layout logic: splits the frame into header, screen body and status
//! bar, then dispatches to the widget of the current screen.

use crate::config::KeyBindings;
use crate::model::KeyAction;
use crate::state::{AppState, FocusPane, Screen};
use crate::view::{
    ask_form::render_ask_form, detail::render_detail, help::render_help_overlay,
    pagination_bar::PaginationBar, question_list::QuestionList, search_input::SearchInput,
    styles::BoardStyles, tag_bar::TagBar,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the whole application: header, current screen, status bar and
/// (when toggled) the help overlay.
pub fn render_layout(
    frame: &mut Frame,
    state: &AppState,
    styles: &BoardStyles,
    key_bindings: &KeyBindings,
    board_title: &str,
) {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, vertical_chunks[0], state, styles, board_title);

    match state.screen() {
        Screen::List => render_list_screen(frame, vertical_chunks[1], state, styles, key_bindings),
        Screen::Detail(detail) => render_detail(frame, vertical_chunks[1], detail, styles),
        Screen::Ask(form) => render_ask_form(frame, vertical_chunks[1], form, styles),
    }

    render_status_bar(frame, vertical_chunks[2], state, styles);

    if state.help_visible {
        render_help_overlay(frame, styles);
    }
}

/// Search box, tag bar, question rows and page controls.
fn render_list_screen(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    styles: &BoardStyles,
    key_bindings: &KeyBindings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Length(3), // Tags
            Constraint::Min(0),    // Rows
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    let search = SearchInput::new(state.search_input(), "Search titles", styles)
        .focused(state.focus == FocusPane::Search);
    frame.render_widget(search, chunks[0]);

    let view = state.list().view();
    let tag_cursor = (state.focus == FocusPane::Tags).then(|| state.tag_cursor());
    let tags = TagBar::new(state.tags(), view.selected_tag.as_deref(), styles).cursor(tag_cursor);
    frame.render_widget(tags, chunks[1]);

    let retry = key_bindings.hint_for(KeyAction::Retry);
    let rows = QuestionList::new(state.list(), state.row_cursor(), styles)
        .focused(state.focus == FocusPane::List)
        .retry_keys(retry.as_deref());
    frame.render_widget(rows, chunks[2]);

    frame.render_widget(PaginationBar::new(state.list().pagination(), styles), chunks[3]);
}

/// Keyboard hints for the current screen and focus.
fn build_keyboard_hints(state: &AppState) -> &'static str {
    match state.screen() {
        Screen::List => match state.focus {
            FocusPane::Search => "Enter/Esc: done | Tab: tags",
            FocusPane::Tags => "←/→: choose | Enter: apply | Esc: back",
            FocusPane::List => "/: search | t: tags | Enter: open | a: ask | ?: help | q: quit",
        },
        Screen::Detail(detail) if detail.is_editing() => "Enter: save | Esc: cancel",
        Screen::Detail(_) => "e/T/E: edit | w: answer | Esc: back | ?: help",
        Screen::Ask(_) => "Enter: submit | Esc: cancel",
    }
}

/// Status message if one is set, otherwise keyboard hints.
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, styles: &BoardStyles) {
    let line = match state.status() {
        Some(status) => Line::from(Span::styled(status.text.clone(), styles.status(status.kind))),
        None => Line::from(Span::styled(build_keyboard_hints(state), styles.disabled)),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Board title, current route and active filters.
fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    styles: &BoardStyles,
    board_title: &str,
) {
    let mut spans = vec![
        Span::styled(board_title.to_string(), styles.title),
        Span::styled(format!("  {}", state.route().path()), styles.meta),
    ];
    if matches!(state.screen(), Screen::List) {
        let view = state.list().view();
        if !view.search_term.is_empty() {
            spans.push(Span::raw(format!("  search: \"{}\"", view.search_term)));
        }
        if let Some(tag) = &view.selected_tag {
            spans.push(Span::raw("  tag: "));
            spans.push(Span::styled(format!("#{tag}"), styles.tag));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ===== Tests =====

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
