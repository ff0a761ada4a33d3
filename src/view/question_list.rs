//! Question rows of the list screen.
//!
//! Loading, empty and error states render distinctly. The error state shows
//! only the store message and a retry hint, never stale rows.

use super::styles::BoardStyles;
use crate::model::QuestionSummary;
use crate::state::{FetchStatus, ListController};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

/// Question list widget.
pub struct QuestionList<'a> {
    controller: &'a ListController,
    cursor: usize,
    focused: bool,
    retry_keys: Option<&'a str>,
    styles: &'a BoardStyles,
}

impl<'a> QuestionList<'a> {
    /// List over the controller's current view.
    pub fn new(controller: &'a ListController, cursor: usize, styles: &'a BoardStyles) -> Self {
        Self {
            controller,
            cursor,
            focused: true,
            retry_keys: None,
            styles,
        }
    }

    /// Whether the row highlight is drawn.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Keys shown in the retry hint of the error state.
    pub fn retry_keys(mut self, keys: Option<&'a str>) -> Self {
        self.retry_keys = keys;
        self
    }
}

fn retry_hint(keys: Option<&str>) -> String {
    match keys {
        Some(keys) => format!("Press {keys} to retry"),
        None => "Retry has no key bound".to_string(),
    }
}

fn block_title(controller: &ListController) -> String {
    let view = controller.view();
    match controller.status() {
        FetchStatus::Loading => " Questions (loading...) ".to_string(),
        FetchStatus::Loaded => format!(" Questions ({}) ", view.total_count),
        _ => " Questions ".to_string(),
    }
}

/// Two-line entry: title, then author, date, answer count and tags.
fn row_item<'a>(row: &'a QuestionSummary, styles: &BoardStyles) -> ListItem<'a> {
    let mut meta = vec![
        Span::styled(row.author.as_str(), styles.meta),
        Span::styled(" · ", styles.meta),
        Span::styled(row.created.as_str(), styles.meta),
        Span::styled(format!(" · answers {}", row.answer_count), styles.meta),
    ];
    for tag in &row.tags {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(format!("#{tag}"), styles.tag));
    }
    ListItem::new(vec![
        Line::from(Span::styled(row.title.as_str(), styles.title)),
        Line::from(meta),
    ])
}

impl Widget for QuestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(block_title(self.controller));
        let rows = &self.controller.view().rows;

        let message = match self.controller.status() {
            FetchStatus::Failed { message } => Some(vec![
                Line::from(Span::styled(message.as_str(), self.styles.error)),
                Line::from(""),
                Line::from(Span::styled(retry_hint(self.retry_keys), self.styles.disabled)),
            ]),
            FetchStatus::Idle => Some(vec![Line::from("")]),
            FetchStatus::Loading if rows.is_empty() => Some(vec![Line::from("Loading...")]),
            FetchStatus::Loaded if rows.is_empty() => Some(vec![Line::from(Span::styled(
                "No questions found.",
                self.styles.disabled,
            ))]),
            _ => None,
        };
        if let Some(lines) = message {
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = rows.iter().map(|r| row_item(r, self.styles)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(self.styles.selected)
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if self.focused {
            state.select(Some(self.cursor.min(rows.len().saturating_sub(1))));
        }
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyBindings;
    use crate::model::{KeyAction, QuestionId, QuestionRow, StoreError};
    use crate::query::PageSize;
    use crate::store::PageResult;
    use crate::test_harness::buffer_to_string;
    use crate::view::styles::ColorConfig;
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::collections::HashMap;

    fn render(controller: &ListController) -> String {
        render_with_keys(controller, &KeyBindings::default())
    }

    fn render_with_keys(controller: &ListController, bindings: &KeyBindings) -> String {
        let styles = BoardStyles::with_color_config(ColorConfig::new(false));
        let retry = bindings.hint_for(KeyAction::Retry);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| {
                let list = QuestionList::new(controller, 0, &styles).retry_keys(retry.as_deref());
                frame.render_widget(list, frame.area());
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    fn row(title: &str) -> QuestionRow {
        QuestionRow {
            id: QuestionId::new(title).unwrap(),
            title: title.to_string(),
            content: String::new(),
            author: "admin".to_string(),
            tags: Some(vec!["audit".to_string()]),
            created_at: Utc.with_ymd_and_hms(2023, 10, 27, 9, 0, 0).unwrap(),
            answer_count: Some(2),
        }
    }

    fn completed(result: Result<PageResult, StoreError>) -> ListController {
        let mut c = ListController::new(PageSize::DEFAULT);
        let req = c.mount();
        c.complete(req.seq, result);
        c
    }

    #[test]
    fn loading_state_before_first_response() {
        let mut c = ListController::new(PageSize::DEFAULT);
        c.mount();
        assert!(render(&c).contains("Loading..."));
    }

    #[test]
    fn rows_show_title_author_date_count_and_tags() {
        let c = completed(Ok(PageResult {
            rows: vec![row("SOC 2 readiness")],
            total_count: 1,
        }));
        let text = render(&c);
        assert!(text.contains("SOC 2 readiness"));
        assert!(text.contains("admin · 2023-10-27 · answers 2 #audit"));
        assert!(text.contains("Questions (1)"));
    }

    #[test]
    fn empty_result_shows_empty_state() {
        let c = completed(Ok(PageResult {
            rows: vec![],
            total_count: 0,
        }));
        assert!(render(&c).contains("No questions found."));
    }

    #[test]
    fn error_state_shows_only_message_and_retry_hint() {
        let c = completed(Err(StoreError::rejected("connection refused")));
        let text = render(&c);
        assert!(text.contains("connection refused"));
        assert!(text.contains("Press r to retry"));
        assert!(!text.contains("answers"));
    }

    #[test]
    fn retry_hint_names_remapped_key() {
        let overrides = HashMap::from([("retry".to_string(), vec!["ctrl+r".to_string()])]);
        let bindings = KeyBindings::with_overrides(&overrides).unwrap();
        let c = completed(Err(StoreError::rejected("connection refused")));
        let text = render_with_keys(&c, &bindings);
        assert!(text.contains("Press Ctrl+r to retry"));
        assert!(!text.contains("Press r to retry"));
    }

    #[test]
    fn retry_hint_when_unbound() {
        let overrides = HashMap::from([("retry".to_string(), vec![])]);
        let bindings = KeyBindings::with_overrides(&overrides).unwrap();
        let c = completed(Err(StoreError::rejected("connection refused")));
        assert!(render_with_keys(&c, &bindings).contains("Retry has no key bound"));
    }
}
