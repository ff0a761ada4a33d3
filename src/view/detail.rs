//! Question detail screen: question body, answers, inline editor.

use super::editor::TextEditor;
use super::styles::BoardStyles;
use crate::model::format_date;
use crate::state::{DetailState, DetailStatus, EditState};
use crate::store::QuestionDetail;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_markdown::from_str;

/// Height of the inline editor box.
const EDITOR_HEIGHT: u16 = 8;

/// Render markdown with `base_style` under the markdown styling.
fn render_markdown_with_style(markdown_text: &str, base_style: Style) -> Vec<Line<'static>> {
    let text = from_str(markdown_text);

    text.lines
        .into_iter()
        .map(|line| {
            let owned_spans: Vec<_> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.into_owned(), base_style.patch(span.style)))
                .collect();
            Line::from(owned_spans)
        })
        .collect()
}

/// Lines for the question and its answers, plus the line where the
/// highlighted answer starts.
fn detail_lines(
    detail: &QuestionDetail,
    selected: usize,
    styles: &BoardStyles,
) -> (Vec<Line<'static>>, usize) {
    let question = &detail.question;
    let mut lines = vec![Line::from(Span::styled(question.title.clone(), styles.title))];

    let mut meta = vec![Span::styled(
        format!("{} · {}", question.author, format_date(&question.created_at)),
        styles.meta,
    )];
    for tag in question.tags.iter().flatten() {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(format!("#{tag}"), styles.tag));
    }
    lines.push(Line::from(meta));
    lines.push(Line::from(""));
    lines.extend(render_markdown_with_style(&question.content, Style::default()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("── Answers ({}) ──", detail.answers.len()),
        styles.meta,
    )));

    let mut selected_line = 0;
    if detail.answers.is_empty() {
        lines.push(Line::from(Span::styled(
            "No answers yet. Press w to write one.",
            styles.disabled,
        )));
    }
    for (i, answer) in detail.answers.iter().enumerate() {
        lines.push(Line::from(""));
        if i == selected {
            selected_line = lines.len();
        }
        let marker = if i == selected { "▶ " } else { "  " };
        let header_style = if i == selected { styles.selected } else { styles.meta };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}{} · {}",
                answer.author,
                format_date(&answer.created_at)
            ),
            header_style,
        )));
        lines.extend(render_markdown_with_style(&answer.content, Style::default()));
    }
    (lines, selected_line)
}

/// Render the detail screen into `area`.
pub fn render_detail(frame: &mut Frame, area: Rect, state: &DetailState, styles: &BoardStyles) {
    let (body_area, editor_area) = match state.edit() {
        EditState::Editing { .. } => {
            let [body, editor] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(EDITOR_HEIGHT)])
                    .areas(area);
            (body, Some(editor))
        }
        EditState::Viewing => (area, None),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Question {} ", state.id()));
    let body = match state.status() {
        DetailStatus::Loading => Paragraph::new("Loading..."),
        DetailStatus::Failed { message } => Paragraph::new(vec![
            Line::from(Span::styled(message.clone(), styles.error)),
            Line::from(""),
            Line::from(Span::styled("Press r to retry, Esc to go back", styles.disabled)),
        ]),
        DetailStatus::Loaded(detail) => {
            let (lines, selected_line) = detail_lines(detail, state.selected_answer(), styles);
            // Scroll only once the highlighted answer would start near the bottom.
            let inner_height = body_area.height.saturating_sub(2) as usize;
            let offset = selected_line.saturating_sub(inner_height.saturating_sub(4));
            Paragraph::new(lines).scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
        }
    };
    frame.render_widget(body.block(block).wrap(Wrap { trim: false }), body_area);

    if let (
        Some(editor_area),
        EditState::Editing {
            target,
            input,
            saving,
        },
    ) = (editor_area, state.edit())
    {
        let title = format!(" {} · Enter save · Ctrl+j newline · Esc cancel ", target.label());
        let editor = TextEditor::new(input, &title, styles)
            .focused(true)
            .busy(*saving);
        frame.render_widget(editor, editor_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerId, AnswerRow, QuestionId, QuestionRow, StoreError};
    use crate::state::{EditTarget, Effect};
    use crate::test_harness::buffer_to_string;
    use crate::view::styles::ColorConfig;
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn loaded() -> DetailState {
        let id = QuestionId::new("q1").unwrap();
        let (mut state, effect) = DetailState::open(id.clone());
        let Effect::LoadDetail { seq, .. } = effect else {
            panic!("expected a detail load");
        };
        let at = Utc.with_ymd_and_hms(2023, 10, 27, 9, 0, 0).unwrap();
        state.complete(
            seq,
            Ok(QuestionDetail {
                question: QuestionRow {
                    id: id.clone(),
                    title: "Audit scope".to_string(),
                    content: "Which systems are **in scope**?".to_string(),
                    author: "admin".to_string(),
                    tags: Some(vec!["audit".to_string()]),
                    created_at: at,
                    answer_count: Some(1),
                },
                answers: vec![AnswerRow {
                    id: AnswerId::new("a1").unwrap(),
                    question_id: id,
                    author: "bob".to_string(),
                    content: "Production only.".to_string(),
                    created_at: at,
                }],
            }),
        );
        state
    }

    fn render(state: &DetailState) -> String {
        let styles = BoardStyles::with_color_config(ColorConfig::new(false));
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        terminal
            .draw(|frame| render_detail(frame, frame.area(), state, &styles))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn shows_question_and_answers() {
        let text = render(&loaded());
        assert!(text.contains("Audit scope"));
        assert!(text.contains("admin · 2023-10-27 #audit"));
        assert!(text.contains("in scope"));
        assert!(text.contains("Answers (1)"));
        assert!(text.contains("▶ bob · 2023-10-27"));
        assert!(text.contains("Production only."));
    }

    #[test]
    fn editor_opens_below_body_prefilled() {
        let mut state = loaded();
        assert!(state.begin_edit(EditTarget::Title));
        let text = render(&state);
        assert!(text.contains("Edit title"));
        assert!(text.contains("Enter save"));
    }

    #[test]
    fn failed_load_shows_message() {
        let (mut state, effect) = DetailState::open(QuestionId::new("q9").unwrap());
        let Effect::LoadDetail { seq, .. } = effect else {
            panic!("expected a detail load");
        };
        state.complete(seq, Err(StoreError::rejected("timeout")));
        let text = render(&state);
        assert!(text.contains("timeout"));
        assert!(text.contains("Press r to retry"));
    }
}
