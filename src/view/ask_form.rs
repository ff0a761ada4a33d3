//! Ask-a-question form screen.

use super::editor::TextEditor;
use super::styles::BoardStyles;
use crate::state::{AskField, AskForm};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};

fn field_height(field: AskField) -> Constraint {
    match field {
        AskField::Content => Constraint::Min(5),
        _ => Constraint::Length(3),
    }
}

/// Render the form into `area`.
pub fn render_ask_form(frame: &mut Frame, area: Rect, form: &AskForm, styles: &BoardStyles) {
    let fields = AskField::all();
    let mut constraints: Vec<Constraint> = fields.iter().map(|f| field_height(*f)).collect();
    constraints.push(Constraint::Length(1));
    let areas = Layout::vertical(constraints).split(area);

    for (field, field_area) in fields.iter().zip(areas.iter()) {
        let editor = TextEditor::new(form.field(*field), field.label(), styles)
            .focused(form.focus() == *field)
            .busy(form.is_submitting());
        frame.render_widget(editor, *field_area);
    }

    let hint = if form.is_submitting() {
        Line::styled("Posting...", styles.info)
    } else {
        Line::styled(
            "Tab next field · Shift+Tab previous · Enter submit · Ctrl+j newline · Esc cancel",
            styles.disabled,
        )
    };
    if let Some(hint_area) = areas.last() {
        frame.render_widget(Paragraph::new(hint), *hint_area);
    }
}
