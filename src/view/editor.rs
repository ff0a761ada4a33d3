//! Multi-line text box shared by the inline editors and the ask form.

use super::search_input::split_at_cursor;
use super::styles::BoardStyles;
use crate::state::TextInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Bordered editor; shows a block cursor when focused.
pub struct TextEditor<'a> {
    input: &'a TextInput,
    title: &'a str,
    focused: bool,
    busy: bool,
    styles: &'a BoardStyles,
}

impl<'a> TextEditor<'a> {
    /// Editor over `input` with a bordered title.
    pub fn new(input: &'a TextInput, title: &'a str, styles: &'a BoardStyles) -> Self {
        Self {
            input,
            title,
            focused: false,
            busy: false,
            styles,
        }
    }

    /// Highlight the border and show the cursor.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Dim the text while a save is in flight.
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }
}

/// Lines of `input` with the cursor cell reversed.
fn lines_with_cursor(input: &TextInput) -> Vec<Line<'static>> {
    let (before, at, after) = split_at_cursor(input.value(), input.cursor());
    let cursor_on_newline = input.value().chars().nth(input.cursor()) == Some('\n');

    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let push_text = |lines: &mut Vec<Vec<Span<'static>>>, text: &str| {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !part.is_empty() {
                if let Some(last) = lines.last_mut() {
                    last.push(Span::raw(part.to_string()));
                }
            }
        }
    };
    push_text(&mut lines, &before);
    if let Some(last) = lines.last_mut() {
        last.push(Span::styled(
            at,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    if cursor_on_newline {
        lines.push(Vec::new());
    }
    push_text(&mut lines, &after);
    lines.into_iter().map(Line::from).collect()
}

impl Widget for TextEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = if self.focused && !self.busy {
            lines_with_cursor(self.input)
        } else {
            self.input
                .value()
                .split('\n')
                .map(|l| Line::from(l.to_string()))
                .collect()
        };
        if self.busy {
            lines = lines
                .into_iter()
                .map(|l| l.style(self.styles.disabled))
                .collect();
        }
        let title = if self.busy {
            format!("{} (saving...)", self.title)
        } else {
            self.title.to_string()
        };
        let border = if self.focused {
            self.styles.focused_border
        } else {
            Style::default()
        };
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border),
            )
            .render(area, buf);
    }
}
