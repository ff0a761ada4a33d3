//! Search input widget for rendering the search bar.

use super::styles::BoardStyles;
use crate::state::TextInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Text box with a visible cursor when focused.
pub struct SearchInput<'a> {
    input: &'a TextInput,
    title: &'a str,
    focused: bool,
    styles: &'a BoardStyles,
}

impl<'a> SearchInput<'a> {
    /// Create new SearchInput widget.
    pub fn new(input: &'a TextInput, title: &'a str, styles: &'a BoardStyles) -> Self {
        Self {
            input,
            title,
            focused: false,
            styles,
        }
    }

    /// Draw the cursor and a highlighted border.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Split `value` around a char-index cursor into (before, at, after).
/// `at` is a space when the cursor sits past the end.
pub(crate) fn split_at_cursor(value: &str, cursor: usize) -> (String, String, String) {
    let before: String = value.chars().take(cursor).collect();
    let mut rest = value.chars().skip(cursor);
    let at = rest
        .next()
        .map(|c| if c == '\n' { ' ' } else { c })
        .unwrap_or(' ')
        .to_string();
    (before, at, rest.collect())
}

/// Drop leading chars of `before` until it and the cursor cell fit in
/// `columns` terminal columns. Widths are display widths, so Hangul and
/// other wide chars count twice.
pub(crate) fn scroll_to_cursor(before: &str, at: &str, columns: usize) -> String {
    let budget = columns.saturating_sub(at.width());
    let mut width = before.width();
    let mut chars = before.chars();
    while width > budget {
        match chars.next() {
            Some(c) => width -= c.width().unwrap_or(0),
            None => break,
        }
    }
    chars.as_str().to_string()
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let value = self.input.value();
        let line = if self.focused {
            let (before, at, after) = split_at_cursor(value, self.input.cursor());
            let before = scroll_to_cursor(&before, &at, area.width.saturating_sub(2) as usize);
            Line::from(vec![
                Span::raw(before),
                Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(after),
            ])
        } else if value.is_empty() {
            Line::from(Span::styled("press / to search", self.styles.disabled))
        } else {
            Line::from(value.to_string())
        };

        let border = if self.focused {
            self.styles.focused_border
        } else {
            Style::default()
        };
        Paragraph::new(line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title)
                    .border_style(border),
            )
            .render(area, buf);
    }
}
