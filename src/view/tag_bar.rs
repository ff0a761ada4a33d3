//! Tag bar: "All" followed by every tag in the universe.

use super::styles::BoardStyles;
use crate::state::TagUniverse;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Label of the "no tag filter" option.
pub const ALL_TAGS_LABEL: &str = "All";

/// Tag selector widget.
pub struct TagBar<'a> {
    tags: &'a TagUniverse,
    selected: Option<&'a str>,
    /// Cursor position when the bar has focus (0 = All).
    cursor: Option<usize>,
    styles: &'a BoardStyles,
}

impl<'a> TagBar<'a> {
    /// Bar over every known tag, highlighting `selected`.
    pub fn new(tags: &'a TagUniverse, selected: Option<&'a str>, styles: &'a BoardStyles) -> Self {
        Self {
            tags,
            selected,
            cursor: None,
            styles,
        }
    }

    /// Show the cursor at `position`.
    pub fn cursor(mut self, position: Option<usize>) -> Self {
        self.cursor = position;
        self
    }
}

impl Widget for TagBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let options =
            std::iter::once(ALL_TAGS_LABEL).chain(self.tags.tags().iter().map(String::as_str));
        let mut spans = Vec::new();
        for (i, label) in options.enumerate() {
            let is_selected = match self.selected {
                None => i == 0,
                Some(tag) => i > 0 && tag == label,
            };
            let mut style = if i == 0 { Style::default() } else { self.styles.tag };
            if is_selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            if self.cursor == Some(i) {
                style = style.patch(self.styles.selected);
            }
            spans.push(Span::styled(format!(" {label} "), style));
        }
        let border = if self.cursor.is_some() {
            self.styles.focused_border
        } else {
            Style::default()
        };
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Tags")
                    .border_style(border),
            )
            .render(area, buf);
    }
}
