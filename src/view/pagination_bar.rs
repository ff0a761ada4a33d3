//! Pagination bar: one control per page, hidden for a single page.

use super::styles::BoardStyles;
use crate::state::{LabelSegment, Pagination};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Page controls widget. Draws [`Pagination::label`], styling the current
/// page and any disabled arrow.
pub struct PaginationBar<'a> {
    pagination: Pagination,
    styles: &'a BoardStyles,
}

impl<'a> PaginationBar<'a> {
    /// Bar for `pagination`.
    pub fn new(pagination: Pagination, styles: &'a BoardStyles) -> Self {
        Self { pagination, styles }
    }

    fn span(&self, segment: &LabelSegment) -> Span<'static> {
        let text = segment.text();
        match segment {
            LabelSegment::Page(button) if button.current => Span::styled(text, self.styles.selected),
            _ if !segment.is_enabled() => Span::styled(text, self.styles.disabled),
            _ => Span::raw(text),
        }
    }
}

impl Widget for PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let segments = self.pagination.segments();
        if segments.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(segments.len() * 2);
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(self.span(segment));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Page, PageSize};
    use crate::test_harness::buffer_to_string;
    use crate::view::styles::ColorConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(total: usize, page: u32) -> String {
        let styles = BoardStyles::with_color_config(ColorConfig::new(false));
        let pagination = Pagination::new(total, PageSize::DEFAULT, Page::new(page).unwrap());
        let mut terminal = Terminal::new(TestBackend::new(50, 1)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(PaginationBar::new(pagination, &styles), frame.area()))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn hidden_when_everything_fits_one_page() {
        assert_eq!(render(10, 1), "");
    }

    #[test]
    fn shows_every_page_with_current_marked() {
        insta::assert_snapshot!(render(25, 2).trim_start(), @"‹ prev 1 [2] 3 next ›");
    }

    #[test]
    fn first_page_draws_disabled_prev() {
        insta::assert_snapshot!(render(12, 1).trim_start(), @"· prev [1] 2 next ›");
    }

    #[test]
    fn drawn_text_is_the_label() {
        let pagination = Pagination::new(47, PageSize::DEFAULT, Page::new(4).unwrap());
        assert_eq!(render(47, 4).trim_start(), pagination.label());
    }

    #[test]
    fn current_page_uses_selected_style() {
        let styles = BoardStyles::with_color_config(ColorConfig::new(true));
        let pagination = Pagination::new(25, PageSize::DEFAULT, Page::new(2).unwrap());
        let bar = PaginationBar::new(pagination, &styles);
        let current = LabelSegment::Page(pagination.pages()[1]);
        assert_eq!(bar.span(&current).style, styles.selected);
        let prev = LabelSegment::Prev { enabled: false };
        assert_eq!(bar.span(&prev).style, styles.disabled);
    }
}
