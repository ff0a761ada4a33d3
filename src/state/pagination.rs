//! Pagination presenter (pure).
//!
//! Derives page controls from the total matching count. Every page gets its
//! own control; there is no windowing or ellipsis.

use crate::query::{Page, PageSize};

/// Page controls for one result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_count: usize,
    page_size: PageSize,
    current_page: Page,
}

/// One page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    /// Page this control jumps to.
    pub page: Page,
    /// Whether it is the page being shown.
    pub current: bool,
}

impl Pagination {
    /// Controls for `total_count` rows split into pages of `page_size`.
    pub fn new(total_count: usize, page_size: PageSize, current_page: Page) -> Self {
        Self {
            total_count,
            page_size,
            current_page,
        }
    }

    /// `ceil(total_count / page_size)`; 0 when there are no rows.
    pub fn page_count(&self) -> u32 {
        let size = self.page_size.as_usize();
        let pages = self.total_count.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Controls are shown only when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_count > self.page_size.as_usize()
    }

    /// "Previous" is enabled past the first page.
    pub fn prev_enabled(&self) -> bool {
        self.current_page.get() > 1
    }

    /// "Next" is enabled before the last page.
    pub fn next_enabled(&self) -> bool {
        self.current_page.get() < self.page_count()
    }

    /// Page being shown.
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    /// Last page, if any rows exist.
    pub fn last_page(&self) -> Option<Page> {
        Page::new(self.page_count()).ok()
    }

    /// Whether `page` exists in this result set.
    pub fn contains(&self, page: Page) -> bool {
        page.get() <= self.page_count()
    }

    /// One control per page, `1..=page_count`.
    pub fn pages(&self) -> Vec<PageButton> {
        (1..=self.page_count())
            .filter_map(|n| Page::new(n).ok())
            .map(|page| PageButton {
                page,
                current: page == self.current_page,
            })
            .collect()
    }

    /// Pieces of the bar in display order: prev, every page, next. Empty
    /// when the controls are hidden.
    pub fn segments(&self) -> Vec<LabelSegment> {
        if !self.is_visible() {
            return Vec::new();
        }
        let mut segments = Vec::with_capacity(self.page_count() as usize + 2);
        segments.push(LabelSegment::Prev {
            enabled: self.prev_enabled(),
        });
        segments.extend(self.pages().into_iter().map(LabelSegment::Page));
        segments.push(LabelSegment::Next {
            enabled: self.next_enabled(),
        });
        segments
    }

    /// Text of the bar: `‹ prev 1 [2] 3 next ›`, with a disabled arrow
    /// drawn as `·`. Empty when the controls are hidden.
    pub fn label(&self) -> String {
        self.segments()
            .iter()
            .map(LabelSegment::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One piece of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSegment {
    /// "Previous" control.
    Prev {
        /// Whether there is a previous page.
        enabled: bool,
    },
    /// A page control.
    Page(PageButton),
    /// "Next" control.
    Next {
        /// Whether there is a next page.
        enabled: bool,
    },
}

impl LabelSegment {
    /// Display text of this piece.
    pub fn text(&self) -> String {
        match self {
            LabelSegment::Prev { enabled: true } => "‹ prev".to_string(),
            LabelSegment::Prev { enabled: false } => "· prev".to_string(),
            LabelSegment::Page(button) if button.current => format!("[{}]", button.page),
            LabelSegment::Page(button) => button.page.to_string(),
            LabelSegment::Next { enabled: true } => "next ›".to_string(),
            LabelSegment::Next { enabled: false } => "next ·".to_string(),
        }
    }

    /// Whether the control can be used.
    pub fn is_enabled(&self) -> bool {
        match self {
            LabelSegment::Prev { enabled } | LabelSegment::Next { enabled } => *enabled,
            LabelSegment::Page(_) => true,
        }
    }
}
