//! List-view query builder (pure).
//!
//! Translates `(search term, tag, page, page size)` into a store query
//! descriptor: filter predicates, a deterministic sort, an inclusive row range,
//! and a paired count query with identical filters. Nothing here talks to a
//! store; the controller executes what this module describes.

use crate::model::ValidationError;
use std::fmt;

// ===== Page =====

/// 1-based page number. Never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Page(u32);

impl Page {
    /// The first page.
    pub const FIRST: Page = Page(1);

    /// Smart constructor: rejects 0.
    pub fn new(n: u32) -> Result<Self, ValidationError> {
        if n == 0 {
            Err(ValidationError::PageOutOfRange)
        } else {
            Ok(Self(n))
        }
    }

    /// Raw page number.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The following page.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding page, or `None` on the first page.
    pub fn prev(self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== PageSize =====

/// Rows per page. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(u32);

impl PageSize {
    /// Page size used when nothing is configured.
    pub const DEFAULT: PageSize = PageSize(10);

    /// Smart constructor: rejects 0.
    pub fn new(n: u32) -> Result<Self, ValidationError> {
        if n == 0 {
            Err(ValidationError::ZeroPageSize)
        } else {
            Ok(Self(n))
        }
    }

    /// Raw size.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Size as a slice length.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ===== RowRange =====

/// Zero-indexed inclusive row offsets of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row offset (inclusive).
    pub from: usize,
    /// Last row offset (inclusive).
    pub to: usize,
}

impl RowRange {
    /// Range of `page`: `[(page-1)*size, page*size - 1]`.
    pub fn for_page(page: Page, size: PageSize) -> Self {
        let size = size.as_usize();
        let from = (page.get() as usize - 1) * size;
        Self {
            from,
            to: from + size - 1,
        }
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }

    /// Never empty; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// ===== Filter =====

/// Row predicates shared by the page query and the count query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Case-insensitive substring the title must contain. `None` matches all.
    pub title_contains: Option<String>,
    /// Tag the row's tag set must contain exactly. `None` matches all.
    pub has_tag: Option<String>,
}

impl QuestionFilter {
    /// Build a filter from raw view state. The exactly-empty term disables
    /// the title predicate; whitespace is searched literally.
    pub fn new(search_term: &str, tag: Option<&str>) -> Self {
        Self {
            title_contains: (!search_term.is_empty()).then(|| search_term.to_string()),
            has_tag: tag.map(str::to_string),
        }
    }

    /// True when neither predicate is set.
    pub fn is_unfiltered(&self) -> bool {
        self.title_contains.is_none() && self.has_tag.is_none()
    }

    /// Evaluate the predicates against a row. Used by in-process stores.
    pub fn matches(&self, title: &str, tags: &[String]) -> bool {
        let title_ok = self
            .title_contains
            .as_deref()
            .is_none_or(|needle| title_contains_ignore_case(title, needle));
        let tag_ok = self
            .has_tag
            .as_deref()
            .is_none_or(|wanted| tags.iter().any(|t| t == wanted));
        title_ok && tag_ok
    }
}

/// Case-insensitive substring test.
pub fn title_contains_ignore_case(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(&needle.to_lowercase())
}

// ===== Sort =====

/// Sortable question columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Creation timestamp.
    CreatedAt,
    /// Opaque row identifier, compared lexicographically.
    Id,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Column.
    pub field: SortField,
    /// Direction.
    pub direction: SortDirection,
}

/// Newest first, ties broken by identifier descending.
pub const LIST_ORDER: [SortKey; 2] = [
    SortKey {
        field: SortField::CreatedAt,
        direction: SortDirection::Descending,
    },
    SortKey {
        field: SortField::Id,
        direction: SortDirection::Descending,
    },
];

// ===== Queries =====

/// Query for one page of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Row predicates.
    pub filter: QuestionFilter,
    /// Sort keys, most significant first.
    pub order: Vec<SortKey>,
    /// Rows to return.
    pub range: RowRange,
}

/// Query for the number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    /// Row predicates; always identical to the paired page query's.
    pub filter: QuestionFilter,
}

/// A page query and its count query, executed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Rows of the requested page.
    pub rows: PageQuery,
    /// Total matching rows.
    pub count: CountQuery,
}

/// Build the query pair for one list view state.
pub fn build_list_query(
    search_term: &str,
    tag: Option<&str>,
    page: Page,
    page_size: PageSize,
) -> ListQuery {
    let filter = QuestionFilter::new(search_term, tag);
    ListQuery {
        rows: PageQuery {
            filter: filter.clone(),
            order: LIST_ORDER.to_vec(),
            range: RowRange::for_page(page, page_size),
        },
        count: CountQuery { filter },
    }
}
