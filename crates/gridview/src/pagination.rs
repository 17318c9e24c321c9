//! Page cursor and slicing.

use serde::{Deserialize, Serialize};

/// Current page and page size. Pages are 1-based.
///
/// Both fields are at least 1, including after deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CursorFields")]
pub struct PageCursor {
    current_page: usize,
    page_size: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CursorFields {
    current_page: usize,
    page_size: usize,
}

impl From<CursorFields> for PageCursor {
    fn from(fields: CursorFields) -> Self {
        PageCursor {
            current_page: fields.current_page.max(1),
            page_size: fields.page_size.max(1),
        }
    }
}

/// 1-based bounds of the rows shown on a page, for "showing x-y of z" text.
///
/// `first` and `last` are both 0 when there are no rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl PageCursor {
    /// A cursor on page 1. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        PageCursor {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` rows; 0 when there are none.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Moves to `page` if it exists. Returns `true` if the page changed.
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page < 1 || page > self.total_pages(total) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self, total: usize) -> bool {
        self.go_to(self.current_page + 1, total)
    }

    pub fn previous(&mut self, total: usize) -> bool {
        self.current_page > 1 && self.go_to(self.current_page - 1, total)
    }

    pub fn first(&mut self, total: usize) -> bool {
        self.go_to(1, total)
    }

    pub fn last(&mut self, total: usize) -> bool {
        self.go_to(self.total_pages(total), total)
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        let changed = page_size != self.page_size || self.current_page != 1;
        self.page_size = page_size;
        self.current_page = 1;
        changed
    }

    /// Returns to page 1.
    pub fn reset(&mut self) -> bool {
        let changed = self.current_page != 1;
        self.current_page = 1;
        changed
    }

    /// Pulls the cursor back into `[1, total_pages]` after the row count
    /// shrank.
    pub fn clamp(&mut self, total: usize) -> bool {
        let clamped = self.current_page.min(self.total_pages(total)).max(1);
        let changed = clamped != self.current_page;
        self.current_page = clamped;
        changed
    }

    /// Index range of the current page within `total` rows.
    pub fn bounds(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.current_page - 1).saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Display bounds of the current page.
    pub fn page_range(&self, total: usize) -> PageRange {
        let bounds = self.bounds(total);
        if bounds.is_empty() {
            return PageRange {
                first: 0,
                last: 0,
                total,
            };
        }
        PageRange {
            first: bounds.start + 1,
            last: bounds.end,
            total,
        }
    }
}

/// The rows on the current page, or all of them when pagination is off.
pub fn apply_pagination<I: Copy>(items: &[I], cursor: &PageCursor, enabled: bool) -> Vec<I> {
    if !enabled {
        return items.to_vec();
    }
    items[cursor.bounds(items.len())].to_vec()
}
