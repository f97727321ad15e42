//! Fixed-size pages over an in-memory list.
//!
//! Page numbers are 1-based and always clamped into `[1, total_pages]`, where
//! an empty list still has one (empty) page.

use serde::Serialize;

/// Number of pages needed for `total` items.
#[must_use]
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into the valid range for `total` items.
#[must_use]
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size))
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Current page (1-based, clamped).
    pub page: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Length of the whole list.
    pub total: usize,
    /// Configured page size.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// 1-based index of the first item shown, 0 when empty.
    #[must_use]
    pub fn first_shown(&self) -> usize {
        if self.total == 0 { 0 } else { (self.page - 1) * self.page_size + 1 }
    }

    /// 1-based index of the last item shown, 0 when empty.
    #[must_use]
    pub fn last_shown(&self) -> usize {
        (self.page * self.page_size).min(self.total)
    }

    /// Whether a previous page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Footer text, e.g. `Total 45 terms | Page 2 / 2` and `Showing 31 - 45 terms`.
    #[must_use]
    pub fn summary(&self, noun: &str) -> String {
        format!(
            "Total {} {noun} | Page {} / {}\nShowing {} - {} {noun}",
            self.total,
            self.page,
            self.total_pages,
            self.first_shown(),
            self.last_shown()
        )
    }
}

/// Slice `list` into page `page` of size `page_size`, clamping `page`.
#[must_use]
pub fn paginate<T: Clone>(list: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = list.len();
    let page = clamp_page(page, total, page_size);
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: list[start..end].to_vec(),
        page,
        total_pages: total_pages(total, page_size),
        total,
        page_size,
    }
}

/// Current page plus First/Previous/Next/Last navigation.
///
/// The stored page may run past the end when the list shrinks; every read
/// clamps it against the current total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    /// Pager on page 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, page_size: page_size.max(1) }
    }

    /// Configured page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page clamped for `total` items.
    #[must_use]
    pub fn current(&self, total: usize) -> usize {
        clamp_page(self.page, total, self.page_size)
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Jump to page 1.
    pub fn first(&mut self) {
        self.page = 1;
    }

    /// One page back, stopping at 1.
    pub fn previous(&mut self, total: usize) {
        self.page = self.current(total).saturating_sub(1).max(1);
    }

    /// One page forward, stopping at the last page.
    pub fn next(&mut self, total: usize) {
        self.page = clamp_page(self.current(total) + 1, total, self.page_size);
    }

    /// Jump to the last page.
    pub fn last(&mut self, total: usize) {
        self.page = total_pages(total, self.page_size);
    }

    /// Jump to `page`, clamped.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = clamp_page(page, total, self.page_size);
    }

    /// Page `list` at the current position.
    #[must_use]
    pub fn slice<T: Clone>(&self, list: &[T]) -> Page<T> {
        paginate(list, self.page, self.page_size)
    }
}
