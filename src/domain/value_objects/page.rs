//! Page-number pagination.
//!
//! Page N (1-indexed) holds `page_size` items except the last page, which
//! holds the remainder. An empty collection still has a single, empty page 1.

use serde::Serialize;

/// Why a requested page cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Page number is not a positive integer")]
    Invalid,

    #[error("Page {requested} is out of range (last page is {num_pages})")]
    OutOfRange { requested: u32, num_pages: u32 },
}

/// Parse the `page` query value; absent means the first page.
pub fn parse_page_number(raw: Option<&str>) -> Result<u32, PageError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(value) => match value.parse::<u32>() {
            Ok(0) | Err(_) => Err(PageError::Invalid),
            Ok(n) => Ok(n),
        },
    }
}

/// Splits `total` items into pages of `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: u64,
    page_size: u32,
}

impl Paginator {
    /// `page_size` of zero is treated as one.
    pub fn new(total: u64, page_size: u32) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages; never less than one.
    pub fn num_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size));
        pages.clamp(1, u64::from(u32::MAX)) as u32
    }

    /// Resolve `number` into the slice of items it covers.
    pub fn page(&self, number: u32) -> Result<PageWindow, PageError> {
        if number == 0 {
            return Err(PageError::Invalid);
        }
        let num_pages = self.num_pages();
        if number > num_pages {
            return Err(PageError::OutOfRange {
                requested: number,
                num_pages,
            });
        }

        let offset = u64::from(number - 1) * u64::from(self.page_size);
        let len = (self.total - offset.min(self.total)).min(u64::from(self.page_size)) as u32;

        Ok(PageWindow {
            number,
            num_pages,
            total: self.total,
            offset,
            len,
        })
    }
}

/// The position of one page within a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u32,
    pub num_pages: u32,
    pub total: u64,
    /// Items to skip before this page
    pub offset: u64,
    /// Items on this page
    pub len: u32,
}

impl PageWindow {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }

    pub fn previous_number(&self) -> u32 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_number(&self) -> u32 {
        (self.number + 1).min(self.num_pages)
    }
}

/// A page of items plus its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}
