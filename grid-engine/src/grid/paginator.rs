/// One page of an ordered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    pub page_count: usize,
}

/// Number of pages for `total` rows; never less than 1.
/// A page size of 0 means pagination is disabled.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Clamp a 1-based page index into `[1, page_count]`
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Slice page `page_index` (1-based) out of `items`.
///
/// Does not clamp: callers keep `page_index` within `[1, page_count]`.
/// An index outside that range yields an empty page.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> Page<'_, T> {
    let count = page_count(items.len(), page_size);
    if page_size == 0 {
        return Page {
            rows: items,
            page_count: count,
        };
    }

    let start = page_index.saturating_sub(1).saturating_mul(page_size);
    let rows = if page_index == 0 || start >= items.len() {
        &items[0..0]
    } else {
        let end = start.saturating_add(page_size).min(items.len());
        &items[start..end]
    };

    Page {
        rows,
        page_count: count,
    }
}

/// Navigation facts about the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

impl PageInfo {
    pub fn new(current_page: usize, page_size: usize, total_rows: usize) -> Self {
        let count = page_count(total_rows, page_size);
        Self {
            current_page: clamp_page(current_page, count),
            page_count: count,
            page_size,
            total_rows,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    /// 1-based ordinal of the first row on the page, 0 when there are no rows
    pub fn first_row(&self) -> usize {
        if self.total_rows == 0 {
            return 0;
        }
        if self.page_size == 0 {
            return 1;
        }
        (self.current_page - 1) * self.page_size + 1
    }

    /// 1-based ordinal of the last row on the page, 0 when there are no rows
    pub fn last_row(&self) -> usize {
        if self.total_rows == 0 {
            return 0;
        }
        if self.page_size == 0 {
            return self.total_rows;
        }
        (self.current_page * self.page_size).min(self.total_rows)
    }
}
