/// Pagination metadata for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// As requested; may lie beyond `total_pages`.
    pub page: u64,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Computes page bounds. The page number is not clamped to `total_pages`.
pub fn compute_paging(total_count: u64, page_size: u32, page: u64) -> Paging {
    let page_size = page_size.max(1);
    let total_pages = total_count.div_ceil(u64::from(page_size));

    Paging {
        page,
        page_size,
        total_count,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}
