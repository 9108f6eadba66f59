//! Paginate stage: slice one fixed-size page out of the sorted list.

/// Return page `page` (1-based) of `items`.
///
/// The page covers `[(page-1)*page_size, (page-1)*page_size + page_size)`
/// clipped to the list. `page` is not clamped: page `0` or a page past the
/// end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = match page.checked_sub(1) {
        Some(p) => p.saturating_mul(page_size),
        None => return &[],
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
