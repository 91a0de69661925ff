//! Page arithmetic for the message list

use serde::Serialize;

/// Number of page links shown around the current page
pub const WINDOW_SIZE: u32 = 5;

/// Pages needed for `total_items` at `page_size` per page
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX)) as u32
}

/// The slice of `items` shown on 1-based `page`
pub fn slice_page<T>(items: &[T], page: u32, page_size: u32) -> &[T] {
    let size = page_size as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Page links to render for a pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Consecutive page numbers around the current page
    pub pages: Vec<u32>,
    /// Link to page 1 shown before the window
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    /// Link to the last page shown after the window
    pub show_last: bool,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Pager layout for `current` of `total` pages, or None when there is
/// at most one page
pub fn page_window(current: u32, total: u32) -> Option<PageWindow> {
    if total <= 1 {
        return None;
    }

    let mut start = current.saturating_sub(2).max(1);
    let end = (start + WINDOW_SIZE - 1).min(total);
    if end == total {
        start = end.saturating_sub(WINDOW_SIZE - 1).max(1);
    }

    Some(PageWindow {
        pages: (start..=end).collect(),
        show_first: start > 1,
        leading_ellipsis: start > 2,
        trailing_ellipsis: end + 1 < total,
        show_last: end < total,
        has_previous: current > 1,
        has_next: current < total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_slice_page() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(slice_page(&items, 1, 10), &items[0..10]);
        assert_eq!(slice_page(&items, 3, 10), &[21, 22, 23]);
        assert!(slice_page(&items, 4, 10).is_empty());
        assert_eq!(slice_page(&items, 0, 10), &items[0..10]);
    }

    #[test]
    fn test_single_page_has_no_window() {
        assert_eq!(page_window(1, 0), None);
        assert_eq!(page_window(1, 1), None);
    }

    #[test]
    fn test_window_at_start() {
        let window = page_window(1, 12).unwrap();
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(!window.leading_ellipsis);
        assert!(window.trailing_ellipsis);
        assert!(window.show_last);
        assert!(!window.has_previous);
        assert!(window.has_next);
    }

    #[test]
    fn test_window_in_middle() {
        let window = page_window(6, 12).unwrap();
        assert_eq!(window.pages, vec![4, 5, 6, 7, 8]);
        assert!(window.show_first);
        assert!(window.leading_ellipsis);
        assert!(window.show_last);
    }

    #[test]
    fn test_window_at_end_shifts_back() {
        let window = page_window(12, 12).unwrap();
        assert_eq!(window.pages, vec![8, 9, 10, 11, 12]);
        assert!(!window.show_last);
        assert!(!window.trailing_ellipsis);
        assert!(!window.has_next);

        let window = page_window(2, 3).unwrap();
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(!window.show_first);
    }

    #[test]
    fn test_window_last_page_adjacent_has_no_ellipsis() {
        let window = page_window(1, 6).unwrap();
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(window.show_last);
        assert!(!window.trailing_ellipsis);
    }
}
