// Pagination Helpers
//
// Page-number parsing and clamping, local slicing for lists the gateway
// returns whole, and the numbered-button window used by the episode list.

use std::ops::RangeInclusive;

/// Page size of the all-anime index.
pub const ANIME_INDEX_PAGE_SIZE: usize = 20;
/// Page size of the episode list on the detail page.
pub const EPISODE_PAGE_SIZE: usize = 25;
/// Number of page buttons shown around the current episode page.
pub const EPISODE_PAGE_WINDOW: u32 = 3;

/// Parse a `page`-style query value. Missing, blank, non-numeric or
/// non-positive values give page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

/// `max(1, min(page, total_pages))`; with no pages at all the result is 1.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.min(total_pages).max(1)
}

pub fn total_pages(item_count: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(item_count.div_ceil(per_page)).unwrap_or(u32::MAX)
}

/// One page of a locally paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPage<'a, T> {
    pub items: &'a [T],
    pub current: u32,
    pub total_pages: u32,
}

impl<T> LocalPage<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

pub fn paginate<T>(items: &[T], requested: u32, per_page: usize) -> LocalPage<'_, T> {
    let total = total_pages(items.len(), per_page);
    let current = clamp_page(requested, total);
    let start = (current as usize - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    LocalPage {
        items: &items[start..end],
        current,
        total_pages: total,
    }
}

/// At most `max_visible` page numbers centred on `current`, shifted to stay
/// inside `1..=total`. Empty when there are no pages.
pub fn page_window(current: u32, total: u32, max_visible: u32) -> RangeInclusive<u32> {
    if total == 0 || max_visible == 0 {
        return 1..=0;
    }

    let current = clamp_page(current, total);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end - start < max_visible - 1 {
        start = end.saturating_sub(max_visible - 1).max(1);
    }
    start..=end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(5, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        // No pages at all still renders page 1.
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_paginate_45_items() {
        let items: Vec<u32> = (0..45).collect();
        assert_eq!(total_pages(items.len(), ANIME_INDEX_PAGE_SIZE), 3);

        let last = paginate(&items, 3, ANIME_INDEX_PAGE_SIZE);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0], 40);
        assert!(last.has_prev());
        assert!(!last.has_next());

        let beyond = paginate(&items, 99, ANIME_INDEX_PAGE_SIZE);
        assert_eq!(beyond.current, 3);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 4, ANIME_INDEX_PAGE_SIZE);
        assert_eq!(page.current, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 10, 3), 1..=3);
        assert_eq!(page_window(5, 10, 3), 4..=6);
        assert_eq!(page_window(10, 10, 3), 8..=10);
        assert_eq!(page_window(2, 2, 3), 1..=2);
        assert_eq!(page_window(1, 1, 3), 1..=1);
        assert!(page_window(1, 0, 3).is_empty());
    }
}
