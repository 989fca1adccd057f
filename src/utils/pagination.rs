//! Pagination state shared by every list-backed screen.
//!
//! Two shapes live here: [`PageInfo`], the pagination block the backend
//! returns with each list page, and [`PaginationState`], the client-held
//! page/page-size/totals record that the list controllers mutate.
//!
//! # Laws
//!
//! - `total_pages = ceil(total_items / page_size)`, with a minimum of 1 so
//!   page-number UI never reads "page 1 of 0".
//! - `current_page` is always within `[1, max(total_pages, 1)]`.
//! - Any page-size change resets `current_page` to 1.

use serde::{Deserialize, Serialize};

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination block of a list response, as the backend sends it.
///
/// ```json
/// { "currentPage": 3, "totalPages": 10, "totalItems": 97 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

/// Snapshot of the pagination state handed to screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

/// Client-held pagination state for one list controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u32,
}

impl PaginationState {
    /// Creates a state at page 1 with no known items. The page size is
    /// clamped to `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            total_items: 0,
            total_pages: 1,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Total number of pages, never less than 1.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
        }
    }

    /// Clamps a requested page number into the currently known range.
    #[must_use]
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    /// Moves to the given page, clamped into range. Returns the page that
    /// was actually selected.
    pub fn set_page(&mut self, page: u32) -> u32 {
        self.current_page = self.clamp_page(page);
        self.current_page
    }

    /// Changes the page size and resets to page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self.current_page = 1;
        self.total_pages = self.computed_total_pages();
    }

    /// Resets to page 1 without touching totals. Used whenever the filter
    /// set changes.
    pub fn reset_page(&mut self) {
        self.current_page = 1;
    }

    /// Adopts the totals reported by a settled page response.
    ///
    /// A reported `totalPages` of 0 is normalized by recomputing from
    /// `totalItems`; either way the result is at least 1. If the new total
    /// leaves `current_page` out of range it is clamped, but no refetch is
    /// triggered here.
    pub fn apply_totals(&mut self, info: &PageInfo) {
        self.total_items = info.total_items;
        self.total_pages = if info.total_pages >= 1 {
            info.total_pages
        } else {
            self.computed_total_pages()
        };
        self.current_page = self.clamp_page(self.current_page);
    }

    fn computed_total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total_items.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_at_page_one() {
        let state = PaginationState::new(10);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.total_items(), 0);
    }

    #[test]
    fn test_page_size_clamped_to_bounds() {
        assert_eq!(PaginationState::new(0).page_size(), 1);
        assert_eq!(PaginationState::new(250).page_size(), 100);
        assert_eq!(PaginationState::new(25).page_size(), 25);
    }

    #[test]
    fn test_set_page_clamps_high() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 3,
            total_items: 25,
        });
        assert_eq!(state.set_page(7), 3);
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_set_page_clamps_low() {
        let mut state = PaginationState::new(10);
        assert_eq!(state.set_page(0), 1);
    }

    #[test]
    fn test_zero_items_reports_one_page() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
        });
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn test_apply_totals_normalizes_missing_total_pages() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 0,
            total_items: 42,
        });
        assert_eq!(state.total_pages(), 5);
    }

    #[test]
    fn test_shrinking_totals_clamps_current_page() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 5,
            total_items: 50,
        });
        state.set_page(5);
        state.apply_totals(&PageInfo {
            current_page: 5,
            total_pages: 2,
            total_items: 15,
        });
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 4,
            total_items: 40,
        });
        state.set_page(3);
        state.set_page_size(20);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn test_summary_mirrors_state() {
        let mut state = PaginationState::new(10);
        state.apply_totals(&PageInfo {
            current_page: 1,
            total_pages: 3,
            total_items: 25,
        });
        state.set_page(2);
        assert_eq!(
            state.summary(),
            PageSummary {
                current_page: 2,
                total_pages: 3,
                total_items: 25,
                page_size: 10,
            }
        );
    }

    #[test]
    fn test_page_info_deserializes_camel_case() {
        let info: PageInfo =
            serde_json::from_str(r#"{"currentPage":2,"totalPages":9,"totalItems":88}"#).unwrap();
        assert_eq!(info.current_page, 2);
        assert_eq!(info.total_pages, 9);
        assert_eq!(info.total_items, 88);
    }
}
