//! Page windowing for list operations.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A 1-based page request.
///
/// Values are taken as given; no upper bound applies to `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Offset and length of a page within the ordered record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// The window this request selects.
    ///
    /// `None` for a non-positive page number or size, and for offsets that
    /// do not fit in memory; such requests select an empty page.
    pub fn window(&self) -> Option<PageWindow> {
        if self.page_number < 1 || self.page_size < 1 {
            return None;
        }
        let offset = (self.page_number - 1).checked_mul(self.page_size)?;
        Some(PageWindow {
            offset: usize::try_from(offset).ok()?,
            limit: usize::try_from(self.page_size).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let window = PageRequest::default().window().unwrap();
        assert_eq!(window, PageWindow { offset: 0, limit: 10 });
    }

    #[test]
    fn test_offset() {
        let window = PageRequest::new(3, 25).window().unwrap();
        assert_eq!(window.offset, 50);
        assert_eq!(window.limit, 25);
    }

    #[test]
    fn test_non_positive_parameters_select_nothing() {
        assert!(PageRequest::new(0, 10).window().is_none());
        assert!(PageRequest::new(-2, 10).window().is_none());
        assert!(PageRequest::new(1, 0).window().is_none());
        assert!(PageRequest::new(1, -5).window().is_none());
    }

    #[test]
    fn test_overflowing_offset_selects_nothing() {
        assert!(PageRequest::new(i64::MAX, i64::MAX).window().is_none());
    }

    #[test]
    fn test_missing_query_fields_use_defaults() {
        let page: PageRequest = serde_json::from_str(r#"{"pageSize": 3}"#).unwrap();
        assert_eq!(page, PageRequest::new(1, 3));
    }

    proptest! {
        #[test]
        fn prop_consecutive_pages_are_adjacent(page in 1i64..10_000, size in 1i64..10_000) {
            let this = PageRequest::new(page, size).window().unwrap();
            let next = PageRequest::new(page + 1, size).window().unwrap();
            prop_assert_eq!(this.offset + this.limit, next.offset);
            prop_assert_eq!(this.limit, size as usize);
        }
    }
}
