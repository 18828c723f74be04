//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to store offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let limit = i64::from(page_size);

        Ok((offset, limit))
    }

    /// Number of pages needed for `total_items`.
    pub fn total_pages(&self, total_items: i64) -> u32 {
        let page_size = i64::from(self.page_size().max(1));
        u32::try_from((total_items.max(0) + page_size - 1) / page_size).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let (offset, limit) = params(None, None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(limit, 25);
    }

    #[test]
    fn test_page_2_with_default_size() {
        let (offset, limit) = params(Some(2), None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 25);
        assert_eq!(limit, 25);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).validate_and_get_offset_limit().is_err());
        assert!(params(None, Some(1)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(100)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(101)).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(params(None, Some(10)).total_pages(0), 0);
        assert_eq!(params(None, Some(10)).total_pages(10), 1);
        assert_eq!(params(None, Some(10)).total_pages(11), 2);
    }

    #[test]
    fn test_parses_from_query_strings() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"page": "3", "page_size": "50"}"#).unwrap();
        assert_eq!(p.page, Some(3));
        assert_eq!(p.page_size, Some(50));
    }
}
