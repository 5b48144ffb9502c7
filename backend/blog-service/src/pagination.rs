/// Pagination helpers: query-string parsing and navigation metadata.
///
/// `page`/`limit` arrive as raw strings so that non-numeric input degrades to
/// the defaults (page 1, limit 10) instead of a deserialization failure.
/// `limit` is clamped to [1, 50] and `page` to >= 1.
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Raw `page`/`limit` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageQuery {
    pub fn options(&self) -> PageOptions {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.max(1))
            .unwrap_or(1);

        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| l.clamp(1, MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);

        PageOptions {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }
}

/// Navigation metadata attached to paginated responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
}

impl PaginationMeta {
    pub fn new(total_count: i64, options: PageOptions) -> Self {
        let total_pages = ((total_count + options.limit - 1) / options.limit).max(1);
        let has_next_page = options.page < total_pages;
        let has_prev_page = options.page > 1;

        Self {
            current_page: options.page,
            total_pages,
            total_count,
            limit: options.limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| options.page + 1),
            prev_page: has_prev_page.then(|| options.page - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn defaults_when_absent() {
        let opts = query(None, None).options();
        assert_eq!(opts, PageOptions { page: 1, limit: 10, offset: 0 });
    }

    #[test]
    fn non_numeric_input_falls_back_to_defaults() {
        let opts = query(Some("abc"), Some("xyz")).options();
        assert_eq!(opts.page, 1);
        assert_eq!(opts.limit, 10);
    }

    #[test]
    fn limit_clamped_to_bounds() {
        assert_eq!(query(None, Some("500")).options().limit, 50);
        assert_eq!(query(None, Some("0")).options().limit, 1);
        assert_eq!(query(None, Some("-3")).options().limit, 1);
    }

    #[test]
    fn page_clamped_to_minimum() {
        assert_eq!(query(Some("0"), None).options().page, 1);
        assert_eq!(query(Some("-7"), None).options().page, 1);
    }

    #[test]
    fn offset_is_derived_from_page_and_limit() {
        let opts = query(Some("3"), Some("20")).options();
        assert_eq!(opts.offset, 40);
    }

    #[test]
    fn meta_counts_pages() {
        let meta = PaginationMeta::new(45, query(Some("2"), Some("10")).options());
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.current_page, 2);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.next_page, Some(3));
        assert_eq!(meta.prev_page, Some(1));
    }

    #[test]
    fn meta_has_next_iff_current_below_total() {
        let last = PaginationMeta::new(45, query(Some("5"), Some("10")).options());
        assert!(!last.has_next_page);
        assert_eq!(last.next_page, None);

        let beyond = PaginationMeta::new(45, query(Some("9"), Some("10")).options());
        assert!(!beyond.has_next_page);
        assert!(beyond.has_prev_page);
    }

    #[test]
    fn meta_empty_result_set_still_has_one_page() {
        let meta = PaginationMeta::new(0, query(None, None).options());
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
        assert_eq!(meta.next_page, None);
        assert_eq!(meta.prev_page, None);
    }
}
