//! Pagination, filtering, and sorting for list endpoints.
//!
//! Every collection endpoint accepts the same query-parameter vocabulary
//! (`page`, `page_size`, `search`, `sort`, `order`, plus per-resource field
//! filters) and answers with a counted page, so one pair of types covers all
//! of them.

use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Parse from user input; unknown values default to ascending.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "desc" | "descending" | "down" => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for a list request.
///
/// Pages are 1-based, matching what the backend expects and what the screens
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// Free-text search over the resource's searchable fields.
    pub search: Option<String>,
    /// Field to sort by, server-side.
    pub sort: Option<String>,
    /// Direction for `sort`; ignored by the server when `sort` is unset.
    pub order: SortOrder,
    /// Per-resource field filters, sent verbatim as query parameters.
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort: None,
            order: SortOrder::Asc,
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = order;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Serialize into query parameters for `reqwest::RequestBuilder::query`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(ref search) = self.search {
            if !search.is_empty() {
                pairs.push(("search".to_string(), search.clone()));
            }
        }
        if let Some(ref sort) = self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
            pairs.push(("order".to_string(), self.order.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }
}

/// One page of a listed collection, as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page, in server order.
    pub items: Vec<T>,
    /// Total records matching the query across all pages.
    pub total_count: u64,
    /// 1-based page number this response covers.
    pub page: u32,
    /// Page size the server applied.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages for the current count and page size, by ceiling
    /// division. An empty collection still has one (empty) page.
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            return 1;
        }
        let size = self.page_size.max(1) as u64;
        (self.total_count.div_ceil(size)).min(u32::MAX as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(total_count: u64, page: u32, page_size: u32) -> Page<u32> {
        Page {
            items: Vec::new(),
            total_count,
            page,
            page_size,
        }
    }

    #[test]
    fn test_total_pages_ceiling_division() {
        // 25 records at 10 per page fill three pages.
        assert_eq!(page_with(25, 1, 10).total_pages(), 3);
        assert_eq!(page_with(30, 1, 10).total_pages(), 3);
        assert_eq!(page_with(31, 1, 10).total_pages(), 4);
        assert_eq!(page_with(9, 1, 10).total_pages(), 1);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        assert_eq!(page_with(0, 1, 10).total_pages(), 1);
    }

    #[test]
    fn test_has_next_and_prev() {
        let p = page_with(25, 2, 10);
        assert!(p.has_next());
        assert!(p.has_prev());

        let first = page_with(25, 1, 10);
        assert!(first.has_next());
        assert!(!first.has_prev());

        let last = page_with(25, 3, 10);
        assert!(!last.has_next());
        assert!(last.has_prev());
    }

    #[test]
    fn test_query_pairs() {
        let query = ListQuery::new(20)
            .with_search("chair")
            .with_sort("name", SortOrder::Desc)
            .with_filter("category", "furniture");
        let pairs = query.to_query_pairs();

        assert!(pairs.contains(&("page".to_string(), "1".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "20".to_string())));
        assert!(pairs.contains(&("search".to_string(), "chair".to_string())));
        assert!(pairs.contains(&("sort".to_string(), "name".to_string())));
        assert!(pairs.contains(&("order".to_string(), "desc".to_string())));
        assert!(pairs.contains(&("category".to_string(), "furniture".to_string())));
    }

    #[test]
    fn test_query_pairs_skip_empty_search() {
        let mut query = ListQuery::default();
        query.search = Some(String::new());
        let pairs = query.to_query_pairs();
        assert!(!pairs.iter().any(|(k, _)| k == "search"));
        assert!(!pairs.iter().any(|(k, _)| k == "order"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("whatever"), SortOrder::Asc);
    }
}
