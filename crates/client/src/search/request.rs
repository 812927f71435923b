//! Search request parameters and query-string construction.

use lookout_core::SafeSearch;
use url::Url;

use super::SearchError;

/// Largest page size accepted by the results page.
pub const MAX_PAGE_SIZE: u8 = 10;

/// Deepest results page that can be requested.
pub const MAX_PAGE: u8 = 100;

/// One search, with every tunable already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search query (required).
    pub query: String,

    /// Results kept from the page (1-10).
    pub page_size: u8,

    /// Safe search filtering.
    pub safe_search: SafeSearch,

    /// 1-based results page (1-100).
    pub page: u8,
}

impl SearchRequest {
    /// First page of results for `query` with moderate filtering and 5 results.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), page_size: 5, safe_search: SafeSearch::Moderate, page: 1 }
    }

    /// Validate the search request parameters.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".to_string()));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(SearchError::InvalidPageSize(self.page_size));
        }

        if !(1..=MAX_PAGE).contains(&self.page) {
            return Err(SearchError::InvalidPage(self.page));
        }

        Ok(())
    }

    /// Result offset of the requested page, or `None` for the first page.
    pub fn offset(&self) -> Option<usize> {
        (self.page > 1).then(|| self.page_size as usize * (self.page as usize - 1))
    }

    /// Build the results-page URL.
    ///
    /// `q` is always present. `p` is only sent when filtering is not moderate
    /// and `s` only past the first page.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &self.query);

            match self.safe_search {
                SafeSearch::Strict => {
                    pairs.append_pair("p", "-1");
                }
                SafeSearch::Off => {
                    pairs.append_pair("p", "1");
                }
                SafeSearch::Moderate => {}
            }

            if let Some(offset) = self.offset() {
                pairs.append_pair("s", &offset.to_string());
            }
        }
        url
    }
}
