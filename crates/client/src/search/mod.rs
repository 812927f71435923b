//! DuckDuckGo web search over the JavaScript-free HTML results page.
//!
//! ### Request
//! - **Endpoint**: `https://duckduckgo.com/html/` (configurable)
//! - **Query**: `q` always; `p=-1` (strict) or `p=1` (off) unless moderate;
//!   `s=page_size*(page-1)` past the first page.
//! - **Headers**: browser-like, with a random user agent per request.
//!
//! ### Rate Limiting
//! - All searches share one [`Throttle`]; the default spaces requests 2s apart.
//!
//! ### Parsing
//! - See [`parser`]; results are truncated to the request's page size.

pub mod error;
pub mod parser;
pub mod request;

pub use error::SearchError;
pub use parser::{SearchResult, decode_result_url, parse_results, parse_results_as_links};
pub use request::SearchRequest;

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::extract::LinkTuple;
use crate::fetch::FetchClient;
use crate::throttle::Throttle;
use lookout_core::Error;

/// DuckDuckGo HTML search client.
#[derive(Clone)]
pub struct DuckDuckGoClient {
    fetch: FetchClient,
    endpoint: Url,
    throttle: Arc<dyn Throttle>,
}

impl DuckDuckGoClient {
    /// Create a client for `endpoint`, sharing `throttle` with any other clones.
    pub fn new(fetch: FetchClient, endpoint: &str, throttle: Arc<dyn Throttle>) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint).map_err(|e| Error::InvalidUrl(format!("search endpoint: {}", e)))?;
        Ok(Self { fetch, endpoint, throttle })
    }

    /// The configured results-page endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run a search and return up to `page_size` results with snippets.
    ///
    /// Waits for the throttle first. Cancellation during the wait or the
    /// request resolves to [`Error::Aborted`].
    pub async fn search(&self, req: &SearchRequest, cancel: &CancellationToken) -> Result<Vec<SearchResult>, Error> {
        req.validate()?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Aborted),
            _ = self.throttle.wait_if_needed() => {}
        }

        let start = Instant::now();
        let url = req.to_url(&self.endpoint);
        tracing::debug!("searching: {}", url);

        let response = self.fetch.fetch(url.as_str(), cancel).await?;
        let html = response.text();

        let mut results = parse_results(&html);
        results.truncate(req.page_size as usize);

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), results.len());

        Ok(results)
    }

    /// Run a search and return `(title, url)` pairs.
    pub async fn search_links(&self, req: &SearchRequest, cancel: &CancellationToken) -> Result<Vec<LinkTuple>, Error> {
        let results = self.search(req, cancel).await?;
        Ok(results.into_iter().map(|r| (r.title, r.url)).collect())
    }
}
