//! web_search tool implementation.
//!
//! Searches DuckDuckGo's HTML results page and returns `(title, url)` pairs.

use lookout_client::{DuckDuckGoClient, LinkTuple, SearchRequest};
use lookout_core::{AppConfig, ConfigOverrides, Error, SafeSearch};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::failure_result;

/// Text returned when the client cancels a search.
pub const ABORTED_MESSAGE: &str = "Search aborted by user.";

/// Text returned when the results page has no usable results.
pub const NO_RESULTS_MESSAGE: &str = "No web pages found for the query.";

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchParams {
    /// The search query for finding web pages.
    pub query: String,

    /// Number of web results per page (1-10).
    #[serde(default)]
    #[schemars(range(min = 1, max = 10))]
    pub page_size: Option<u8>,

    /// Safe search: strict, moderate or off.
    #[serde(default)]
    pub safe_search: Option<SafeSearch>,

    /// Page number for pagination (1-100, default 1).
    #[serde(default = "default_page")]
    #[schemars(range(min = 1, max = 100))]
    pub page: u8,
}

fn default_page() -> u8 {
    1
}

impl Default for WebSearchParams {
    fn default() -> Self {
        Self { query: String::new(), page_size: None, safe_search: None, page: default_page() }
    }
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    /// `[title, url]` pairs in page order.
    pub links: Vec<LinkTuple>,
    /// Number of links returned.
    pub count: usize,
}

/// Implementation of the web_search tool.
pub async fn search_impl(
    client: &DuckDuckGoClient, config: &AppConfig, params: WebSearchParams, cancel: &CancellationToken,
) -> Result<CallToolResult, McpError> {
    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let resolved = config.resolve(&ConfigOverrides {
        page_size: params.page_size,
        safe_search: params.safe_search,
        ..Default::default()
    });

    let req = SearchRequest {
        query: params.query,
        page_size: u8::try_from(resolved.page_size).unwrap_or(u8::MAX),
        safe_search: resolved.safe_search,
        page: params.page,
    };
    req.validate().map_err(Error::from)?;

    let links = match client.search_links(&req, cancel).await {
        Ok(links) => links,
        Err(e) => return failure_result("web_search", e, ABORTED_MESSAGE),
    };

    if links.is_empty() {
        tracing::debug!("no results for query: {}", req.query);
        return Ok(CallToolResult::success(vec![Content::text(NO_RESULTS_MESSAGE)]));
    }

    let output = WebSearchOutput { count: links.len(), links };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
