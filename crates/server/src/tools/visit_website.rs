//! visit_website tool implementation.
//!
//! Fetches a page and returns its title, headings, ranked links and main
//! text, optionally focused on search terms.

use lookout_client::fetch::canonicalize;
use lookout_client::{FetchClient, PageExtract, PageOptions, extract_page};
use lookout_core::{AppConfig, ConfigOverrides, Error};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::failure_result;

/// Text returned when the client cancels a visit.
pub const ABORTED_MESSAGE: &str = "Website visit aborted by user.";

const MAX_LINKS_LIMIT: u32 = 200;
const CONTENT_LIMIT_MAX: u32 = 10_000;

/// Input parameters for visit_website tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitWebsiteParams {
    /// The URL of the website to visit.
    pub url: String,

    /// Highly recommended! Optional search terms to prioritize which links and content to return.
    #[serde(default)]
    pub find_in_page: Option<Vec<String>>,

    /// Maximum number of links to extract from the page (0-200). 0 omits links.
    #[serde(default)]
    #[schemars(range(max = 200))]
    pub max_links: Option<u32>,

    /// Maximum text content length to extract from the page (0-10000). 0 omits content.
    #[serde(default)]
    #[schemars(range(max = 10000))]
    pub content_limit: Option<u32>,
}

/// Output structure for visit_website tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitWebsiteOutput {
    /// The URL as requested.
    pub url: String,
    #[serde(flatten)]
    pub page: PageExtract,
}

impl VisitWebsiteParams {
    fn validate(&self) -> Result<(), Error> {
        if self.url.trim().is_empty() {
            return Err(Error::InvalidInput("url cannot be empty".into()));
        }

        if let Some(n) = self.max_links
            && n > MAX_LINKS_LIMIT
        {
            return Err(Error::InvalidInput(format!("maxLinks must be 0-{}, got {}", MAX_LINKS_LIMIT, n)));
        }

        if let Some(n) = self.content_limit
            && n > CONTENT_LIMIT_MAX
        {
            return Err(Error::InvalidInput(format!("contentLimit must be 0-{}, got {}", CONTENT_LIMIT_MAX, n)));
        }

        canonicalize(&self.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        Ok(())
    }
}

/// Implementation of the visit_website tool.
pub async fn visit_impl(
    fetch: &FetchClient, config: &AppConfig, params: VisitWebsiteParams, cancel: &CancellationToken,
) -> Result<CallToolResult, McpError> {
    params.validate()?;

    let resolved = config.resolve(&ConfigOverrides {
        max_links: params.max_links,
        content_limit: params.content_limit,
        ..Default::default()
    });

    let response = match fetch.fetch(&params.url, cancel).await {
        Ok(response) => response,
        Err(e) => return failure_result("visit_website", e, ABORTED_MESSAGE),
    };

    let options = PageOptions {
        max_links: resolved.max_links,
        content_limit: resolved.content_limit,
        search_terms: params.find_in_page.unwrap_or_default(),
    };
    let page = extract_page(&response.text(), &response.final_url, &options);

    tracing::debug!(
        "visited {} ({} links, {} content chars)",
        response.final_url,
        page.links.as_ref().map_or(0, Vec::len),
        page.content.as_ref().map_or(0, |c| c.chars().count())
    );

    let output = VisitWebsiteOutput { url: params.url, page };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
