//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::visit_website::{VisitWebsiteParams, visit_impl};
use crate::tools::web_search::{WebSearchParams, search_impl};

use lookout_client::{DuckDuckGoClient, FetchClient, FetchConfig, RateLimiter};
use lookout_core::{AppConfig, Error};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use std::sync::Arc;

/// The main MCP server handler for lookout.
#[derive(Clone)]
pub struct LookoutServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    fetch: FetchClient,
    search: DuckDuckGoClient,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LookoutServer {
    /// Create a new server handler.
    ///
    /// Every clone shares one HTTP connection pool and one search throttle.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let fetch = FetchClient::new(FetchConfig::from(&config))?;
        let throttle = Arc::new(RateLimiter::new(config.request_interval()));
        let search = DuckDuckGoClient::new(fetch.clone(), &config.search_url, throttle)?;

        Ok(Self { tool_router: Self::tool_router(), config: Arc::new(config), fetch, search })
    }

    /// Visit a website and return its title, headings, links, and text content.
    #[tool(
        description = "Visit a website and return its title, headings, links, and text content. Use findInPage to prioritize relevant links and content."
    )]
    async fn visit_website(
        &self, params: Parameters<VisitWebsiteParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        visit_impl(&self.fetch, &self.config, params.0, &context.ct).await
    }

    /// Search DuckDuckGo and return a list of result URLs.
    #[tool(description = "Search for web pages on DuckDuckGo using a query string and return a list of URLs.")]
    async fn web_search(
        &self, params: Parameters<WebSearchParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        search_impl(&self.search, &self.config, params.0, &context.ct).await
    }
}

impl ServerHandler for LookoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "lookout".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Use web_search to find pages, then visit_website to read them. Searches are rate limited.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_registered() {
        let server = LookoutServer::new(AppConfig::default()).unwrap();
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["visit_website", "web_search"]);
    }

    #[test]
    fn test_tool_schemas_use_camel_case() {
        let server = LookoutServer::new(AppConfig::default()).unwrap();
        let tools = server.tool_router.list_all();

        let visit = tools.iter().find(|t| t.name == "visit_website").unwrap();
        let props = visit.input_schema.get("properties").unwrap();
        assert!(props.get("findInPage").is_some());
        assert!(props.get("maxLinks").is_some());

        let search = tools.iter().find(|t| t.name == "web_search").unwrap();
        let props = search.input_schema.get("properties").unwrap();
        assert!(props.get("pageSize").is_some());
        assert!(props.get("safeSearch").is_some());
    }

    #[test]
    fn test_bad_search_url_rejected() {
        let config = AppConfig { search_url: "::not a url::".into(), ..AppConfig::default() };
        assert!(matches!(LookoutServer::new(config), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_server_info() {
        let server = LookoutServer::new(AppConfig::default()).unwrap();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "lookout");
        assert!(info.capabilities.tools.is_some());
    }
}
