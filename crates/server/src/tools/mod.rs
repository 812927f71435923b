//! MCP tool implementations.
//!
//! This module contains all tools exposed by the lookout server.

pub mod visit_website;
pub mod web_search;

pub use visit_website::{VisitWebsiteOutput, VisitWebsiteParams};
pub use web_search::{WebSearchOutput, WebSearchParams};
