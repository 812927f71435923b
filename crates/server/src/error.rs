//! Mapping of tool failures onto MCP results.
//!
//! Invalid input is a protocol error. Cancellation and transport failures are
//! ordinary tool results so the model can read them and move on.

use lookout_core::Error;
use rmcp::model::{CallToolResult, Content, ErrorData as McpError};

/// Report a failed tool call.
///
/// `aborted` is the text returned when the caller cancelled the request.
pub fn failure_result(tool: &str, err: Error, aborted: &str) -> Result<CallToolResult, McpError> {
    match err {
        Error::Aborted => {
            tracing::info!("{} cancelled by client", tool);
            Ok(CallToolResult::success(vec![Content::text(aborted)]))
        }
        Error::InvalidInput(_) | Error::InvalidUrl(_) => Err(err.into()),
        other => {
            tracing::warn!("{} failed: {}", tool, other);
            Ok(CallToolResult::error(vec![Content::text(format!("Error: {}", other))]))
        }
    }
}

#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}
