//! Read page tool definition.
//!
//! Serves a page from the content root to MCP clients, through the same gate
//! and rejection rules as the HTTP surface.

use base64::Engine;
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::pages::{PageResponse, PageService};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the read page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadPageParams {
    /// Page identifier relative to the content root (e.g. "about.html").
    pub page: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Read page tool - returns the contents of a page under the content root.
pub struct ReadPageTool;

impl ReadPageTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "read_page";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Read a page from the content root by its relative identifier. Text pages are returned as-is, binary pages as base64.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(page = ?params.page))]
    pub async fn execute(params: &ReadPageParams, pages: &PageService) -> CallToolResult {
        info!("Read page tool called");

        match pages.serve(&params.page).await {
            PageResponse::Page(page) => {
                let text = match page.as_text() {
                    Some(text) => text.to_string(),
                    None => serde_json::json!({
                        "content_type": page.content_type,
                        "encoding": "base64",
                        "data": base64::engine::general_purpose::STANDARD.encode(&page.body),
                    })
                    .to_string(),
                };
                CallToolResult::success(vec![Content::text(text)])
            }
            PageResponse::Rejected(rejection) => {
                CallToolResult::error(vec![Content::text(rejection.message())])
            }
        }
    }

    /// HTTP handler for this tool (for the JSON-RPC endpoint).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        pages: &PageService,
    ) -> Result<serde_json::Value, String> {
        let page = arguments
            .get("page")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'page' parameter".to_string())?
            .to_string();

        let result = Self::execute(&ReadPageParams { page }, pages).await;

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ReadPageParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(pages: PageService) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let pages = pages.clone();
            async move {
                let params: ReadPageParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &pages).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PagesConfig;
    use crate::core::security::{ContentRoot, DenyList, GatePolicy, PathGate};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn pages(temp_dir: &TempDir) -> PageService {
        let html = temp_dir.path().join("html");
        fs::create_dir_all(&html).unwrap();
        fs::write(html.join("about.html"), "<h1>About</h1>").unwrap();
        fs::write(html.join("logo.png"), [0x89u8, 0x50, 0x4e, 0x47, 0xff]).unwrap();

        let root = ContentRoot::new(&html).unwrap();
        let gate = PathGate::new(root, DenyList::default(), GatePolicy::default());
        PageService::new(Arc::new(gate), PagesConfig::default())
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => text.text.clone(),
            _ => panic!("Expected text content"),
        }
    }

    #[tokio::test]
    async fn test_read_page_text() {
        let temp_dir = TempDir::new().unwrap();
        let params = ReadPageParams {
            page: "about.html".to_string(),
        };

        let result = ReadPageTool::execute(&params, &pages(&temp_dir)).await;
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "<h1>About</h1>");
    }

    #[tokio::test]
    async fn test_read_page_binary_is_base64() {
        let temp_dir = TempDir::new().unwrap();
        let params = ReadPageParams {
            page: "logo.png".to_string(),
        };

        let result = ReadPageTool::execute(&params, &pages(&temp_dir)).await;
        let body: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(body["encoding"], "base64");
        assert_eq!(body["content_type"], "image/png");
        assert_eq!(body["data"], "iVBOR/8=");
    }

    #[tokio::test]
    async fn test_read_page_traversal_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let params = ReadPageParams {
            page: "../../../../etc/passwd".to_string(),
        };

        let result = ReadPageTool::execute(&params, &pages(&temp_dir)).await;
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "Page not found");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_read_page_http_handler_missing_param() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            ReadPageTool::http_handler(serde_json::json!({ "path": "x" }), &pages(&temp_dir))
                .await;
        assert!(result.is_err());
    }
}
