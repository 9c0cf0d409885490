//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool names for listing

#[cfg(feature = "http")]
use tracing::warn;

use super::definitions::ReadPageTool;
use crate::domains::pages::PageService;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    pages: PageService,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(pages: PageService) -> Self {
        Self { pages }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![ReadPageTool::NAME]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        match name {
            ReadPageTool::NAME => ReadPageTool::http_handler(arguments, &self.pages).await,
            _ => {
                warn!("Unknown tool requested: {:?}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PagesConfig;
    use crate::core::security::{ContentRoot, DenyList, GatePolicy, PathGate};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry(temp_dir: &TempDir) -> ToolRegistry {
        std::fs::write(temp_dir.path().join("index.html"), "home").unwrap();
        let root = ContentRoot::new(temp_dir.path()).unwrap();
        let gate = PathGate::new(root, DenyList::default(), GatePolicy::default());
        ToolRegistry::new(PageService::new(Arc::new(gate), PagesConfig::default()))
    }

    #[test]
    fn test_registry_tool_names() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(registry(&temp_dir).tool_names(), vec!["read_page"]);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_read_page() {
        let temp_dir = TempDir::new().unwrap();
        let result = registry(&temp_dir)
            .call_tool("read_page", serde_json::json!({ "page": "index.html" }))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let result = registry(&temp_dir)
            .call_tool("unknown", serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }
}
