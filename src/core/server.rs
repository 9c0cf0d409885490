//! Page server implementation and lifecycle management.
//!
//! `PageServer` owns the path gate and the services built on it. It
//! implements the MCP `ServerHandler` for STDIO/TCP and exposes plain methods
//! used by the HTTP transport.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Error;
use super::security::PathGate;
use crate::domains::{
    pages::{PageResponse, PageService},
    resources::{ResourceError, ResourceService},
    tools::build_tool_router,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The page server.
///
/// Cheap to clone; every transport connection gets its own clone sharing the
/// same immutable gate.
#[derive(Clone)]
pub struct PageServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Page serving through the gate.
    pages: PageService,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl PageServer {
    /// Create a new server, validating the content root and deny-list.
    ///
    /// Fails with a configuration error if the content root is missing, not
    /// a directory, or any path is relative.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let gate = PathGate::from_config(&config.security).map_err(Error::from_gate)?;
        Ok(Self::with_gate(config, gate))
    }

    /// Create a server around an already built gate.
    pub fn with_gate(config: Config, gate: PathGate) -> Self {
        let config = Arc::new(config);
        let pages = PageService::new(Arc::new(gate), config.pages.clone());
        let resource_service = Arc::new(ResourceService::new(
            config.server.clone(),
            pages.clone(),
        ));

        Self {
            tool_router: build_tool_router::<Self>(pages.clone()),
            config,
            pages,
            resource_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Serve one page request.
    pub async fn serve_page(&self, requested: &str) -> PageResponse {
        self.pages.serve(requested).await
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.pages.clone());
        registry.call_tool(name, arguments).await
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        let resources = self.resource_service.list_resources().await;

        resources
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.raw.uri,
                    "name": r.raw.name,
                    "description": r.raw.description,
                    "mimeType": r.raw.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        match self.resource_service.read_resource(uri).await {
            Ok(result) => Ok(serde_json::json!({
                "contents": result.contents
            })),
            Err(e) => Err(e.to_string()),
        }
    }

    /// List all available resource templates (for HTTP transport).
    pub async fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        let templates = self.resource_service.list_resource_templates().await;

        templates
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for PageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Serves pages from a content root. Use the read_page tool or page:///{page} \
                 resources with identifiers relative to the root."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {:?}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| match e {
                ResourceError::InvalidUri(_) => McpError::invalid_params(e.to_string(), None),
                _ => McpError::resource_not_found(e.to_string(), None),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.security.content_root = root.to_path_buf();
        config
    }

    #[test]
    fn test_new_rejects_missing_content_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = PageServer::new(config_for(&temp_dir.path().join("missing")));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_rejects_relative_deny_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_for(temp_dir.path());
        config.security.deny_list = vec!["flag.txt".into()];

        assert!(matches!(PageServer::new(config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_serve_page() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("about.html"), "hi").unwrap();

        let server = PageServer::new(config_for(temp_dir.path())).unwrap();
        assert_eq!(server.serve_page("about.html").await.status(), 200);
        assert_eq!(server.serve_page("../about.html").await.status(), 404);
    }

    #[test]
    fn test_lists_read_page_tool() {
        let temp_dir = TempDir::new().unwrap();
        let server = PageServer::new(config_for(temp_dir.path())).unwrap();

        let tools = server.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "read_page");
    }
}
