//! Resource service implementation.
//!
//! Lists the server's resources and reads them. `page:///` URIs are served
//! through the PageService, so MCP clients get exactly the gate decisions
//! HTTP clients get.

use base64::Engine;
use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use tracing::{info, instrument};

use super::error::ResourceError;
use super::registry::{
    PAGE_URI_PREFIX, SERVER_INFO_URI, get_all_resource_templates, get_all_resources,
};
use crate::core::config::ServerConfig;
use crate::domains::pages::{PageResponse, PageService};

/// Service for managing and accessing resources.
pub struct ResourceService {
    server: ServerConfig,
    pages: PageService,
    resources: Vec<Resource>,
    templates: Vec<ResourceTemplate>,
}

impl ResourceService {
    /// Create a new ResourceService.
    pub fn new(server: ServerConfig, pages: PageService) -> Self {
        info!("Initializing ResourceService");

        Self {
            server,
            pages,
            resources: get_all_resources(),
            templates: get_all_resource_templates(),
        }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    #[instrument(skip(self))]
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let content = if uri == SERVER_INFO_URI {
            self.server_info(uri)?
        } else if let Some(page) = uri.strip_prefix(PAGE_URI_PREFIX) {
            self.read_page(uri, page).await?
        } else {
            return Err(ResourceError::invalid_uri(uri));
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    async fn read_page(&self, uri: &str, page: &str) -> Result<ResourceContents, ResourceError> {
        match self.pages.serve(page).await {
            PageResponse::Page(rendered) => match rendered.as_text() {
                Some(text) => Ok(ResourceContents::text(text, uri)),
                None => Ok(ResourceContents::BlobResourceContents {
                    uri: uri.to_string(),
                    mime_type: Some(rendered.content_type.clone()),
                    blob: base64::engine::general_purpose::STANDARD.encode(&rendered.body),
                    meta: None,
                }),
            },
            PageResponse::Rejected(rejection) => Err(ResourceError::Rejected(rejection)),
        }
    }

    fn server_info(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        let gate = self.pages.gate();
        let policy = gate.policy();

        // Counts and flags only; no paths.
        let info = serde_json::json!({
            "server": self.server.name,
            "version": self.server.version,
            "deny_list_entries": gate.deny_list().len(),
            "deny_descendants": policy.deny_descendants,
            "allow_symlinks": policy.allow_symlinks,
            "uniform_rejection": self.pages.config().uniform_rejection,
            "max_page_bytes": self.pages.config().max_page_bytes,
        });

        Ok(ResourceContents::text(
            serde_json::to_string_pretty(&info)
                .map_err(|e| ResourceError::internal(e.to_string()))?,
            uri,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, PagesConfig};
    use crate::core::security::{ContentRoot, DenyList, GatePolicy, PathGate};
    use crate::domains::pages::Rejection;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> ResourceService {
        let html = temp_dir.path().join("html");
        fs::create_dir_all(&html).unwrap();
        fs::write(html.join("about.html"), "<h1>About</h1>").unwrap();
        fs::write(temp_dir.path().join("secret.txt"), "s").unwrap();

        let root = ContentRoot::new(&html).unwrap();
        let deny = DenyList::new([temp_dir.path().join("secret.txt")]).unwrap();
        let gate = PathGate::new(root, deny, GatePolicy::default());
        let pages = PageService::new(Arc::new(gate), PagesConfig::default());

        ResourceService::new(Config::default().server, pages)
    }

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            _ => panic!("Expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_lists_info_and_page_template() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        assert_eq!(service.list_resources().await.len(), 1);
        assert_eq!(service.list_resource_templates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let temp_dir = TempDir::new().unwrap();
        let result = service(&temp_dir)
            .read_resource(SERVER_INFO_URI)
            .await
            .unwrap();

        let info: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(info["deny_list_entries"], 1);
        assert_eq!(info["uniform_rejection"], true);
    }

    #[tokio::test]
    async fn test_read_page_resource() {
        let temp_dir = TempDir::new().unwrap();
        let result = service(&temp_dir)
            .read_resource("page:///about.html")
            .await
            .unwrap();

        assert_eq!(text_of(&result), "<h1>About</h1>");
    }

    #[tokio::test]
    async fn test_read_denied_page_resource() {
        let temp_dir = TempDir::new().unwrap();
        let result = service(&temp_dir)
            .read_resource("page:///../secret.txt")
            .await;

        assert!(matches!(
            result,
            Err(ResourceError::Rejected(Rejection::PageNotFound))
        ));
    }

    #[tokio::test]
    async fn test_read_unknown_scheme() {
        let temp_dir = TempDir::new().unwrap();
        let result = service(&temp_dir).read_resource("file:///etc/passwd").await;

        assert!(matches!(result, Err(ResourceError::InvalidUri(_))));
    }
}
