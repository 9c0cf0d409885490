//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only collects
//! them.

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::ReadPageTool;
use crate::domains::pages::PageService;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(pages: PageService) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new().with_route(ReadPageTool::create_route(pages))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::PagesConfig;
    use crate::core::security::{ContentRoot, DenyList, GatePolicy, PathGate};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct TestServer {}

    fn test_pages(temp_dir: &TempDir) -> PageService {
        let root = ContentRoot::new(temp_dir.path()).unwrap();
        let gate = PathGate::new(root, DenyList::default(), GatePolicy::default());
        PageService::new(Arc::new(gate), PagesConfig::default())
    }

    #[test]
    fn test_build_router() {
        let temp_dir = TempDir::new().unwrap();
        let router: ToolRouter<TestServer> = build_tool_router(test_pages(&temp_dir));
        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name.as_ref(), "read_page");
    }

    #[test]
    fn test_registry_matches_router() {
        let temp_dir = TempDir::new().unwrap();
        let pages = test_pages(&temp_dir);
        let registry = ToolRegistry::new(pages.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(pages);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
