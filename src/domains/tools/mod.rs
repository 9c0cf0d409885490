//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call. The page server
//! exposes page reading as a tool so MCP clients go through the same gate as
//! HTTP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Tool registry and HTTP JSON-RPC dispatch

pub mod definitions;
mod registry;
pub mod router;

pub use registry::ToolRegistry;
pub use router::build_tool_router;
