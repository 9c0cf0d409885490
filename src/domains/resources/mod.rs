//! Resources domain module.
//!
//! Resources are data MCP clients can read by URI. The page server exposes a
//! server information resource and a `page:///{page}` template backed by the
//! PageService.
//!
//! ## Architecture
//!
//! - `registry.rs` - Resource and template registration
//! - `service.rs` - Resource service for listing and reading
//! - `error.rs` - Resource-specific error types

mod error;
mod registry;
mod service;

pub use error::ResourceError;
pub use registry::{PAGE_URI_PREFIX, SERVER_INFO_URI, resource_uris};
pub use service::ResourceService;
