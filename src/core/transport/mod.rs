//! Transport layer for the page server.
//!
//! - **HTTP**: page endpoint, health probe and JSON-RPC over POST - feature: `http`
//! - **STDIO**: MCP over standard input/output - feature: `stdio`
//! - **TCP**: MCP over raw TCP sockets - feature: `tcp`
//!
//! Every transport hands requests to the same `PageServer`, so the gate
//! decision for an identifier does not depend on how it arrived.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
