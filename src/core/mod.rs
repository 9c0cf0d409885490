//! Core infrastructure: configuration, errors, the path gate, the server
//! and its transports.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{GateError, PathGate, Resolution};
pub use server::PageServer;
pub use transport::{TransportConfig, TransportService};
