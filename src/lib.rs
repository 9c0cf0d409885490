//! Page Gate
//!
//! A content server that maps untrusted page identifiers onto files under a
//! content root. Every identifier goes through a [`PathGate`], which
//! canonicalizes it, checks it against a deny-list and the root, and only
//! then lets the file be read.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the path gate, the server and
//!   its transports
//! - **domains**: request handling built on the gate
//!   - **pages**: loading and rendering pages, uniform rejections
//!   - **tools**: the `read_page` MCP tool
//!   - **resources**: `page:///` resources and server information
//!
//! # Example
//!
//! ```rust,no_run
//! use page_gate::{PathGate, Resolution, core::Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let gate = PathGate::from_config(&config.security)?;
//!
//!     match gate.resolve("about.html") {
//!         Resolution::Allowed(path) => println!("serving {}", path.display()),
//!         other => println!("rejected: {}", other.label()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, PageServer, PathGate, Resolution, Result};
