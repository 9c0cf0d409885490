//! Domains module containing business logic organized by bounded contexts.
//!
//! `pages` holds the page-serving logic; `tools` and `resources` expose it to
//! MCP clients.

pub mod pages;
pub mod resources;
pub mod tools;
