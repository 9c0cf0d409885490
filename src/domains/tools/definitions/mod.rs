//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file.

pub mod read_page;

pub use read_page::{ReadPageParams, ReadPageTool};
