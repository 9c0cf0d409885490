//! Pages domain module.
//!
//! Serves files from the content root. Every request goes through the path
//! gate, approved files are read through a verified handle, and rendering is
//! a separate explicit step.
//!
//! ## Architecture
//!
//! - `service.rs` - Resolve, read and render; maps outcomes to fixed rejections
//! - `render.rs` - Renderer trait and the pass-through renderer
//! - `error.rs` - Page-specific error types

mod error;
pub mod render;
mod service;

pub use error::PageError;
pub use render::{PageRenderer, RawPage, RenderedPage, StaticRenderer, content_type_for};
pub use service::{PageResponse, PageService, Rejection};
