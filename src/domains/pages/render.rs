//! Rendering of approved pages.
//!
//! Rendering is an explicit step after the gate. Page content is opaque
//! bytes: nothing is included, evaluated or executed. A renderer only decides
//! how those bytes are labelled (and, for a custom renderer, transformed).

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::PageError;

/// Bytes of an approved page, as read through the gate.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Canonical path the bytes were read from.
    pub path: PathBuf,

    /// File contents.
    pub body: Vec<u8>,
}

/// A page ready to be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// MIME type of `body`.
    pub content_type: String,

    /// Response body.
    pub body: Vec<u8>,
}

impl RenderedPage {
    /// The body as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Turns approved page bytes into a response body.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Render one page.
    async fn render(&self, page: RawPage) -> Result<RenderedPage, PageError>;
}

/// Passes bytes through unchanged, labelled by file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRenderer;

#[async_trait]
impl PageRenderer for StaticRenderer {
    fn name(&self) -> &str {
        "static"
    }

    async fn render(&self, page: RawPage) -> Result<RenderedPage, PageError> {
        Ok(RenderedPage {
            content_type: content_type_for(&page.path).to_string(),
            body: page.body,
        })
    }
}

/// MIME type for a file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(
            content_type_for(Path::new("/srv/about.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("/srv/LOGO.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("/srv/photo.jpeg")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("/srv/include.php")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("/srv/README")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_static_renderer_passes_bytes_through() {
        let page = RawPage {
            path: PathBuf::from("/srv/www/index.php"),
            body: b"<?php system($_GET['c']); ?>".to_vec(),
        };

        let rendered = tokio_test::block_on(StaticRenderer.render(page)).unwrap();
        assert_eq!(rendered.content_type, "application/octet-stream");
        assert_eq!(rendered.body, b"<?php system($_GET['c']); ?>");
        assert_eq!(rendered.as_text(), Some("<?php system($_GET['c']); ?>"));
    }

    #[test]
    fn test_binary_body_has_no_text() {
        let rendered = RenderedPage {
            content_type: "image/png".to_string(),
            body: vec![0x89, 0x50, 0xff, 0xfe],
        };
        assert!(rendered.as_text().is_none());
    }
}
