//! Page service implementation.
//!
//! The PageService is the only caller of the path gate. It turns a raw page
//! identifier into either rendered bytes or a fixed rejection; nothing about
//! the filesystem (paths, denial kind, I/O errors) leaks into a rejection.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::error::PageError;
use super::render::{PageRenderer, RawPage, RenderedPage, StaticRenderer};
use crate::core::config::PagesConfig;
use crate::core::security::{PathGate, Resolution};

/// What a client is told when it does not get a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AccessDenied,
    PageNotFound,
}

impl Rejection {
    /// HTTP status code for this rejection.
    pub const fn status(self) -> u16 {
        match self {
            Self::AccessDenied => 403,
            Self::PageNotFound => 404,
        }
    }

    /// Fixed, content-independent message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::AccessDenied => "Access denied",
            Self::PageNotFound => "Page not found",
        }
    }
}

/// Result of serving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    Page(RenderedPage),
    Rejected(Rejection),
}

impl PageResponse {
    /// HTTP status code for this response.
    pub fn status(&self) -> u16 {
        match self {
            Self::Page(_) => 200,
            Self::Rejected(rejection) => rejection.status(),
        }
    }
}

/// Service that serves pages through the path gate.
///
/// Cheap to clone; all state is shared and immutable.
#[derive(Clone)]
pub struct PageService {
    gate: Arc<PathGate>,
    config: PagesConfig,
    renderer: Arc<dyn PageRenderer>,
}

impl PageService {
    /// Create a new PageService with the default pass-through renderer.
    pub fn new(gate: Arc<PathGate>, config: PagesConfig) -> Self {
        info!(
            "Initializing PageService (uniform rejection: {})",
            config.uniform_rejection
        );
        Self {
            gate,
            config,
            renderer: Arc::new(StaticRenderer),
        }
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        info!("Using renderer: {}", renderer.name());
        self.renderer = renderer;
        self
    }

    /// The gate this service resolves through.
    pub fn gate(&self) -> &Arc<PathGate> {
        &self.gate
    }

    pub fn config(&self) -> &PagesConfig {
        &self.config
    }

    /// Resolve and read a page. Blocking.
    pub fn load(&self, requested: &str) -> Result<RawPage, Rejection> {
        match self.gate.resolve(requested) {
            Resolution::Allowed(path) => match self.read(&path) {
                Ok(body) => Ok(RawPage { path, body }),
                Err(e) if e.is_tampering() => {
                    warn!("Refusing page that changed after approval: {}", e);
                    Err(self.reject(Rejection::AccessDenied))
                }
                Err(e) => {
                    warn!("Failed to read approved page: {}", e);
                    Err(self.reject(Rejection::PageNotFound))
                }
            },
            Resolution::DeniedExplicit | Resolution::DeniedOutsideRoot => {
                Err(self.reject(Rejection::AccessDenied))
            }
            Resolution::NotFound => Err(self.reject(Rejection::PageNotFound)),
        }
    }

    /// Resolve, read and render a page.
    ///
    /// File I/O runs on the blocking pool.
    #[instrument(skip(self))]
    pub async fn serve(&self, requested: &str) -> PageResponse {
        let service = self.clone();
        let requested = requested.to_string();

        let loaded = tokio::task::spawn_blocking(move || service.load(&requested))
            .await
            .map_err(|e| PageError::internal(e.to_string()));

        let raw = match loaded {
            Ok(Ok(raw)) => raw,
            Ok(Err(rejection)) => return PageResponse::Rejected(rejection),
            Err(e) => {
                error!("Page load task failed: {}", e);
                return PageResponse::Rejected(self.reject(Rejection::PageNotFound));
            }
        };

        match self.renderer.render(raw).await {
            Ok(page) => PageResponse::Page(page),
            Err(e) => {
                warn!("Renderer {} failed: {}", self.renderer.name(), e);
                PageResponse::Rejected(self.reject(Rejection::PageNotFound))
            }
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, PageError> {
        let page = self.gate.open(path)?;
        debug!("Reading {} ({} bytes)", page.path().display(), page.size());
        Ok(page.read_to_end(self.config.max_page_bytes)?)
    }

    fn reject(&self, rejection: Rejection) -> Rejection {
        if self.config.uniform_rejection {
            Rejection::PageNotFound
        } else {
            rejection
        }
    }
}
