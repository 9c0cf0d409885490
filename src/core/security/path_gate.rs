use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use soft_canonicalize::soft_canonicalize;
use tracing::{debug, instrument, warn};

use super::canonical::join_untrusted;
use super::content_root::{ContentRoot, DenyList};
use crate::core::config::SecurityConfig;

/// Errors raised by the gate outside of per-request classification.
///
/// The `ContentRoot*` and `DenyEntry*` variants only occur while building the
/// gate at startup. `Changed` and `TooLarge` come from reading an approved
/// page.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Content root '{path}' does not exist")]
    ContentRootMissing { path: PathBuf },

    #[error("Content root '{path}' is not a directory")]
    ContentRootNotDirectory { path: PathBuf },

    #[error("Content root '{path}' must be an absolute path")]
    ContentRootNotAbsolute { path: PathBuf },

    #[error("Deny-list entry '{path}' must be an absolute path")]
    DenyEntryNotAbsolute { path: PathBuf },

    #[error("Page '{path}' changed between resolution and open")]
    Changed { path: PathBuf },

    #[error("Page '{path}' is larger than {limit} bytes")]
    TooLarge { path: PathBuf, limit: u64 },

    #[error("IO error for path '{path}': {error}")]
    Io { path: PathBuf, error: io::Error },
}

impl GateError {
    /// Whether this error can only happen while building the gate.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ContentRootMissing { .. }
                | Self::ContentRootNotDirectory { .. }
                | Self::ContentRootNotAbsolute { .. }
                | Self::DenyEntryNotAbsolute { .. }
        )
    }
}

/// Outcome of resolving one requested page. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The canonical path of a readable regular file inside the root.
    Allowed(PathBuf),
    /// The request names, or resolves to, a protected path.
    DeniedExplicit,
    /// The request resolves outside the content root.
    DeniedOutsideRoot,
    /// Nothing readable exists at the resolved location.
    NotFound,
}

impl Resolution {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allowed(_) => "allowed",
            Self::DeniedExplicit => "denied_explicit",
            Self::DeniedOutsideRoot => "denied_outside_root",
            Self::NotFound => "not_found",
        }
    }
}

/// Tunable strictness of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    /// A deny-list entry also protects everything below it.
    pub deny_descendants: bool,

    /// Follow symlinks inside the root. When false, any request whose
    /// canonical path differs from its lexical path is denied.
    pub allow_symlinks: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            deny_descendants: true,
            allow_symlinks: true,
        }
    }
}

/// Resolves `requested` against `root` and `deny` with the default policy.
pub fn resolve(requested: &str, root: &ContentRoot, deny: &DenyList) -> Resolution {
    resolve_with_policy(requested, root, deny, GatePolicy::default())
}

/// Resolves `requested` against `root` and `deny`.
///
/// Steps, first match wins:
/// 1. the raw request names a protected path
/// 2. the request is joined onto the root and canonicalized as a whole;
///    if that fails, the lexical path is checked against the deny-list and
///    the root instead
/// 3. the canonical path is protected
/// 4. the canonical path is outside the root
/// 5. symlinks are disallowed and one was traversed
/// 6. the canonical path is not a readable regular file
pub fn resolve_with_policy(
    requested: &str,
    root: &ContentRoot,
    deny: &DenyList,
    policy: GatePolicy,
) -> Resolution {
    if deny.matches_literal(requested) {
        return Resolution::DeniedExplicit;
    }

    if requested.contains('\0') {
        return Resolution::NotFound;
    }

    let Some(lexical) = join_untrusted(root.path(), requested) else {
        return Resolution::DeniedOutsideRoot;
    };

    let canonical = match soft_canonicalize(&lexical) {
        Ok(path) => path,
        Err(e) => {
            // Classify the lexical path instead, deny-list first.
            debug!("Cannot canonicalize {}: {}", lexical.display(), e);
            return if deny.blocks(&lexical, policy.deny_descendants) {
                Resolution::DeniedExplicit
            } else if root.contains(&lexical) {
                Resolution::NotFound
            } else {
                Resolution::DeniedOutsideRoot
            };
        }
    };

    if deny.blocks(&canonical, policy.deny_descendants) {
        return Resolution::DeniedExplicit;
    }

    if !root.contains(&canonical) {
        return Resolution::DeniedOutsideRoot;
    }

    if !policy.allow_symlinks && canonical != lexical {
        return Resolution::DeniedExplicit;
    }

    if !is_readable_file(&canonical) {
        return Resolution::NotFound;
    }

    Resolution::Allowed(canonical)
}

fn is_readable_file(path: &Path) -> bool {
    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    is_file && File::open(path).is_ok()
}

/// The configured gate: an immutable root, deny-list and policy.
///
/// Holds no mutable state, so one instance can be shared behind an `Arc` by
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct PathGate {
    root: ContentRoot,
    deny: DenyList,
    policy: GatePolicy,
}

impl PathGate {
    pub fn new(root: ContentRoot, deny: DenyList, policy: GatePolicy) -> Self {
        Self { root, deny, policy }
    }

    /// Builds the gate from the security section of the configuration.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, GateError> {
        let root = ContentRoot::new(&config.content_root)?;
        let deny = DenyList::new(&config.deny_list)?;
        let policy = GatePolicy {
            deny_descendants: config.deny_descendants,
            allow_symlinks: config.allow_symlinks,
        };
        Ok(Self::new(root, deny, policy))
    }

    pub fn root(&self) -> &ContentRoot {
        &self.root
    }

    pub fn deny_list(&self) -> &DenyList {
        &self.deny
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Classifies a requested page.
    #[instrument(skip(self), fields(outcome))]
    pub fn resolve(&self, requested: &str) -> Resolution {
        let resolution = resolve_with_policy(requested, &self.root, &self.deny, self.policy);
        tracing::Span::current().record("outcome", resolution.label());

        match &resolution {
            Resolution::Allowed(path) => debug!("Allowed {}", path.display()),
            Resolution::NotFound => debug!("No page for {:?}", requested),
            denied => warn!("Rejected {:?}: {}", requested, denied.label()),
        }

        resolution
    }

    /// Opens an approved page and checks that the opened file is still the
    /// one that was approved.
    ///
    /// Between `resolve` and `open` the file could be replaced, e.g. by a
    /// symlink pointing elsewhere. The path is re-canonicalized after the
    /// open and, on Unix, the handle's device and inode must match the file
    /// now at that path.
    pub fn open(&self, approved: &Path) -> Result<VerifiedPage, GateError> {
        let io_err = |error: io::Error| GateError::Io {
            path: approved.to_path_buf(),
            error,
        };
        let changed = || GateError::Changed {
            path: approved.to_path_buf(),
        };

        let file = File::open(approved).map_err(io_err)?;
        let opened = file.metadata().map_err(io_err)?;

        let current = fs::canonicalize(approved).map_err(io_err)?;
        if current != approved {
            return Err(changed());
        }

        if !self.root.contains(&current) || self.deny.blocks(&current, self.policy.deny_descendants)
        {
            return Err(changed());
        }

        if !opened.is_file() {
            return Err(changed());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            let on_disk = fs::metadata(&current).map_err(io_err)?;
            if on_disk.dev() != opened.dev() || on_disk.ino() != opened.ino() {
                return Err(changed());
            }
        }

        Ok(VerifiedPage {
            path: current,
            len: opened.len(),
            file,
        })
    }
}

/// An open handle to an approved page.
#[derive(Debug)]
pub struct VerifiedPage {
    path: PathBuf,
    len: u64,
    file: File,
}

impl VerifiedPage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size reported by the handle when it was opened.
    pub fn size(&self) -> u64 {
        self.len
    }

    /// Reads the whole page, refusing anything over `limit` bytes.
    pub fn read_to_end(self, limit: u64) -> Result<Vec<u8>, GateError> {
        let too_large = || GateError::TooLarge {
            path: self.path.clone(),
            limit,
        };

        if self.len > limit {
            return Err(too_large());
        }

        let mut body = Vec::with_capacity(self.len as usize);
        (&self.file)
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|error| GateError::Io {
                path: self.path.clone(),
                error,
            })?;

        if body.len() as u64 > limit {
            return Err(too_large());
        }

        Ok(body)
    }
}
