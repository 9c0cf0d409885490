//! Startup-validated gate inputs: the content root and the deny-list.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use soft_canonicalize::soft_canonicalize;
use tracing::{debug, info};

use super::canonical::normalize_lexical;
use super::path_gate::GateError;

/// The directory that bounds every servable page, held in canonical form.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    path: PathBuf,
}

impl ContentRoot {
    /// Validates and canonicalizes the configured root.
    ///
    /// Fails if the path is relative, missing, or not a directory. These are
    /// startup errors; the server must not start without a valid root.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, GateError> {
        let configured = path.as_ref();

        if !configured.is_absolute() {
            return Err(GateError::ContentRootNotAbsolute {
                path: configured.to_path_buf(),
            });
        }

        let canonical = configured.canonicalize().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                GateError::ContentRootMissing {
                    path: configured.to_path_buf(),
                }
            } else {
                GateError::Io {
                    path: configured.to_path_buf(),
                    error: e,
                }
            }
        })?;

        if !canonical.is_dir() {
            return Err(GateError::ContentRootNotDirectory { path: canonical });
        }

        info!("Content root: {}", canonical.display());
        Ok(Self { path: canonical })
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` is the root itself or lies below it.
    ///
    /// `Path::starts_with` compares whole components, so `/srv/www-old` is not
    /// inside `/srv/www`.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.path)
    }
}

/// A single protected path.
#[derive(Debug, Clone)]
pub struct DenyEntry {
    configured: PathBuf,
    canonical: PathBuf,
}

impl DenyEntry {
    /// The canonical form used for request-time comparisons.
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }
}

/// Absolute paths that are never served, even from inside the content root.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    entries: Vec<DenyEntry>,
}

impl DenyList {
    /// Builds the deny-list from configured absolute paths.
    ///
    /// Entries that exist are canonicalized through the filesystem so that
    /// symlinked spellings of the same file compare equal. Entries that do not
    /// exist yet keep their lexically normalized form.
    pub fn new<I, P>(paths: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut entries = Vec::new();

        for path in paths {
            let configured = path.as_ref().to_path_buf();
            if !configured.is_absolute() {
                return Err(GateError::DenyEntryNotAbsolute { path: configured });
            }

            let lexical = normalize_lexical(&configured);
            let canonical = soft_canonicalize(&lexical).unwrap_or(lexical);
            debug!(
                "Deny entry {} -> {}",
                configured.display(),
                canonical.display()
            );

            entries.push(DenyEntry {
                configured,
                canonical,
            });
        }

        Ok(Self { entries })
    }

    /// Number of protected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenyEntry> {
        self.entries.iter()
    }

    /// Whether the raw request names a protected path directly.
    ///
    /// Besides the exact configured string this accepts component-equal
    /// spellings (`/root//flag.txt`) of either the configured or the
    /// canonical form.
    pub fn matches_literal(&self, requested: &str) -> bool {
        let requested_path = Path::new(requested);
        self.entries.iter().any(|entry| {
            entry.configured.as_os_str() == OsStr::new(requested)
                || entry.configured == requested_path
                || entry.canonical == requested_path
        })
    }

    /// Whether a canonical candidate is protected.
    ///
    /// With `descendants` set, anything below a protected directory is
    /// protected too.
    pub fn blocks(&self, canonical: &Path, descendants: bool) -> bool {
        self.entries.iter().any(|entry| {
            if descendants {
                canonical.starts_with(&entry.canonical)
            } else {
                canonical == entry.canonical
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_content_root_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(matches!(
            ContentRoot::new(&missing),
            Err(GateError::ContentRootMissing { .. })
        ));
    }

    #[test]
    fn test_content_root_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            ContentRoot::new(&file),
            Err(GateError::ContentRootNotDirectory { .. })
        ));
    }

    #[test]
    fn test_content_root_must_be_absolute() {
        assert!(matches!(
            ContentRoot::new("relative/www"),
            Err(GateError::ContentRootNotAbsolute { .. })
        ));
    }

    #[test]
    fn test_content_root_contains_by_component() {
        let temp_dir = TempDir::new().unwrap();
        let www = temp_dir.path().join("www");
        fs::create_dir(&www).unwrap();

        let root = ContentRoot::new(&www).unwrap();
        assert!(root.contains(&root.path().join("page.html")));
        assert!(root.contains(root.path()));

        let sibling = root.path().with_file_name("www-old").join("page.html");
        assert!(!root.contains(&sibling));
    }

    #[test]
    fn test_deny_entry_must_be_absolute() {
        assert!(matches!(
            DenyList::new(["flag.txt"]),
            Err(GateError::DenyEntryNotAbsolute { .. })
        ));
    }

    #[test]
    fn test_deny_list_literal_match() {
        let deny = DenyList::new(["/root/flag.txt"]).unwrap();

        assert!(deny.matches_literal("/root/flag.txt"));
        assert!(deny.matches_literal("/root//flag.txt"));
        assert!(!deny.matches_literal("root/flag.txt"));
        assert!(!deny.matches_literal("/root/flag.txt.bak"));
    }

    #[test]
    fn test_deny_list_blocks_descendants_when_asked() {
        let deny = DenyList::new(["/srv/private"]).unwrap();
        let inner = Path::new("/srv/private/keys.txt");

        assert!(deny.blocks(inner, true));
        assert!(!deny.blocks(inner, false));
        assert!(deny.blocks(Path::new("/srv/private"), false));
        assert!(!deny.blocks(Path::new("/srv/private-notes"), true));
    }

    #[test]
    fn test_deny_list_canonicalizes_existing_entries() {
        let temp_dir = TempDir::new().unwrap();
        let secret = temp_dir.path().join("secret.txt");
        fs::write(&secret, "x").unwrap();

        let spelled = temp_dir.path().join("sub/../secret.txt");
        let deny = DenyList::new([&spelled]).unwrap();
        let entry = deny.iter().next().unwrap();

        assert_eq!(entry.canonical(), secret.canonicalize().unwrap());
        assert_eq!(entry.configured, spelled);
    }
}
