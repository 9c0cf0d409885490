//! Lexical path helpers.
//!
//! Filesystem resolution of candidates that may not exist yet is left to
//! `soft_canonicalize`; this module only decides how an untrusted identifier
//! is laid onto the root before that happens.

use std::path::{Component, Path, PathBuf};

/// Joins an untrusted page identifier onto an already canonical root.
///
/// The identifier is concatenated, never allowed to replace the root: a
/// leading separator is just an empty segment. Both `/` and `\` split
/// segments so that `..\` behaves like `../` on every platform. `.` and `..`
/// are folded lexically over the whole candidate.
///
/// Returns `None` when a segment would re-root the path (a drive prefix on
/// Windows), which callers must treat as an escape.
pub fn join_untrusted(root: &Path, requested: &str) -> Option<PathBuf> {
    let mut candidate = root.to_path_buf();

    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                candidate.pop();
            }
            name => {
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(part)), None) => candidate.push(part),
                    _ => return None,
                }
            }
        }
    }

    Some(candidate)
}

/// Lexically normalizes an absolute path, folding `.` and `..`.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }

    out
}
