//! The security gate in front of process spawning.
//!
//! Discovery heuristics are allowed to be wrong; this gate is not. Every
//! spawn goes through [`validate`] with the freshly resolved path — callers
//! never get to reuse a previously validated one.

use std::path::{Component, Path, PathBuf};

/// Characters never allowed in a launchable path.
///
/// Spawning never goes through a shell, so this is defense-in-depth against
/// malformed or attacker-influenced paths rather than the primary control.
const DANGEROUS_CHARS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '<', '>',
];

/// Rejection reasons from the security gate.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("path escapes install directory: {0}")]
    EscapesInstallRoot(PathBuf),

    #[error("path contains dangerous characters: {0}")]
    DangerousCharacters(PathBuf),

    #[error("path does not exist: {0}")]
    Missing(PathBuf),

    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
}

/// Accepts or rejects a candidate executable path for an install root.
///
/// Checks run in order and short-circuit: lexical containment in the
/// install root, shell-metacharacter screen, then existence as a regular
/// file. Normalization is purely lexical (no symlink following).
pub fn validate(candidate: &Path, install_root: &Path) -> Result<(), ValidationError> {
    let normalized = normalize(candidate);
    let root = normalize(install_root);

    if !normalized.starts_with(&root) {
        return Err(ValidationError::EscapesInstallRoot(candidate.to_path_buf()));
    }

    let text = candidate.to_string_lossy();
    if text.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(ValidationError::DangerousCharacters(candidate.to_path_buf()));
    }

    let meta = std::fs::metadata(&normalized)
        .map_err(|_| ValidationError::Missing(normalized.clone()))?;
    if !meta.is_file() {
        return Err(ValidationError::NotAFile(normalized));
    }

    Ok(())
}

/// Collapses `.`, `..` and redundant separators without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
