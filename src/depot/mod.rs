//! Depot layout: where worktrees for a repository live on disk.
//!
//! Worktrees are stored outside the repository under
//! `<depot>/<repo-identity>/<name>`. The identity combines the repository's
//! directory basename with a short fingerprint of its absolute path, so two
//! clones that happen to share a basename get separate namespaces.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default depot location.
pub const DEPOT_ENV: &str = "WTD_DEPOT";

/// Fingerprint length in hex characters (40 bits).
const FINGERPRINT_HEX_LEN: usize = 10;

/// Resolves the depot directory: explicit flag value, then `WTD_DEPOT`,
/// then `~/.worktrees`.
///
/// # Errors
/// Returns an error if no flag or environment override is given and the home
/// directory cannot be determined.
pub fn resolve_depot(flag: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    if let Ok(path) = std::env::var(DEPOT_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    Ok(dirs::home_dir()
        .context("failed to determine home directory")?
        .join(".worktrees"))
}

/// Stable, filesystem-safe identity for a repository root.
///
/// The basename is sanitized to `[A-Za-z0-9._-]` (anything else becomes `_`)
/// and suffixed with the first ten hex characters of the SHA-256 of the full
/// root path. Deterministic and pure: identical roots always yield the
/// identical identity.
#[must_use]
pub fn repo_identity(root: &Path) -> String {
    let basename = root
        .file_name()
        .map_or_else(|| "repo".to_string(), |name| name.to_string_lossy().into_owned());
    let sanitized: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let digest = Sha256::digest(root.to_string_lossy().as_bytes());
    let fingerprint = hex::encode(&digest[..FINGERPRINT_HEX_LEN / 2]);

    format!("{sanitized}-{fingerprint}")
}

/// The per-repository directory under the depot.
#[must_use]
pub fn repo_dir(depot: &Path, root: &Path) -> PathBuf {
    depot.join(repo_identity(root))
}

/// A pure join of `depot / repo_identity(root) / name`; no filesystem access.
#[must_use]
pub fn worktree_path(depot: &Path, root: &Path, name: &str) -> PathBuf {
    repo_dir(depot, root).join(name)
}
