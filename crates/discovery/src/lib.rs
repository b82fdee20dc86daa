//! Executable discovery and install probing for PlayVault.
//!
//! Maps a stored game record to one concrete launchable file
//! ([`Resolver`]) and scans library roots for directories that look like
//! game installs ([`detect_installed_games`]). Discovery is heuristic; the
//! security gate in front of process spawning lives in `playvault-launch`.

pub mod heuristics;
pub mod platform;
pub mod probe;
pub mod resolver;

// Re-export primary types.
pub use heuristics::{KnownName, priority, slug};
pub use platform::Platform;
pub use probe::detect_installed_games;
pub use resolver::Resolver;

use std::path::PathBuf;

/// Errors for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("invalid install directory: {0}")]
    InvalidInstall(String),

    #[error("no launchable executable found in {0}")]
    NotFound(PathBuf),

    #[error("cannot list {0}: {1}")]
    ScanFailure(PathBuf, #[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default library directory name under `$HOME`.
pub const DEFAULT_GAMES_DIR: &str = "Games";

/// Resolves the default bulk-scan root.
///
/// Returns `$HOME/Games` or `/tmp/Games` as fallback.
pub fn default_games_root() -> PathBuf {
    home_dir().join(DEFAULT_GAMES_DIR)
}

/// Returns the user's home directory.
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
