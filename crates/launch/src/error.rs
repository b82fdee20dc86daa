//! Launch error types.

use std::path::PathBuf;

use playvault_discovery::DiscoveryError;

use crate::validate::ValidationError;

/// Errors produced while launching and supervising games.
///
/// Kinds are stable; rendering human-readable messages for the UI is the
/// caller's responsibility.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("game is not installed")]
    NotInstalled,

    #[error("game is already running: {0}")]
    AlreadyRunning(String),

    #[error("executable resolution failed: {0}")]
    Resolution(#[from] DiscoveryError),

    #[error("security violation: {0}")]
    Security(#[from] ValidationError),

    #[error("failed to spawn game process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("game has no install path")]
    NoInstallPath,

    #[error("install path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("failed to open install folder: {0}")]
    OpenFolder(#[source] std::io::Error),
}
