//! Bulk install detection over a library root.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::DiscoveryError;
use crate::platform::Platform;

/// Scans `root` for immediate subdirectories that look like game installs.
///
/// The signature test is deliberately coarser and cheaper than the
/// resolver's full heuristic; it only has to sort "probably a game" from
/// "probably not" for a bulk UI scan. Per-subdirectory listing errors are
/// logged and skipped, and an unreadable root yields an empty list instead
/// of an error.
pub async fn detect_installed_games(root: &Path, platform: Platform) -> Vec<PathBuf> {
    match scan_root(root, platform).await {
        Ok(found) => found,
        Err(err) => {
            warn!(root = %root.display(), error = %err, "install scan aborted");
            Vec::new()
        }
    }
}

async fn scan_root(root: &Path, platform: Platform) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut entries = tokio::fs::read_dir(root)
        .await
        .map_err(|e| DiscoveryError::ScanFailure(root.to_path_buf(), e))?;

    let mut found = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => return Err(DiscoveryError::ScanFailure(root.to_path_buf(), e)),
        };
        if !entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let dir = entry.path();
        match looks_like_install(&dir, platform).await {
            Ok(true) => {
                debug!(dir = %dir.display(), "detected game install");
                found.push(dir);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            }
        }
    }
    Ok(found)
}

/// Cheap per-directory signature test over top-level file names.
async fn looks_like_install(dir: &Path, platform: Platform) -> std::io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        let hit = match platform {
            Platform::Windows => name.ends_with(".exe") || name.ends_with(".bat"),
            Platform::Unix => {
                name.ends_with(".sh") || name.contains("renpy") || name == "game.py"
            }
        };
        if hit {
            return Ok(true);
        }
    }
    Ok(false)
}
