//! Executable resolution: one launchable file per game install.

use std::path::{Path, PathBuf};

use playvault_library::GameRecord;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::DiscoveryError;
use crate::heuristics::{known_names, priority, slug};
use crate::platform::Platform;

/// How many leading bytes content sniffing reads.
const SNIFF_LEN: usize = 512;

/// Maps a game record to one concrete launchable file path.
///
/// Discovery is heuristic, not a security boundary: the returned path still
/// goes through the launch crate's validator before any spawn.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    platform: Platform,
}

impl Resolver {
    /// Creates a resolver with explicit platform rules (useful in tests).
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Creates a resolver for the host OS.
    pub fn host() -> Self {
        Self::new(Platform::host())
    }

    /// Resolves the launchable executable for a game.
    ///
    /// An explicit `executable` hint is reduced to its basename so it cannot
    /// point outside the install directory; if the hinted file is missing,
    /// resolution falls back to the full heuristic search.
    pub async fn resolve(&self, game: &GameRecord) -> Result<PathBuf, DiscoveryError> {
        let install = game
            .install_path
            .as_deref()
            .ok_or_else(|| DiscoveryError::InvalidInstall("install path is not set".into()))?;

        if !tokio::fs::metadata(install)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(DiscoveryError::InvalidInstall(format!(
                "install path does not exist: {}",
                install.display()
            )));
        }

        if let Some(hint) = game.executable.as_deref()
            && let Some(base) = Path::new(hint).file_name()
        {
            let candidate = install.join(base);
            if is_file(&candidate).await {
                set_executable(&candidate)?;
                return Ok(candidate);
            }
            debug!(
                game = %game.name,
                hint = %hint,
                "executable hint not found, falling back to discovery"
            );
        }

        let slug = slug(&game.name);
        let mut candidates: Vec<PathBuf> = Vec::new();

        // Well-known-name probe, in table order.
        for known in known_names(self.platform) {
            let candidate = install.join(known.resolve(&slug));
            if is_file(&candidate).await && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        // Top-level scan. Subdirectories are never candidates.
        let mut entries = tokio::fs::read_dir(install).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if candidates.contains(&path) {
                continue;
            }
            let matched = match self.platform {
                Platform::Windows => has_extension(&path, &["exe", "bat", "cmd"]),
                Platform::Unix => {
                    unix_scan_name_matches(&path) && is_script_like(&path).await
                }
            };
            if matched {
                candidates.push(path);
            }
        }

        // Stable sort keeps discovery order among equal ranks.
        candidates.sort_by(|a, b| {
            priority(b, self.platform).cmp(&priority(a, self.platform))
        });

        let winner = candidates
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NotFound(install.to_path_buf()))?;

        if self.platform == Platform::Unix {
            set_executable(&winner)?;
        }

        debug!(game = %game.name, path = %winner.display(), "resolved executable");
        Ok(winner)
    }
}

/// Name pre-filter for the Unix top-level scan.
fn unix_scan_name_matches(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".sh")
        || name.ends_with(".py")
        || name.contains("linux")
        || path.extension().is_none()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Sniffs a file's leading bytes for script markers.
///
/// Any read failure means "not a match"; scans never abort on one bad file.
async fn is_script_like(path: &Path) -> bool {
    let Ok(mut file) = tokio::fs::File::open(path).await else {
        return false;
    };
    let mut buf = [0u8; SNIFF_LEN];
    let Ok(n) = file.read(&mut buf).await else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..n]).to_lowercase();
    head.starts_with("#!") || head.contains("python") || head.contains("renpy")
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Sets a file as executable (Unix only, 755).
fn set_executable(path: &Path) -> Result<(), DiscoveryError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
