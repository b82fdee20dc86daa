//! Platform style selection for discovery heuristics.

/// Executable-discovery style for a platform family.
///
/// Heuristics take the platform as a parameter so either rule set can be
/// exercised from tests regardless of the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `.exe`/`.bat`/`.cmd` discovery rules.
    Windows,
    /// Shell-script and shebang discovery rules (Linux, macOS, BSDs).
    Unix,
}

impl Platform {
    /// Returns the style for the host OS.
    pub fn host() -> Self {
        host_inner()
    }

    /// The extension a native launcher carries on this platform.
    pub fn native_extension(self) -> &'static str {
        match self {
            Self::Windows => "exe",
            Self::Unix => "sh",
        }
    }
}

#[cfg(target_os = "windows")]
fn host_inner() -> Platform {
    Platform::Windows
}

#[cfg(not(target_os = "windows"))]
fn host_inner() -> Platform {
    Platform::Unix
}
