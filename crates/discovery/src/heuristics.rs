//! Shared discovery vocabulary: well-known launcher names and ranking.

use std::path::Path;

use crate::platform::Platform;

/// A well-known launcher name, literal or derived from the game's slug.
#[derive(Debug, Clone, Copy)]
pub enum KnownName {
    /// A fixed file name or engine sub-path, e.g. `game.exe`.
    Literal(&'static str),
    /// A name generated from the game-name slug, e.g. `<slug>.exe`.
    Templated(fn(&str) -> String),
}

impl KnownName {
    /// Produces the concrete relative path for a game slug.
    pub fn resolve(&self, slug: &str) -> String {
        match self {
            Self::Literal(name) => (*name).to_string(),
            Self::Templated(template) => template(slug),
        }
    }
}

/// Well-known names probed on Windows-style installs, in priority order.
pub const WINDOWS_KNOWN_NAMES: &[KnownName] = &[
    KnownName::Literal("game.exe"),
    KnownName::Literal("start.exe"),
    KnownName::Literal("launcher.exe"),
    KnownName::Literal("run.bat"),
    KnownName::Templated(|slug| format!("{slug}.exe")),
    KnownName::Literal("lib/windows-x86_64/renpy.exe"),
    KnownName::Literal("lib/py3-windows-x86_64/renpy.exe"),
];

/// Well-known names probed on Unix-style installs, in priority order.
pub const UNIX_KNOWN_NAMES: &[KnownName] = &[
    KnownName::Literal("game.sh"),
    KnownName::Literal("start.sh"),
    KnownName::Literal("launcher.sh"),
    KnownName::Literal("run.sh"),
    KnownName::Literal("start"),
    KnownName::Literal("game"),
    KnownName::Templated(|slug| format!("{slug}.sh")),
    KnownName::Templated(|slug| slug.to_string()),
    KnownName::Literal("lib/linux-x86_64/renpy.sh"),
    KnownName::Literal("lib/py3-linux-x86_64/renpy.sh"),
];

/// Returns the well-known-name table for a platform.
pub fn known_names(platform: Platform) -> &'static [KnownName] {
    match platform {
        Platform::Windows => WINDOWS_KNOWN_NAMES,
        Platform::Unix => UNIX_KNOWN_NAMES,
    }
}

/// Slugs a game name: lowercase, non-alphanumerics stripped.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// Ranks a candidate path; higher wins.
///
/// Keyword tiers beat extension tiers: `start` > `launcher` > `game` >
/// `run` > native extension > no extension > everything else. Callers use a
/// stable sort so ties keep discovery order.
pub fn priority(path: &Path, platform: Platform) -> u32 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.contains("start") {
        6
    } else if name.contains("launcher") {
        5
    } else if name.contains("game") {
        4
    } else if name.contains("run") {
        3
    } else if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(platform.native_extension()))
    {
        2
    } else if path.extension().is_none() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn slug_strips_non_alphanumerics() {
        assert_eq!(slug("My Game: Redux!"), "mygameredux");
        assert_eq!(slug("A-B_c 3"), "abc3");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn templated_names_use_slug() {
        let names: Vec<String> = known_names(Platform::Windows)
            .iter()
            .map(|n| n.resolve("mygame"))
            .collect();
        assert!(names.contains(&"mygame.exe".to_string()));
        assert!(names.contains(&"game.exe".to_string()));
    }

    #[test]
    fn keyword_tiers_outrank_extensions() {
        let start = priority(&PathBuf::from("start.sh"), Platform::Unix);
        let launcher = priority(&PathBuf::from("launcher.sh"), Platform::Unix);
        let game = priority(&PathBuf::from("game.py"), Platform::Unix);
        let run = priority(&PathBuf::from("run.sh"), Platform::Unix);
        let native = priority(&PathBuf::from("play.sh"), Platform::Unix);
        let bare = priority(&PathBuf::from("play"), Platform::Unix);
        let other = priority(&PathBuf::from("play.py"), Platform::Unix);

        assert!(start > launcher);
        assert!(launcher > game);
        assert!(game > run);
        assert!(run > native);
        assert!(native > bare);
        assert!(bare > other);
    }

    #[test]
    fn native_extension_follows_platform() {
        assert_eq!(priority(&PathBuf::from("play.exe"), Platform::Windows), 2);
        assert_eq!(priority(&PathBuf::from("play.exe"), Platform::Unix), 0);
    }
}
