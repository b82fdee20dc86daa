//! The game record as handed over by the library collaborator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A stored game, as the library collaborator hands it to the launch core.
///
/// Only the launch-relevant subset lives here. The record is owned and
/// persisted externally; the core reads it and never writes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name, also the source of the executable-name slug.
    pub name: String,
    /// Absolute install directory, if the game has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,
    /// Explicit executable hint, relative to `install_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    /// Whether the library considers the game installed.
    #[serde(default)]
    pub installed: bool,
}

impl GameRecord {
    /// Creates a record with an install path and no executable hint.
    pub fn new(id: impl Into<String>, name: impl Into<String>, install_path: PathBuf) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            install_path: Some(install_path),
            executable: None,
            installed: true,
        }
    }
}
