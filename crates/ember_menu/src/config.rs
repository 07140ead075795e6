//! Menu configuration.
//!
//! ```toml
//! config_root = "ember"
//! identity = "default"
//! anchor = { x = 30.0, y = 30.0 }
//! open_key = "Shift"
//! latch_key = "F8"
//! theme = "terminal"
//! snapshot_interval_ms = 250
//! ```
//!
//! Every field is optional.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ember_shared::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::input::Key;
use crate::theme::TerminalTheme;
use crate::tree::StorageRoot;

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Base directory for save files.
    pub config_root: PathBuf,
    /// Owner identity used for root menus without their own.
    pub identity: String,
    /// Screen position of the root column.
    pub anchor: Vec2,
    /// Held to show the overlay.
    pub open_key: Key,
    /// Each press latches the overlay open or closed.
    pub latch_key: Key,
    /// Theme used until the settings menu picks another.
    pub theme: String,
    /// Period of the housekeeping snapshot rebuild.
    pub snapshot_interval_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            config_root: PathBuf::from("ember"),
            identity: "default".to_string(),
            anchor: Vec2::new(30.0, 30.0),
            open_key: Key::Shift,
            latch_key: Key::F8,
            theme: TerminalTheme::NAME.to_string(),
            snapshot_interval_ms: 250,
        }
    }
}

impl MenuConfig {
    /// Parses a TOML document; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`MenuError::InvalidConfig`] on malformed TOML or a zero interval.
    pub fn from_toml_str(text: &str) -> MenuResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MenuError::InvalidConfig(e.to_string()))?;
        if config.snapshot_interval_ms == 0 {
            return Err(MenuError::InvalidConfig(
                "snapshot_interval_ms must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    /// Reads a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// [`MenuError::Io`] if the file exists but cannot be read,
    /// [`MenuError::InvalidConfig`] if it cannot be parsed.
    pub fn load(path: &Path) -> MenuResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(MenuError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Where save files go.
    #[must_use]
    pub fn storage(&self) -> StorageRoot {
        StorageRoot::new(&self.config_root, &self.identity)
    }

    /// Housekeeping period, never shorter than one millisecond.
    #[must_use]
    pub const fn snapshot_interval(&self) -> Duration {
        let millis = if self.snapshot_interval_ms == 0 {
            1
        } else {
            self.snapshot_interval_ms
        };
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(MenuConfig::from_toml_str("").expect("parse"), MenuConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = MenuConfig::from_toml_str(
            "identity = \"aimbot.lua\"\nlatch_key = \"Insert\"\nanchor = { x = 5.0, y = 6.0 }\n",
        );
        // `Insert` is not a known key.
        assert!(matches!(config, Err(MenuError::InvalidConfig(_))));

        let config = MenuConfig::from_toml_str(
            "identity = \"aimbot.lua\"\nlatch_key = \"F10\"\nanchor = { x = 5.0, y = 6.0 }\n",
        )
        .expect("parse");
        assert_eq!(config.identity, "aimbot.lua");
        assert_eq!(config.latch_key, Key::F10);
        assert_eq!(config.anchor, Vec2::new(5.0, 6.0));
        assert_eq!(config.open_key, Key::Shift);
        assert_eq!(config.snapshot_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(MenuConfig::from_toml_str("snapshot_interval_ms = 0").is_err());
    }

    #[test]
    fn test_interval_built_in_code_is_floored() {
        let config = MenuConfig {
            snapshot_interval_ms: 0,
            ..MenuConfig::default()
        };
        assert_eq!(config.snapshot_interval(), Duration::from_millis(1));
        assert_eq!(MenuConfig::default().snapshot_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = MenuConfig::load(&dir.path().join("menu.toml")).expect("load");
        assert_eq!(config, MenuConfig::default());
    }
}
