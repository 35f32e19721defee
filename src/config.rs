//! Chip field configuration
//!
//! Stored in `~/.config/chips-input/config.yaml`. Every key is optional:
//!
//! ```yaml
//! threshold: 2
//! allow_duplicates: false
//! chip_limit: 2
//! focus_behavior: SHRINK_WHEN_LOST_FOCUS | EXPAND_WHEN_GOT_FOCUS
//! style:
//!   background: chip
//!   char_width: 8
//! ```

use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{ChipsError, Result};
use crate::pending::MAX_CHIPS_PARSED;
use crate::render::ChipStyle;

bitflags! {
    /// What the field does when focus changes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FocusBehavior: u8 {
        /// Hide chips beyond the chip limit behind a "+N" marker on blur
        const SHRINK_WHEN_LOST_FOCUS = 1 << 0;
        /// Bring hidden chips back on focus
        const EXPAND_WHEN_GOT_FOCUS = 1 << 1;
    }
}

impl Default for FocusBehavior {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipsConfig {
    /// Minimum token length before suggestions are filtered or a chip is made
    pub threshold: usize,
    /// When false, `set_chips_list` skips titles already present
    pub allow_duplicates: bool,
    /// Chips shown while shrunk; the rest hide behind the more marker
    pub chip_limit: usize,
    /// Pending fragments a batch pass may tokenize before giving up
    pub max_chips_parsed: usize,
    /// Undo steps kept
    pub history_size: usize,
    pub focus_behavior: FocusBehavior,
    pub style: ChipStyle,
}

impl Default for ChipsConfig {
    fn default() -> Self {
        Self {
            threshold: 2,
            allow_duplicates: true,
            chip_limit: 2,
            max_chips_parsed: MAX_CHIPS_PARSED,
            history_size: 100,
            focus_behavior: FocusBehavior::default(),
            style: ChipStyle::default(),
        }
    }
}

impl ChipsConfig {
    /// Load config from disk, or return defaults if missing or broken
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ChipsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| ChipsError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().ok_or(ChipsError::NoConfigDir)?;
        self.save_to(&path)
    }
}
