//! Tool configuration
//!
//! Settings come from a TOML file (`--config`, or `iffclip/config.toml` in the
//! platform config directory). A missing default file simply means defaults;
//! nothing is ever written back.

use std::fs;
use std::path::{Path, PathBuf};

use iffclip_storage::{DEFAULT_MAX_WRITE_CHUNK, RouterVersion, StorageConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClipError, ClipResult};

/// Default number of preview bytes shown by `list`
pub const DEFAULT_PREVIEW_LEN: usize = 40;

/// Settings for the clipboard tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipConfig {
    /// Directory holding the clipboard units
    pub clips_dir: Option<PathBuf>,
    /// Hash revision used for suggested units
    pub router_version: RouterVersion,
    /// Preview length in `list` output
    pub preview_len: usize,
    /// Maximum bytes handed to a unit per write call
    pub max_write_chunk: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            clips_dir: None,
            router_version: RouterVersion::default(),
            preview_len: DEFAULT_PREVIEW_LEN,
            max_write_chunk: DEFAULT_MAX_WRITE_CHUNK,
        }
    }
}

impl ClipConfig {
    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present.
    pub fn load(path: Option<&Path>) -> ClipResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> ClipResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClipError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ClipError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ClipResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ClipError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable values
    pub fn validate(&self) -> ClipResult<()> {
        if self.preview_len == 0 {
            return Err(ClipError::Config("preview_len must be at least 1".to_string()));
        }
        if self.max_write_chunk == 0 {
            return Err(ClipError::Config(
                "max_write_chunk must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("iffclip").join("config.toml"))
    }

    /// Default clipboard directory
    pub fn default_clips_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("iffclip")
            .join("units")
    }

    /// Clipboard directory after applying an override from the command line
    pub fn clips_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.clips_dir.clone())
            .unwrap_or_else(Self::default_clips_dir)
    }

    /// Device settings derived from this configuration
    pub fn storage_config(&self, override_dir: Option<&Path>) -> StorageConfig {
        StorageConfig::new(self.clips_dir(override_dir)).with_max_write_chunk(self.max_write_chunk)
    }
}
