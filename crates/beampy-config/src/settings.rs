//! Optional TOML defaults for `beampy-setup`
//!
//! ```toml
//! python = "/usr/bin/python3.10"
//! java_home = "/opt/snap/jre"
//! snap_home = "/opt/snap"
//! ```
//!
//! Values given on the command line always win.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit settings file
pub const SETTINGS_ENV_VAR: &str = "BEAMPY_CONFIG";

/// Settings file looked up in the installation directory
pub const SETTINGS_FILE: &str = "beampy-setup.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Interpreter that hosts the bridge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,
    /// Native runtime (JRE/JDK) home
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_home: Option<PathBuf>,
    /// Host application home written to `beampy.ini`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_home: Option<String>,
}

impl Settings {
    /// Settings file location for `install_dir`, honoring `BEAMPY_CONFIG`
    pub fn path(install_dir: &Path) -> PathBuf {
        Self::path_from(std::env::var(SETTINGS_ENV_VAR).ok(), install_dir)
    }

    fn path_from(env_value: Option<String>, install_dir: &Path) -> PathBuf {
        if let Some(value) = env_value {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        install_dir.join(SETTINGS_FILE)
    }

    /// Load settings for `install_dir`; a missing file yields defaults
    pub fn load(install_dir: &Path) -> Result<Self, SettingsError> {
        Self::load_from(&Self::path(install_dir))
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.python.is_none() && self.java_home.is_none() && self.snap_home.is_none()
    }
}
