//! Setup errors and their exit status codes
//!
//! Exit codes are the only contract automation sees: `0` success, `10` inner
//! archive missing or anything unexpected, `20` installer module missing.

use beampy_logger::Logger;
use beampy_python::{BridgeError, DiscoveryError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 10;
pub const EXIT_MISSING_INSTALLER: i32 = 20;

/// Where jpy binary distributions can be built from source
pub const JPY_HOMEPAGE: &str = "https://github.com/bcdev/jpy";

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Can't find binary distribution '{}'", .0.display())]
    MissingArchive(PathBuf),

    #[error("Missing Python module '{}' required to complete the configuration", module.display())]
    MissingInstaller { module: PathBuf, archive: PathBuf },

    #[error("Failed to extract '{member}' from '{}': {source}", archive.display())]
    Extraction {
        archive: PathBuf,
        member: String,
        source: zip::result::ZipError,
    },

    #[error("Failed to unpack '{}': {source}", archive.display())]
    Unpack {
        archive: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Could not determine installation directory: {0}")]
    InstallDir(String),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Bridge(BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<BridgeError> for SetupError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Discovery(e) => SetupError::Discovery(e),
            other => SetupError::Bridge(other),
        }
    }
}

impl SetupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::MissingInstaller { .. } => EXIT_MISSING_INSTALLER,
            _ => EXIT_FAILURE,
        }
    }

    /// Log the operator-facing description of this failure
    pub fn report(&self, logger: &Logger) {
        match self {
            SetupError::MissingArchive(_) => {
                logger.error(&self.to_string());
                logger.error(
                    "... of Python module 'jpy' for this system. You can try to generate one yourself.",
                );
                logger.error(&format!(
                    "... Please go to {} and follow the build instructions",
                    JPY_HOMEPAGE
                ));
                logger.error("... given there.");
            }
            SetupError::MissingInstaller { archive, .. } => {
                logger.error(&format!("{}.", self));
                logger.error(&format!(
                    "This file should have been part of binary distribution '{}'.",
                    archive.display()
                ));
            }
            _ => {
                logger.error(&format!("Configuration failed: {}", self));
                logger.debug(&format!("{:?}", self));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beampy_logger::Level;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            SetupError::MissingArchive(PathBuf::from("lib/x.zip")).exit_code(),
            EXIT_FAILURE
        );
        assert_eq!(
            SetupError::MissingInstaller {
                module: PathBuf::from("jpyutil.py"),
                archive: PathBuf::from("lib/x.zip"),
            }
            .exit_code(),
            EXIT_MISSING_INSTALLER
        );
        assert_eq!(
            SetupError::Extraction {
                archive: PathBuf::from("snap-python.jar"),
                member: "lib/x.zip".to_string(),
                source: zip::result::ZipError::FileNotFound,
            }
            .exit_code(),
            EXIT_FAILURE
        );
        assert_eq!(
            SetupError::Io(io::Error::new(io::ErrorKind::Other, "disk full")).exit_code(),
            EXIT_FAILURE
        );
    }

    #[test]
    fn test_missing_archive_guidance() {
        let (logger, buffer) = Logger::memory(Level::Info);
        SetupError::MissingArchive(PathBuf::from("/mod/lib/jpy.linux-x86_64-3.10.zip"))
            .report(&logger);

        let errors = buffer.at_level(Level::Error);
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[0],
            "Can't find binary distribution '/mod/lib/jpy.linux-x86_64-3.10.zip'"
        );
        assert!(errors[2].contains(JPY_HOMEPAGE));
    }

    #[test]
    fn test_bridge_discovery_errors_are_unwrapped() {
        let err: SetupError =
            BridgeError::Discovery(DiscoveryError::NoPython("nothing".to_string())).into();
        assert!(matches!(err, SetupError::Discovery(_)));
        assert!(err.to_string().contains("No Python found"));
    }

    #[test]
    fn test_unclassified_report() {
        let (logger, buffer) = Logger::memory(Level::Info);
        SetupError::InstallDir("no executable path".to_string()).report(&logger);
        assert_eq!(
            buffer.at_level(Level::Error),
            vec!["Configuration failed: Could not determine installation directory: no executable path"]
        );
    }
}
