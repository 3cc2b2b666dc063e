//! Delegated bridge configuration
//!
//! jpy writes its own runtime configuration (`jpyconfig.properties` for Java,
//! `jpyconfig.py` for Python). This module decides whether that is needed,
//! finds a Java home when none was given and hands over to the installer.

use crate::errors::{SetupError, EXIT_SUCCESS};
use crate::setup::SetupOptions;
use beampy_config::{normalize_path, InstallPaths};
use beampy_logger::Logger;
use beampy_python::{BridgeError, InstallerLoader, WriteRequest};
use std::path::{Path, PathBuf};

/// JRE bundled with a SNAP installation, relative to the SNAP home
pub const BUNDLED_JRE_DIR: &str = "jre";

/// Explicit Java home, else the JRE bundled three levels above the
/// installation directory (`<snap.home>/snap/modules/<beampy>/`), if present
pub fn resolve_java_home(
    explicit: Option<&Path>,
    install_dir: &Path,
    logger: &Logger,
) -> Option<PathBuf> {
    if let Some(home) = explicit {
        return Some(home.to_path_buf());
    }

    let bundled = install_dir
        .join("..")
        .join("..")
        .join("..")
        .join(BUNDLED_JRE_DIR);
    if bundled.exists() {
        let home = normalize_path(&bundled);
        logger.debug(&format!("using bundled JRE at '{}'", home.display()));
        Some(home)
    } else {
        logger.debug(&format!(
            "no bundled JRE at '{}', leaving Java home to the installer",
            bundled.display()
        ));
        None
    }
}

/// Run the installer unless both configuration files exist
///
/// Returns the installer's status unchanged, or `0` when skipped.
pub fn configure_bridge(
    paths: &InstallPaths,
    archive: &Path,
    options: &SetupOptions,
    loader: &dyn InstallerLoader,
    logger: &Logger,
) -> Result<i32, SetupError> {
    if !options.force && paths.config_files_exist() {
        logger.debug("jpy configuration files exist, skipping configuration");
        return Ok(EXIT_SUCCESS);
    }

    let writer = loader
        .load(&paths.installer_module, logger)
        .map_err(|err| match err {
            BridgeError::InstallerMissing(module) => SetupError::MissingInstaller {
                module,
                archive: archive.to_path_buf(),
            },
            other => other.into(),
        })?;

    let request = WriteRequest {
        out_dir: paths.install_dir.clone(),
        java_home: resolve_java_home(options.java_home.as_deref(), &paths.install_dir, logger),
        require_java_api: options.req_java,
        require_python_api: options.req_py,
    };

    Ok(writer.write_config_files(&request, logger)?)
}
