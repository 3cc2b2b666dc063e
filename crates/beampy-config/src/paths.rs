//! Path resolution for a beampy installation directory
//!
//! Everything this tool touches lives in one directory. The names of the jpy
//! archive and its unpack marker are derived from the interpreter's platform
//! tag and version, so an archive built for one platform/version pair is never
//! picked up by another.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Default configuration read by `import beampy`
pub const DEFAULT_INI_FILE: &str = "beampy.ini";

/// jpy's own installer module, available only after unpacking
pub const INSTALLER_MODULE_FILE: &str = "jpyutil.py";

/// Configuration for Java about Python (written by the installer)
pub const JAVA_CONFIG_FILE: &str = "jpyconfig.properties";

/// Configuration for Python about Java (written by the installer)
pub const PYTHON_CONFIG_FILE: &str = "jpyconfig.py";

/// Directory holding binary distributions inside a Java module
pub const ARCHIVE_LIB_DIR: &str = "lib";

const DISTRIBUTION_PREFIX: &str = "jpy.";

/// `jpy.<platform-tag>-<python-version>`, e.g. `jpy.linux-x86_64-3.10`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistributionId(String);

impl DistributionId {
    pub fn new(platform_tag: &str, python_version: &str) -> Self {
        Self(format!(
            "{}{}-{}",
            DISTRIBUTION_PREFIX, platform_tag, python_version
        ))
    }

    /// Split an identifier back into `(platform_tag, python_version)`.
    ///
    /// Platform tags may contain `-` (`linux-x86_64`, `macosx-11.0-arm64`),
    /// Python versions never do, so the split happens at the last `-`.
    pub fn parse(id: &str) -> Option<(String, String)> {
        let rest = id.strip_prefix(DISTRIBUTION_PREFIX)?;
        let (platform, version) = rest.rsplit_once('-')?;
        if platform.is_empty() || version.is_empty() {
            return None;
        }
        Some((platform.to_string(), version.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<id>.zip`
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.0)
    }

    /// `<id>.info`
    pub fn marker_file_name(&self) -> String {
        format!("{}.info", self.0)
    }

    /// Zip member name of the inner archive inside a Java module JAR.
    /// Zip entry names always use `/`.
    pub fn archive_member(&self) -> String {
        format!("{}/{}", ARCHIVE_LIB_DIR, self.archive_file_name())
    }
}

impl fmt::Display for DistributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every path a setup run reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub install_dir: PathBuf,
    pub ini_file: PathBuf,
    pub distribution: DistributionId,
    pub marker_file: PathBuf,
    pub installer_module: PathBuf,
    pub java_config: PathBuf,
    pub python_config: PathBuf,
}

impl InstallPaths {
    /// Pure function of its inputs; touches nothing on disk
    pub fn resolve(install_dir: &Path, platform_tag: &str, python_version: &str) -> Self {
        let distribution = DistributionId::new(platform_tag, python_version);
        Self {
            install_dir: install_dir.to_path_buf(),
            ini_file: install_dir.join(DEFAULT_INI_FILE),
            marker_file: install_dir.join(distribution.marker_file_name()),
            installer_module: install_dir.join(INSTALLER_MODULE_FILE),
            java_config: install_dir.join(JAVA_CONFIG_FILE),
            python_config: install_dir.join(PYTHON_CONFIG_FILE),
            distribution,
        }
    }

    pub fn config_files_exist(&self) -> bool {
        self.java_config.exists() && self.python_config.exists()
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent.
///
/// Symlinks are not resolved, so the result names the same spelling the
/// caller would see in a shell.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
