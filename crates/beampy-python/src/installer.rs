//! jpy installer bridge
//!
//! `jpyutil.py` only exists after the binary distribution has been unpacked,
//! so using it takes two steps: [`InstallerLoader::load`] checks that the
//! module is on disk and hands back a [`ConfigWriter`]; the writer then runs
//! `write_config_files` and reports the installer's own status code.
//! A missing module and a failing installer are different errors.

use crate::errors::BridgeError;
use beampy_logger::Logger;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Line prefix under which the bootstrap reports the installer's status
const STATUS_PREFIX: &str = "JPY_STATUS=";

/// Imports the installer from `module_dir` and prints its status on stdout
///
/// The status never travels through the process exit code, which keeps only
/// its low 8 bits. Any exception leaves the status line out.
const BOOTSTRAP_SCRIPT: &str = "import importlib, sys, traceback
module_dir, module_name, out_dir, java_home, req_java, req_py = sys.argv[1:7]
sys.path.insert(0, module_dir)
try:
    installer = importlib.import_module(module_name)
    status = installer.write_config_files(out_dir=out_dir,
                                          java_home_dir=java_home or None,
                                          req_java_api_conf=req_java == '1',
                                          req_py_api_conf=req_py == '1')
    status = int(status or 0)
except BaseException:
    traceback.print_exc()
    sys.exit(1)
sys.stdout.write('\\nJPY_STATUS=%d\\n' % status)
sys.stdout.flush()";

/// Arguments of the installer's write-configuration operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Directory receiving `jpyconfig.properties` and `jpyconfig.py`
    pub out_dir: PathBuf,
    /// Native runtime home; `None` lets the installer search for one
    pub java_home: Option<PathBuf>,
    /// Fail if the Java API configuration fails
    pub require_java_api: bool,
    /// Fail if the Python API configuration fails
    pub require_python_api: bool,
}

/// A loaded installer able to write the bridge's runtime configuration
pub trait ConfigWriter {
    /// Returns the installer's status code unchanged
    fn write_config_files(&self, request: &WriteRequest, logger: &Logger)
        -> Result<i32, BridgeError>;
}

/// Locates an installer module on disk and makes it callable
pub trait InstallerLoader {
    /// Fails with [`BridgeError::InstallerMissing`] when `module_file` is absent
    fn load(
        &self,
        module_file: &Path,
        logger: &Logger,
    ) -> Result<Box<dyn ConfigWriter>, BridgeError>;
}

/// Runs `jpyutil` inside a given Python interpreter
#[derive(Debug, Clone)]
pub struct JpyUtilLoader {
    python: PathBuf,
}

impl JpyUtilLoader {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl InstallerLoader for JpyUtilLoader {
    fn load(
        &self,
        module_file: &Path,
        logger: &Logger,
    ) -> Result<Box<dyn ConfigWriter>, BridgeError> {
        if !module_file.is_file() {
            return Err(BridgeError::InstallerMissing(module_file.to_path_buf()));
        }
        let module_dir = module_file
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let module_name = module_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| BridgeError::InstallerMissing(module_file.to_path_buf()))?;

        logger.debug(&format!(
            "Loaded installer module '{}' from '{}'",
            module_name,
            module_dir.display()
        ));
        Ok(Box::new(JpyUtil {
            python: self.python.clone(),
            module_dir,
            module_name,
        }))
    }
}

struct JpyUtil {
    python: PathBuf,
    module_dir: PathBuf,
    module_name: String,
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl ConfigWriter for JpyUtil {
    fn write_config_files(
        &self,
        request: &WriteRequest,
        logger: &Logger,
    ) -> Result<i32, BridgeError> {
        let command_name = format!("{}.write_config_files", self.module_name);
        logger.info(&format!(
            "running {} (out_dir='{}', java_home={:?}, req_java={}, req_py={})",
            command_name,
            request.out_dir.display(),
            request.java_home,
            request.require_java_api,
            request.require_python_api
        ));

        let java_home = request
            .java_home
            .as_ref()
            .map(|p| p.as_os_str().to_owned())
            .unwrap_or_default();

        let output = Command::new(&self.python)
            .arg("-c")
            .arg(BOOTSTRAP_SCRIPT)
            .arg(&self.module_dir)
            .arg(&self.module_name)
            .arg(&request.out_dir)
            .arg(java_home)
            .arg(flag(request.require_java_api))
            .arg(flag(request.require_python_api))
            .output()
            .map_err(|source| BridgeError::Spawn {
                command: command_name.clone(),
                source,
            })?;

        logger.capture_output(&command_name, &output);

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(status) = parse_status(&stdout) {
            if status != 0 {
                logger.warn(&format!("{} returned status {}", command_name, status));
            }
            return Ok(status);
        }

        match output.status.code() {
            Some(code) => Err(BridgeError::NoStatus {
                command: command_name,
                code,
                detail: last_line(&String::from_utf8_lossy(&output.stderr)),
            }),
            None => Err(BridgeError::Terminated(command_name)),
        }
    }
}

/// The last status line wins; the installer may print lines of its own
fn parse_status(stdout: &str) -> Option<i32> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(STATUS_PREFIX))
        .and_then(|value| value.parse().ok())
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}
