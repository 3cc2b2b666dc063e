//! Python interpreter discovery and probing
//!
//! The distribution identifier and the architecture check both describe the
//! interpreter that will host the bridge, not this executable. Discovery picks
//! that interpreter; probing asks it once for everything the setup needs.

use beampy_logger::Logger;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Interpreter names tried on `PATH`, in order
pub const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Prints platform tag, version, machine and pointer width, one per line
const PROBE_SCRIPT: &str = "import platform, sys, sysconfig
print(sysconfig.get_platform())
print(sysconfig.get_python_version())
print(platform.machine())
print(64 if sys.maxsize > 2**32 else 32)";

/// A probed Python interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonRuntime {
    /// Path to the Python executable
    pub executable: PathBuf,
    /// `sysconfig.get_platform()`, e.g. `linux-x86_64`
    pub platform_tag: String,
    /// `sysconfig.get_python_version()`, e.g. `3.10`
    pub version: String,
    /// `platform.machine()`, e.g. `x86_64` or `AMD64`
    pub machine: String,
    /// 32 or 64
    pub pointer_bits: u8,
}

/// Errors during Python discovery
#[derive(Debug)]
pub enum DiscoveryError {
    /// No Python installation found
    NoPython(String),
    /// The interpreter could not be started
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },
    /// The probe ran but did not succeed
    ProbeFailed {
        executable: PathBuf,
        status: Option<i32>,
        stderr: String,
    },
    /// The probe printed something unexpected
    MalformedProbe(String),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::NoPython(msg) => write!(f, "No Python found: {}", msg),
            DiscoveryError::Spawn { executable, source } => {
                write!(f, "Failed to start '{}': {}", executable.display(), source)
            }
            DiscoveryError::ProbeFailed {
                executable,
                status,
                stderr,
            } => {
                write!(
                    f,
                    "Probing '{}' failed (exit code {:?})",
                    executable.display(),
                    status
                )?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            DiscoveryError::MalformedProbe(msg) => {
                write!(f, "Unexpected interpreter probe output: {}", msg)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Pick the interpreter to configure the bridge for
///
/// An explicit path is used as given when it exists, otherwise it is looked up
/// on `PATH` (so `--python python3.10` works). Without one, `python3` and then
/// `python` are tried.
pub fn find_python(explicit: Option<&Path>, logger: &Logger) -> Result<PathBuf, DiscoveryError> {
    if let Some(requested) = explicit {
        if requested.is_file() {
            return Ok(requested.to_path_buf());
        }
        return which::which(requested).map_err(|e| {
            DiscoveryError::NoPython(format!("'{}': {}", requested.display(), e))
        });
    }

    for name in PYTHON_CANDIDATES {
        match which::which(name) {
            Ok(path) => {
                logger.debug(&format!("Found {} at {}", name, path.display()));
                return Ok(path);
            }
            Err(_) => logger.debug(&format!("{} not found on PATH", name)),
        }
    }

    Err(DiscoveryError::NoPython(format!(
        "none of {} is on PATH; pass --python",
        PYTHON_CANDIDATES.join(", ")
    )))
}

impl PythonRuntime {
    /// Run the interpreter once and record what the setup needs to know
    pub fn probe(executable: &Path, logger: &Logger) -> Result<Self, DiscoveryError> {
        logger.debug(&format!("Probing Python at: {}", executable.display()));

        let output = Command::new(executable)
            .args(["-c", PROBE_SCRIPT])
            .output()
            .map_err(|source| DiscoveryError::Spawn {
                executable: executable.to_path_buf(),
                source,
            })?;
        logger.capture_output(&format!("{} -c <probe>", executable.display()), &output);

        if !output.status.success() {
            return Err(DiscoveryError::ProbeFailed {
                executable: executable.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let runtime =
            Self::from_probe_output(executable, &String::from_utf8_lossy(&output.stdout))?;
        logger.info(&format!(
            "using Python {} ({}, {} bit) at '{}'",
            runtime.version,
            runtime.platform_tag,
            runtime.pointer_bits,
            runtime.executable.display()
        ));
        Ok(runtime)
    }

    fn from_probe_output(executable: &Path, stdout: &str) -> Result<Self, DiscoveryError> {
        let lines: Vec<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let [platform_tag, version, machine, bits] = lines.as_slice() else {
            return Err(DiscoveryError::MalformedProbe(format!(
                "expected 4 lines, got {}",
                lines.len()
            )));
        };

        let pointer_bits = match *bits {
            "32" => 32,
            "64" => 64,
            other => {
                return Err(DiscoveryError::MalformedProbe(format!(
                    "pointer width '{}'",
                    other
                )))
            }
        };

        Ok(PythonRuntime {
            executable: executable.to_path_buf(),
            platform_tag: (*platform_tag).to_string(),
            version: (*version).to_string(),
            machine: (*machine).to_string(),
            pointer_bits,
        })
    }

    pub fn is_64bit(&self) -> bool {
        self.pointer_bits == 64
    }
}
