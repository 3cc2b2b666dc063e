//! Command-line surface
//!
//! Long option names keep their underscore spelling (`--java_module`) because
//! SNAP invokes this tool with them; hyphenated aliases are accepted too.

use beampy_logger::{Level, Logger};
use clap::{Args, Parser};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

/// Logging options
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// File into which to write logging output
    #[arg(long = "log_file", alias = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level, possible values are: DEBUG, INFO, WARNING, ERROR
    #[arg(
        long = "log_level",
        alias = "log-level",
        value_name = "LEVEL",
        default_value = "INFO"
    )]
    pub log_level: Level,
}

impl GlobalOpts {
    /// Log file when given (truncated), stderr otherwise
    pub fn build_logger(&self) -> io::Result<Logger> {
        match &self.log_file {
            Some(path) => Logger::to_file(path, self.log_level),
            None => Ok(Logger::console(self.log_level)),
        }
    }
}

/// Route panic messages to `logger` instead of the default stderr hook
pub fn log_panics(logger: Arc<Logger>) {
    panic::set_hook(Box::new(move |info| {
        logger.error(&format!("Configuration failed: internal error: {}", info));
    }));
}

#[derive(Parser, Debug, Clone)]
#[command(name = "beampy-setup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Configures beampy, the BEAM Python interface.",
    long_about = "Configures beampy, the BEAM Python interface.\n\n\
                  Unzips the matching jpy binary distribution from \
                  <java_module>/lib/jpy.<platform>-<python-version>.zip \
                  and runs jpyutil to write jpyconfig.properties and jpyconfig.py."
)]
pub struct SetupArgs {
    /// SNAP distribution directory
    #[arg(long = "snap_home", alias = "snap-home", value_name = "DIR")]
    pub snap_home: Option<String>,

    /// Required JVM architecture, e.g. "amd64", may be taken from Java system property "os.arch"
    #[arg(long = "req_arch", alias = "req-arch", value_name = "ARCH")]
    pub req_arch: Option<String>,

    /// Directory or JAR file containing the "snap-python" Java module
    #[arg(long = "java_module", alias = "java-module", value_name = "PATH")]
    pub java_module: PathBuf,

    /// Java JDK or JRE installation directory, may be taken from Java system property "java.home"
    #[arg(long = "java_home", alias = "java-home", value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Python interpreter to configure jpy for (default: python3 or python on PATH)
    #[arg(long, value_name = "EXE")]
    pub python: Option<PathBuf>,

    /// Installation directory (default: the directory containing this executable)
    #[arg(long = "install_dir", alias = "install-dir", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalOpts,

    /// Require that Java API configuration succeeds
    #[arg(short = 'j', long = "req_java", alias = "req-java")]
    pub req_java: bool,

    /// Require that Python API configuration succeeds
    #[arg(short = 'p', long = "req_py", alias = "req-py")]
    pub req_py: bool,

    /// Force overwriting of existing files
    #[arg(short, long)]
    pub force: bool,
}
