//! The setup flow
//!
//! probe → resolve paths → write `beampy.ini` → locate archive → unpack →
//! configure. Every step after the probe is skipped when its output already
//! exists, unless `force` is set. Nothing is rolled back on failure.

use crate::archive;
use crate::common::SetupArgs;
use crate::configurator;
use crate::errors::{SetupError, EXIT_FAILURE};
use crate::probe;
use beampy_config::{normalize_path, write_default_ini, DistributionId, InstallPaths, Settings};
use beampy_logger::Logger;
use beampy_python::{find_python, InstallerLoader, JpyUtilLoader, PythonRuntime};
use std::path::{Path, PathBuf};

/// Fully resolved inputs of one setup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub install_dir: PathBuf,
    pub java_module: PathBuf,
    pub snap_home: Option<String>,
    pub java_home: Option<PathBuf>,
    pub req_arch: Option<String>,
    pub req_java: bool,
    pub req_py: bool,
    pub force: bool,
}

impl SetupOptions {
    /// Command-line values, falling back to the settings file
    pub fn from_args(args: &SetupArgs, install_dir: PathBuf, settings: Settings) -> Self {
        Self {
            install_dir,
            java_module: args.java_module.clone(),
            snap_home: args.snap_home.clone().or(settings.snap_home),
            java_home: args.java_home.clone().or(settings.java_home),
            req_arch: args.req_arch.clone(),
            req_java: args.req_java,
            req_py: args.req_py,
            force: args.force,
        }
    }
}

/// Run the whole setup for an already probed interpreter
///
/// Returns the installer's status (`0` when configuration was not needed).
pub fn run_setup(
    options: &SetupOptions,
    runtime: &PythonRuntime,
    loader: &dyn InstallerLoader,
    logger: &Logger,
) -> Result<i32, SetupError> {
    logger.info(&format!(
        "installing from Java module '{}'",
        options.java_module.display()
    ));

    probe::check_architecture(
        options.req_arch.as_deref(),
        &runtime.machine,
        runtime.is_64bit(),
        logger,
    );

    let paths = InstallPaths::resolve(
        &options.install_dir,
        &runtime.platform_tag,
        &runtime.version,
    );
    match DistributionId::parse(paths.distribution.as_str()) {
        Some((platform, version)) => logger.debug(&format!(
            "binary distribution: {} (platform {}, Python {})",
            paths.distribution, platform, version
        )),
        None => logger.debug(&format!("binary distribution: {}", paths.distribution)),
    }

    if write_default_ini(&paths.ini_file, options.snap_home.as_deref(), options.force)? {
        logger.info(&format!("wrote '{}'", paths.ini_file.display()));
    }

    let archive = if archive::needs_unpack(&paths.marker_file, options.force) {
        archive::locate_archive(
            &options.java_module,
            &paths.distribution,
            &paths.install_dir,
            logger,
        )?
    } else {
        archive::expected_archive_path(
            &options.java_module,
            &paths.distribution,
            &paths.install_dir,
        )
    };
    archive::unpack_archive(
        &archive,
        &paths.marker_file,
        &paths.install_dir,
        options.force,
        logger,
    )?;

    configurator::configure_bridge(&paths, &archive, options, loader, logger)
}

/// Command-line entry point: never fails, returns the process exit status
pub fn execute(args: &SetupArgs, logger: &Logger) -> i32 {
    exit_status(try_execute(args, logger), logger)
}

/// Statuses the OS would truncate to their low byte become failures
fn exit_status(result: Result<i32, SetupError>, logger: &Logger) -> i32 {
    match result {
        Ok(code) if (0..=255).contains(&code) => code,
        Ok(code) => {
            logger.error(&format!(
                "Configuration failed: installer status {} is not a valid exit status",
                code
            ));
            EXIT_FAILURE
        }
        Err(err) => {
            err.report(logger);
            err.exit_code()
        }
    }
}

fn try_execute(args: &SetupArgs, logger: &Logger) -> Result<i32, SetupError> {
    let install_dir = resolve_install_dir(args.install_dir.as_deref())?;
    logger.debug(&format!("installation directory: {}", install_dir.display()));

    let settings = Settings::load(&install_dir).unwrap_or_else(|e| {
        logger.warn(&format!("ignoring settings: {}", e));
        Settings::default()
    });

    let python = find_python(
        args.python.as_deref().or(settings.python.as_deref()),
        logger,
    )?;
    let runtime = PythonRuntime::probe(&python, logger)?;
    let options = SetupOptions::from_args(args, install_dir, settings);
    let loader = JpyUtilLoader::new(runtime.executable.clone());

    run_setup(&options, &runtime, &loader, logger)
}

/// Explicit directory, else the directory holding this executable
fn resolve_install_dir(explicit: Option<&Path>) -> Result<PathBuf, SetupError> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => {
            let exe = std::env::current_exe()?;
            exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                SetupError::InstallDir(format!("'{}' has no parent directory", exe.display()))
            })?
        }
    };
    let absolute = if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir()?.join(dir)
    };
    Ok(normalize_path(&absolute))
}
