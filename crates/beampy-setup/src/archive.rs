//! Locating and unpacking the jpy binary distribution
//!
//! The snap-python Java module ships one inner archive per platform/version,
//! `lib/jpy.<platform>-<python-version>.zip`. The module itself is either an
//! unpacked directory or a packaged JAR; from a JAR the inner archive is first
//! extracted into the installation directory.

use crate::errors::SetupError;
use beampy_config::paths::ARCHIVE_LIB_DIR;
use beampy_config::DistributionId;
use beampy_logger::Logger;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackOutcome {
    /// The marker file exists; nothing was touched
    AlreadyUnpacked,
    /// This many files were written
    Unpacked(usize),
}

/// Whether the binary distribution still has to be unpacked
///
/// Only when this holds is a JAR module opened; [`unpack_archive`] applies
/// the same rule to decide between unpacking and [`UnpackOutcome::AlreadyUnpacked`].
pub fn needs_unpack(marker_file: &Path, force: bool) -> bool {
    force || !marker_file.exists()
}

/// Where [`locate_archive`] puts (or finds) the inner archive, without
/// extracting anything
pub fn expected_archive_path(
    java_module: &Path,
    distribution: &DistributionId,
    install_dir: &Path,
) -> PathBuf {
    let base = if java_module.is_file() {
        install_dir
    } else {
        java_module
    };
    base.join(ARCHIVE_LIB_DIR)
        .join(distribution.archive_file_name())
}

/// Path of the inner archive for `distribution`
///
/// A JAR module has the member extracted into `install_dir/lib/`. For a
/// directory module the path is computed only; whether the file exists is
/// the unpacker's concern.
pub fn locate_archive(
    java_module: &Path,
    distribution: &DistributionId,
    install_dir: &Path,
    logger: &Logger,
) -> Result<PathBuf, SetupError> {
    if java_module.is_file() {
        let member = distribution.archive_member();
        logger.info(&format!(
            "extracting '{}' from '{}'",
            member,
            java_module.display()
        ));
        extract_member(java_module, &member, install_dir)
    } else {
        Ok(expected_archive_path(java_module, distribution, install_dir))
    }
}

fn extract_member(
    archive_path: &Path,
    member: &str,
    dest_dir: &Path,
) -> Result<PathBuf, SetupError> {
    let extraction_error = |source| SetupError::Extraction {
        archive: archive_path.to_path_buf(),
        member: member.to_string(),
        source,
    };

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(extraction_error)?;
    let mut entry = archive.by_name(member).map_err(extraction_error)?;

    let relative = entry.enclosed_name().ok_or_else(|| {
        extraction_error(zip::result::ZipError::InvalidArchive(
            "unsafe member path".into(),
        ))
    })?;
    let dest = dest_dir.join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out_file = File::create(&dest)?;
    io::copy(&mut entry, &mut out_file)?;
    Ok(dest)
}

/// Unpack `archive_path` into `dest_dir` unless `marker_file` says it
/// already happened
///
/// The marker is written by the installer, not here: a run interrupted
/// between unpacking and configuring unpacks again next time.
pub fn unpack_archive(
    archive_path: &Path,
    marker_file: &Path,
    dest_dir: &Path,
    force: bool,
    logger: &Logger,
) -> Result<UnpackOutcome, SetupError> {
    if !needs_unpack(marker_file, force) {
        logger.debug(&format!(
            "'{}' exists, binary distribution already unpacked",
            marker_file.display()
        ));
        return Ok(UnpackOutcome::AlreadyUnpacked);
    }

    if !archive_path.exists() {
        return Err(SetupError::MissingArchive(archive_path.to_path_buf()));
    }

    logger.info(&format!("unzipping '{}'", archive_path.display()));
    let written = extract_all(archive_path, dest_dir, logger)?;
    logger.debug(&format!(
        "unpacked {} files into '{}'",
        written,
        dest_dir.display()
    ));
    Ok(UnpackOutcome::Unpacked(written))
}

fn extract_all(
    archive_path: &Path,
    dest_dir: &Path,
    logger: &Logger,
) -> Result<usize, SetupError> {
    let unpack_error = |source| SetupError::Unpack {
        archive: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(unpack_error)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(unpack_error)?;

        let Some(relative) = entry.enclosed_name() else {
            logger.warn(&format!("skipping unsafe archive entry '{}'", entry.name()));
            continue;
        };
        let dest = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&dest)?;
        io::copy(&mut entry, &mut out_file)?;
        written += 1;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dest, fs::Permissions::from_mode(mode & 0o7777))?;
        }
    }

    Ok(written)
}
