//! Integration tests for beampy-setup

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("beampy-setup");
    cmd.env_remove("BEAMPY_CONFIG");
    cmd
}

#[test]
fn test_version() {
    setup_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("beampy-setup"));
}

#[test]
fn test_help() {
    setup_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configures beampy"))
        .stdout(predicate::str::contains("--java_module"));
}

#[test]
fn test_java_module_is_required() {
    setup_cmd().assert().failure();
}

#[test]
fn test_missing_interpreter_exits_10() {
    let home = TempDir::new().expect("temp dir");
    setup_cmd()
        .arg("--install_dir")
        .arg(home.path())
        .arg("--java_module")
        .arg(home.path())
        .arg("--python")
        .arg(home.path().join("no-such-python"))
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Configuration failed"));
}

#[test]
fn test_log_file_receives_output() {
    let home = TempDir::new().expect("temp dir");
    let log_file = home.path().join("beampyutil.log");
    setup_cmd()
        .arg("--install_dir")
        .arg(home.path())
        .arg("--java_module")
        .arg(home.path())
        .arg("--python")
        .arg(home.path().join("no-such-python"))
        .arg("--log_file")
        .arg(&log_file)
        .assert()
        .code(10)
        .stderr(predicate::str::is_empty());

    let log = fs::read_to_string(&log_file).expect("log file");
    assert!(log.contains("ERROR Configuration failed"));
}

/// Installation directory, a directory-layout Java module and a fake Python
/// that answers the interpreter probe and plays jpyutil
#[cfg(unix)]
struct SetupHarness {
    root: TempDir,
    install_dir: PathBuf,
    java_module: PathBuf,
    python: PathBuf,
}

#[cfg(unix)]
impl SetupHarness {
    fn new() -> io::Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new()?;
        let install_dir = root.path().join("snap").join("modules").join("beampy");
        fs::create_dir_all(&install_dir)?;
        let java_module = root.path().join("snap-python");
        fs::create_dir_all(java_module.join("lib"))?;

        let python = root.path().join("fake-python");
        fs::write(&python, FAKE_PYTHON)?;
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755))?;

        Ok(Self {
            root,
            install_dir,
            java_module,
            python,
        })
    }

    fn write_archive(&self, with_installer: bool) -> io::Result<()> {
        let path = self
            .java_module
            .join("lib")
            .join("jpy.linux-x86_64-3.10.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(path)?);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("jpy.cpython-310-x86_64-linux-gnu.so", options)?;
        writer.write_all(b"ELF")?;
        if with_installer {
            writer.start_file("jpyutil.py", options)?;
            writer.write_all(b"def write_config_files(**kwargs):\n    return 0\n")?;
        }
        writer.finish()?;
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = setup_cmd();
        cmd.arg("--install_dir")
            .arg(&self.install_dir)
            .arg("--java_module")
            .arg(&self.java_module)
            .arg("--python")
            .arg(&self.python)
            .arg("--snap_home")
            .arg("/opt/snap");
        cmd
    }

    fn installer_calls(&self) -> Vec<String> {
        fs::read_to_string(self.install_dir.join("installer-calls.txt"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.install_dir.join(name)
    }

    fn root(&self) -> &Path {
        self.root.path()
    }
}

/// `$#` is 2 for the probe (`-c <script>`); the installer bootstrap gets
/// `-c <script> <module_dir> <module> <out_dir> <java_home> <req_java> <req_py>`
#[cfg(unix)]
const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$#" -le 2 ]; then
  printf 'linux-x86_64\n3.10\nx86_64\n64\n'
  exit 0
fi
if [ -n "$FAKE_JPY_RAISE" ]; then
  echo 'RuntimeError: boom' >&2
  exit 1
fi
out_dir="$5"
: > "$out_dir/jpyconfig.properties"
: > "$out_dir/jpyconfig.py"
: > "$out_dir/jpy.linux-x86_64-3.10.info"
printf '%s|%s|%s|%s\n' "$4" "$6" "$7" "$8" >> "$out_dir/installer-calls.txt"
printf 'JPY_STATUS=%s\n' "${FAKE_JPY_STATUS:-0}"
"#;

#[test]
#[cfg(unix)]
fn test_directory_layout_end_to_end() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command().assert().success();

    let ini = fs::read_to_string(env.path("beampy.ini")).expect("beampy.ini");
    assert!(ini.contains("snap_home = /opt/snap"));
    assert!(env.path("jpyutil.py").is_file());
    assert!(env.path("jpyconfig.properties").is_file());
    assert!(env.path("jpyconfig.py").is_file());
    assert_eq!(env.installer_calls(), vec!["jpyutil||0|0"]);
}

#[test]
#[cfg(unix)]
fn test_second_run_does_not_invoke_installer() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command().assert().success();
    env.command()
        .assert()
        .success()
        .stderr(predicate::str::contains("unzipping").not());

    assert_eq!(env.installer_calls().len(), 1);
}

#[test]
#[cfg(unix)]
fn test_force_and_requirement_flags() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");
    fs::create_dir_all(env.root().join("jre")).expect("jre");

    env.command().assert().success();
    env.command().args(["-f", "-j", "-p"]).assert().success();

    let jre = env.root().join("jre");
    assert_eq!(
        env.installer_calls(),
        vec![
            format!("jpyutil|{}|0|0", jre.display()),
            format!("jpyutil|{}|1|1", jre.display()),
        ]
    );
}

#[test]
#[cfg(unix)]
fn test_missing_archive_exits_10() {
    let env = SetupHarness::new().expect("harness");

    env.command()
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Can't find binary distribution"))
        .stderr(predicate::str::contains("jpy.linux-x86_64-3.10.zip"))
        .stderr(predicate::str::contains("https://github.com/bcdev/jpy"));

    assert!(!env.path("jpyconfig.properties").exists());
    assert!(!env.path("jpyconfig.py").exists());
}

#[test]
#[cfg(unix)]
fn test_missing_installer_exits_20() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(false).expect("archive");

    env.command()
        .assert()
        .code(20)
        .stderr(predicate::str::contains("Missing Python module"));

    assert!(env.path("beampy.ini").is_file());
    assert!(env.installer_calls().is_empty());
}

#[test]
#[cfg(unix)]
fn test_installer_status_is_exit_status() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command().env("FAKE_JPY_STATUS", "3").assert().code(3);
}

#[test]
#[cfg(unix)]
fn test_installer_status_beyond_exit_range_exits_10() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command()
        .env("FAKE_JPY_STATUS", "256")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("installer status 256"));
}

#[test]
#[cfg(unix)]
fn test_raising_installer_exits_10() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command()
        .env("FAKE_JPY_RAISE", "1")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Configuration failed"))
        .stderr(predicate::str::contains("RuntimeError: boom"));

    assert!(env.installer_calls().is_empty());
}

#[test]
#[cfg(unix)]
fn test_architecture_mismatch_only_warns() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");

    env.command()
        .args(["--req_arch", "arm64"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Python is x86_64 but JVM requires arm64",
        ));
}

#[test]
#[cfg(unix)]
fn test_settings_file_selects_python() {
    let env = SetupHarness::new().expect("harness");
    env.write_archive(true).expect("archive");
    fs::write(
        env.path("beampy-setup.toml"),
        format!("python = \"{}\"\n", env.python.display()),
    )
    .expect("settings");

    setup_cmd()
        .arg("--install_dir")
        .arg(&env.install_dir)
        .arg("--java_module")
        .arg(&env.java_module)
        .assert()
        .success();

    let ini = fs::read_to_string(env.path("beampy.ini")).expect("beampy.ini");
    assert!(ini.contains("snap_home = None"));
    assert_eq!(env.installer_calls().len(), 1);
}
