//! Default `beampy.ini`
//!
//! Only `import beampy` reads this file. The commented keys document optional
//! settings and are never parsed here.

use std::fs;
use std::io;
use std::path::Path;

/// Text of a fresh `beampy.ini`. A missing home hint is written as `None`,
/// which the Python side treats as "not configured".
pub fn render_default_ini(snap_home: Option<&str>) -> String {
    format!(
        "[DEFAULT]\n\
         snap_home = {}\n\
         # extra_classpath: target/classes\n\
         # extra_options: -Djava.awt.headless=false\n\
         # max_mem: 4G\n\
         # debug: False\n",
        snap_home.unwrap_or("None")
    )
}

/// Write the default ini unless it already exists. `force` overwrites.
///
/// Returns `true` when the file was (re)written.
pub fn write_default_ini(path: &Path, snap_home: Option<&str>, force: bool) -> io::Result<bool> {
    if !force && path.exists() {
        return Ok(false);
    }
    fs::write(path, render_default_ini(snap_home))?;
    Ok(true)
}
