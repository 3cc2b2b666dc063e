//! Architecture compatibility check
//!
//! Architecture names differ between the JVM (`os.arch`) and Python
//! (`platform.machine()`), so a mismatch is only ever a warning.

use beampy_logger::Logger;

/// JVM architecture names that denote a 64-bit machine
const ARCH_64BIT: &[&str] = &["amd64", "ia64", "x64", "x86_64"];

/// Warn when the interpreter may not match the JVM's architecture
pub fn check_architecture(
    required: Option<&str>,
    machine: &str,
    is_64bit: bool,
    logger: &Logger,
) {
    let Some(required) = required else {
        return;
    };
    let required = required.to_lowercase();
    let actual = machine.to_lowercase();

    if required != actual {
        logger.warn(&format!(
            "architecture requirement possibly not met: Python is {} but JVM requires {}",
            actual, required
        ));
    }
    if is_64bit && !ARCH_64BIT.contains(&required.as_str()) {
        logger.warn(&format!(
            "architecture requirement possibly not met: Python is 64 bit but JVM requires {}",
            required
        ));
    }
}
