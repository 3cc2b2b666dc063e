//! Python side of beampy-setup
//!
//! The bridge is configured for a specific Python interpreter. This crate:
//! 1. Finds and probes that interpreter (platform tag, version, architecture)
//! 2. Loads jpy's installer module once it has been unpacked and runs it

pub mod discovery;
pub mod errors;
pub mod installer;

pub use discovery::{find_python, DiscoveryError, PythonRuntime};
pub use errors::BridgeError;
pub use installer::{ConfigWriter, InstallerLoader, JpyUtilLoader, WriteRequest};
