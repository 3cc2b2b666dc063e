use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::discovery::DiscoveryError;

/// Errors that can occur while talking to the bridge's installer
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Installer module not found: {}", .0.display())]
    InstallerMissing(PathBuf),

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' failed without reporting a status (exit code {code}): {detail}")]
    NoStatus {
        command: String,
        code: i32,
        detail: String,
    },

    #[error("'{0}' was terminated before reporting a status")]
    Terminated(String),

    #[error("Python interpreter error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
