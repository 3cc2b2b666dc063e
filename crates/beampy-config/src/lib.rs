//! Installation layout and configuration files for beampy-setup
//!
//! - [`paths`]: the fixed set of files a run reads or writes
//! - [`ini`]: the default `beampy.ini` read by Python-side importers
//! - [`settings`]: optional TOML defaults for the command line

pub mod ini;
pub mod paths;
pub mod settings;

pub use ini::{render_default_ini, write_default_ini};
pub use paths::{normalize_path, DistributionId, InstallPaths};
pub use settings::{Settings, SettingsError};
