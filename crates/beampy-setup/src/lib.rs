//! beampy-setup: unpack jpy and configure beampy
//!
//! This library exposes the setup steps for testing and integration.

pub mod archive;
pub mod common;
pub mod configurator;
pub mod errors;
pub mod probe;
pub mod setup;

pub use common::{GlobalOpts, SetupArgs};
pub use errors::SetupError;
pub use setup::{execute, run_setup, SetupOptions};
