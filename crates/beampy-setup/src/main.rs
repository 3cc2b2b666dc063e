use beampy_setup::common::log_panics;
use beampy_setup::errors::EXIT_FAILURE;
use beampy_setup::{execute, SetupArgs};
use clap::Parser;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

fn main() {
    let args = SetupArgs::parse();

    let logger = match args.global.build_logger() {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("Failed to open log file: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };
    log_panics(Arc::clone(&logger));

    let code = panic::catch_unwind(AssertUnwindSafe(|| execute(&args, &logger)))
        .unwrap_or(EXIT_FAILURE);

    std::process::exit(code);
}
