pub mod cli;
pub mod controller;
pub mod matcher;
pub mod messaging;
pub mod page;
pub mod profile;
pub mod trace;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
