// textwash/src/logger.rs
//! Logger initialization for the CLI.
//!
//! The library emits through the `log` facade only; this module wires it to
//! `env_logger` for the binary. `RUST_LOG` still applies unless a level is
//! forced via `--quiet` or `--debug`.

use log::LevelFilter;

/// Initializes the global logger.
///
/// A `Some(level)` forces that level regardless of `RUST_LOG`; `None` leaves
/// the environment configuration in charge. Repeated initialization (as in
/// tests) is ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let _ = builder.format_timestamp(None).try_init();
}
