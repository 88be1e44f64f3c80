//! Logger initialization.

use colored::Colorize;
use log::{LevelFilter, SetLoggerError};
use std::io::Write;

/// Initialize `env_logger` writing coloured records to stderr.
///
/// When `RUST_LOG` is set it wins outright, e.g. `RUST_LOG=notestrip=debug`
/// to see every unchanged file and pruned directory. Otherwise other crates
/// log at `warn` and this crate at `level`.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
        builder.filter_module("notestrip", level);
    }

    builder.format(|buf, record| {
        let level = record.level();
        let label = match level {
            log::Level::Error => level.to_string().red(),
            log::Level::Warn => level.to_string().yellow(),
            log::Level::Info => level.to_string().green(),
            log::Level::Debug => level.to_string().blue(),
            log::Level::Trace => level.to_string().purple(),
        };
        writeln!(buf, "[{}] {}", label, record.args())
    });

    builder.try_init()
}
