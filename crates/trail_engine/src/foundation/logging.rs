//! Logging setup for hosts of the trail engine
//!
//! The crate itself logs through the `log` macros; installing a logger is
//! left to the host.

/// Initialize logging with a default filter used when `RUST_LOG` is unset
///
/// Returns an error if a global logger has already been installed, which
/// callers running several demos in one process may safely ignore.
pub fn init_with_level(default_level: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
}
