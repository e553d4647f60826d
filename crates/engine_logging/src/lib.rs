#![deny(missing_docs)]
//! Logging macros shared by the probe crates.
//!
//! Everything goes through the `log` facade; the binary decides where records
//! end up. Library code logs with the `engine_*` macros so the call sites stay
//! uniform and can be rerouted in one place.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message. Used for per-attempt detail.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message. Used for run and per-target progress.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message. Used when a run faults.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a stderr logger for tests.
///
/// Debug builds log at debug level so per-attempt failures show up in test
/// output. Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("probe_")
        .build();

    // A logger set by an earlier test is fine.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
}
