#![deny(missing_docs)]
//! `volt_*` logging macros for the browser shell.
//!
//! The engine logs what the user never sees: refused location reads, rejected
//! API keys, failed assistant exchanges, download timer activity. The app
//! decides where those lines go. `volt_core` stays silent and only links this
//! crate from its tests.

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! volt_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! volt_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! volt_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! volt_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! volt_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Sends shell log lines to the terminal while tests run.
///
/// HTTP client and mock-server internals are filtered out so the Gemini
/// tests show only shell lines. Calling it again is harmless.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("wiremock")
        .build();

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
