#![deny(missing_docs)]
//! Shared logging utilities for the funnel workspace.
//!
//! This crate provides the `funnel_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is stamped
//! with the session clock of the current thread, so logs from a virtual-clock
//! test read the same as logs from a live run.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the current session clock reading, in milliseconds.
    static CLOCK_MILLIS: Cell<u64> = const { Cell::new(0) };
}

/// Sets the session clock reading for the current thread.
/// The controller calls this whenever it observes its scheduler's clock.
pub fn set_clock_millis(millis: u64) {
    CLOCK_MILLIS.with(|v| v.set(millis));
}

/// Retrieves the session clock reading for the current thread.
/// Returns 0 if the clock has not been set.
pub fn clock_millis() -> u64 {
    CLOCK_MILLIS.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! funnel_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[t={}ms] {}", $crate::clock_millis(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! funnel_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[t={}ms] {}", $crate::clock_millis(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! funnel_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[t={}ms] {}", $crate::clock_millis(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! funnel_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[t={}ms] {}", $crate::clock_millis(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! funnel_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[t={}ms] {}", $crate::clock_millis(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have won the race to install the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
