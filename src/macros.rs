//! Logging macros for ergonomic argument capture.
//!
//! The logger methods take their arguments as a `&[LogValue]` slice; these
//! macros convert each argument with `LogValue::from` so call sites read
//! like ordinary printf-style logging. Interpolation still happens only if
//! the event passes the logger's threshold.
//!
//! # Examples
//!
//! ```
//! use micro_logging::prelude::*;
//! use micro_logging::{info, warning};
//!
//! let logger = get_logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With arguments
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//!
//! // With a module tag
//! warning!(logger, module: "tls", "certificate expires in %d days", 6);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use micro_logging::prelude::*;
/// # let logger = Logger::new("doc");
/// use micro_logging::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR, "Error code: %d", 500);
/// log!(logger, Level::new(25), module: "billing", "%s charged %.2f", "acme", 12.5);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, module: $module:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_with_module(
            $level,
            $template,
            &[$($crate::LogValue::from($arg)),*],
            ::core::option::Option::Some($module),
        )
    };
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $template, &[$($crate::LogValue::from($arg)),*])
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use micro_logging::prelude::*;
/// # let logger = Logger::new("doc");
/// # logger.set_level(Level::TRACE);
/// use micro_logging::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: %d", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use micro_logging::prelude::*;
/// # let logger = Logger::new("doc");
/// use micro_logging::info;
/// info!(logger, "Application started");
/// info!(logger, "User %s logged in", "alice");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARNING, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use micro_logging::prelude::*;
/// # let logger = Logger::new("doc");
/// use micro_logging::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: %d, message: %s", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::CRITICAL, $($arg)+)
    };
}
