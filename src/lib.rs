//! # Micro Logging
//!
//! A lightweight logging facade: named loggers filter events by severity,
//! fan them out to handlers, and handlers render each record through a
//! pluggable formatter before writing it to a stream, a file or a UDP
//! collector.
//!
//! ## Features
//!
//! - **Deferred Formatting**: message arguments are interpolated only for
//!   events that pass the logger's threshold
//! - **Two Filters**: loggers and handlers each carry a threshold
//! - **Format Strings**: `%(levelname)s:%(message)s` or `{levelname}:{message}`
//! - **Extensible Levels**: any integer is a valid severity
//!
//! ```
//! use micro_logging::prelude::*;
//! use micro_logging::info;
//!
//! let logger = get_logger("svc");
//! info!(logger, "started %s", "v1");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        basic_config, get_logger, root_logger, BasicConfig, ChainRenderer, ExceptionInfo,
        ExceptionRenderer, Formatter, Handler, Level, LogRecord, LogValue, Logger,
        LoggerError, Result, Sink, Style,
    };
    pub use crate::sinks::StreamSink;

    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;

    #[cfg(feature = "datagram")]
    pub use crate::sinks::DatagramSink;
}

pub use crate::core::registry::{critical, debug, error, exception, info, trace, warning};
pub use crate::core::{
    basic_config, get_logger, level_for_name, level_name, local_time, logging_state,
    register_level, root_logger, utc_time, BasicConfig, ChainRenderer, ExceptionInfo,
    ExceptionRenderer, Formatter, Handler, Level, LogRecord, LogValue, Logger, LoggerError,
    LoggerMetrics, LoggingState, Result, Sink, Style, TimeConverter, TimeParts,
    DEFAULT_DATE_FORMAT, DEFAULT_TERMINATOR, RECORD_FIELDS, ROOT_LOGGER_NAME, UNKNOWN_MODULE,
};
