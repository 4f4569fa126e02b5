//! Core logger types and traits

pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
mod template;

pub use error::{LoggerError, Result};
pub use formatter::{
    local_time, utc_time, ChainRenderer, ExceptionRenderer, Formatter, Style, TimeConverter,
    TimeParts, DEFAULT_DATE_FORMAT, RECORD_FIELDS,
};
pub use handler::{Handler, Sink, DEFAULT_TERMINATOR};
pub use log_level::{level_for_name, level_name, register_level, Level};
pub use log_record::{ExceptionInfo, LogRecord, LogValue, UNKNOWN_MODULE};
pub use logger::Logger;
pub use metrics::LoggerMetrics;
pub use registry::{
    basic_config, get_logger, logging_state, root_logger, BasicConfig, LoggingState,
    ROOT_LOGGER_NAME,
};
