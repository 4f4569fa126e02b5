//! Process-wide logging state
//!
//! All shared mutable state lives in one [`LoggingState`], created on first
//! access through [`logging_state`]. Initialization order:
//!
//! 1. the severity-name table, seeded with the built-in levels
//! 2. the default threshold, `Level::INFO`
//! 3. the logger table, seeded with the `root` logger wired to a stderr
//!    [`StreamSink`] and the bare-message [`Formatter`]
//!
//! Nothing in this crate runs at load time; the first call that needs the
//! state builds it.

use super::{
    error::Result,
    formatter::{Formatter, Style},
    handler::{Handler, Sink},
    log_level::{builtin_level_names, Level},
    log_record::LogValue,
    logger::Logger,
};
use crate::sinks::StreamSink;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "file")]
use crate::sinks::{FileMode, FileSink};

pub const ROOT_LOGGER_NAME: &str = "root";

pub struct LoggingState {
    pub(crate) level_names: RwLock<HashMap<i32, String>>,
    default_level: RwLock<Level>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

static STATE: Lazy<LoggingState> = Lazy::new(LoggingState::new);

/// The single accessor for process-wide logging state
pub fn logging_state() -> &'static LoggingState {
    &STATE
}

impl LoggingState {
    fn new() -> Self {
        let level_names = RwLock::new(builtin_level_names());
        let default_level = RwLock::new(Level::INFO);

        let root = Logger::new(ROOT_LOGGER_NAME);
        root.add_handler(Arc::new(Handler::new(StreamSink::stderr())));
        let mut loggers = HashMap::new();
        loggers.insert(ROOT_LOGGER_NAME.to_string(), Arc::new(root));

        Self {
            level_names,
            default_level,
            loggers: Mutex::new(loggers),
        }
    }

    /// Threshold used by loggers and handlers whose own level is `NOTSET`
    pub fn default_level(&self) -> Level {
        *self.default_level.read()
    }

    pub fn set_default_level(&self, level: Level) {
        *self.default_level.write() = level;
    }

    /// Existing logger for `name`, or a newly registered one
    ///
    /// An empty name or `"root"` yields the root logger. New loggers have
    /// no handlers and write through root's until one is added.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let name = if name.is_empty() {
            ROOT_LOGGER_NAME
        } else {
            name
        };
        let mut loggers = self.loggers.lock();
        Arc::clone(
            loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::registered(name))),
        )
    }

    pub fn root(&self) -> Arc<Logger> {
        self.get_logger(ROOT_LOGGER_NAME)
    }

    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Logger registered under `name`; see [`LoggingState::get_logger`]
///
/// # Example
///
/// ```
/// use micro_logging::get_logger;
/// use std::sync::Arc;
///
/// let a = get_logger("db");
/// let b = get_logger("db");
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(get_logger("").name(), "root");
/// ```
pub fn get_logger(name: &str) -> Arc<Logger> {
    logging_state().get_logger(name)
}

pub fn root_logger() -> Arc<Logger> {
    logging_state().root()
}

/// Arguments of [`basic_config`]
///
/// Deserializable so it can come from a configuration file:
///
/// ```
/// use micro_logging::{BasicConfig, Level, Style};
///
/// let config = BasicConfig::from_json(
///     r#"{ "level": "DEBUG", "format": "{levelname}:{message}", "style": "{" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.level, Level::DEBUG);
/// assert_eq!(config.style, Style::Brace);
/// ```
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasicConfig {
    pub level: Level,
    /// Log to this file instead of a stream
    pub filename: Option<PathBuf>,
    /// `"a"` (default) or `"w"`
    pub filemode: Option<String>,
    pub format: Option<String>,
    pub datefmt: Option<String>,
    pub style: Style,
    /// Stream used when no filename is given; stderr when `None`
    #[serde(skip)]
    pub stream: Option<Box<dyn Write + Send>>,
}

impl BasicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn filemode(mut self, filemode: impl Into<String>) -> Self {
        self.filemode = Some(filemode.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = Some(datefmt.into());
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: impl Write + Send + 'static) -> Self {
        self.stream = Some(Box::new(stream));
        self
    }
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            filename: None,
            filemode: None,
            format: None,
            datefmt: None,
            style: Style::Percent,
            stream: None,
        }
    }
}

impl fmt::Debug for BasicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicConfig")
            .field("level", &self.level)
            .field("filename", &self.filename)
            .field("filemode", &self.filemode)
            .field("format", &self.format)
            .field("datefmt", &self.datefmt)
            .field("style", &self.style)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}

/// Reconfigure the default threshold and the root logger's output
///
/// Builds the formatter and the sink first; if either fails nothing is
/// changed. Otherwise sets the default threshold and replaces every root
/// handler with the single new one.
pub fn basic_config(config: BasicConfig) -> Result<()> {
    let formatter = Formatter::new(
        config.format.as_deref(),
        config.datefmt.as_deref(),
        config.style,
    )?;

    let sink: Box<dyn Sink> = match config.filename {
        #[cfg(feature = "file")]
        Some(path) => {
            let mode = match config.filemode.as_deref() {
                Some(mode) => mode.parse()?,
                None => FileMode::Append,
            };
            Box::new(FileSink::with_options(path, mode, false)?)
        }
        #[cfg(not(feature = "file"))]
        Some(path) => {
            return Err(super::error::LoggerError::config(
                "basic_config",
                format!(
                    "logging to '{}' requires the `file` feature",
                    path.display()
                ),
            ))
        }
        None => Box::new(match config.stream {
            Some(stream) => StreamSink::from_boxed(stream),
            None => StreamSink::stderr(),
        }),
    };
    let handler = Arc::new(Handler::from_boxed(sink).with_formatter(formatter));

    let state = logging_state();
    state.set_default_level(config.level);
    let previous = state.root().replace_handlers(vec![handler]);
    for old in previous {
        if let Err(e) = old.flush() {
            eprintln!("[LOGGER WARNING] Failed to flush replaced root handler: {}", e);
        }
    }
    Ok(())
}

/// Log on the root logger at TRACE
pub fn trace(template: &str, args: &[LogValue]) {
    root_logger().trace(template, args);
}

pub fn debug(template: &str, args: &[LogValue]) {
    root_logger().debug(template, args);
}

pub fn info(template: &str, args: &[LogValue]) {
    root_logger().info(template, args);
}

pub fn warning(template: &str, args: &[LogValue]) {
    root_logger().warning(template, args);
}

pub fn error(template: &str, args: &[LogValue]) {
    root_logger().error(template, args);
}

pub fn critical(template: &str, args: &[LogValue]) {
    root_logger().critical(template, args);
}

/// Log `error` on the root logger; see [`Logger::exception_from`]
pub fn exception(error: &(dyn Error + 'static), template: &str, args: &[LogValue]) {
    root_logger().exception_from(error, template, args);
}
