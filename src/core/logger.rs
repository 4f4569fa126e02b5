//! Named logger implementation

use super::{
    handler::Handler,
    log_level::Level,
    log_record::{ExceptionInfo, LogRecord, LogValue},
    metrics::LoggerMetrics,
    registry::logging_state,
};
use crate::core::error::Result;
use parking_lot::RwLock;
use std::error::Error;
use std::sync::Arc;

/// Named, leveled event source
///
/// Loggers are normally obtained from [`get_logger`](crate::get_logger),
/// which returns the same `Arc<Logger>` for the same name. Dispatch is
/// synchronous: every attached handler runs on the calling thread, in
/// attachment order.
///
/// A registered logger with no handlers of its own writes through the root
/// logger's handlers. Its own threshold still decides what is accepted.
/// Standalone loggers from [`Logger::new`] never fall back.
pub struct Logger {
    name: String,
    level: RwLock<Level>,
    handlers: RwLock<Vec<Arc<Handler>>>,
    uses_root_handlers: bool,
    /// Metrics for observability (emitted, filtered, handler failures)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a standalone logger that is not registered by name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(Level::NOTSET),
            handlers: RwLock::new(Vec::new()),
            uses_root_handlers: false,
            metrics: LoggerMetrics::new(),
        }
    }

    /// Logger created by the registry for a non-root name
    pub(crate) fn registered(name: impl Into<String>) -> Self {
        Self {
            uses_root_handlers: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    /// `Level::NOTSET` defers to the process-wide default
    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    /// Own threshold if set, else the process-wide default
    pub fn effective_level(&self) -> Level {
        self.level().or_default(logging_state().default_level())
    }

    #[inline]
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    /// Append `handler`; the same handler may be added more than once
    pub fn add_handler(&self, handler: Arc<Handler>) {
        self.handlers.write().push(handler);
    }

    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.handlers.read().clone()
    }

    /// Swap the whole handler list, returning the previous one
    pub fn replace_handlers(&self, handlers: Vec<Arc<Handler>>) -> Vec<Arc<Handler>> {
        std::mem::replace(&mut *self.handlers.write(), handlers)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        self.log_with_module(level, template, args, None);
    }

    /// Log with an explicit module tag (`<?>` when `None`)
    pub fn log_with_module(
        &self,
        level: Level,
        template: &str,
        args: &[LogValue],
        module: Option<&str>,
    ) {
        if !self.is_enabled_for(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(self.name.as_str(), level, template, args.to_vec())
            .with_module(module);
        self.dispatch(&record);
    }

    /// Log a record carrying a structured exception payload
    ///
    /// Handlers render the payload through their formatter's
    /// [`ExceptionRenderer`](crate::ExceptionRenderer).
    pub fn log_exc_info(
        &self,
        level: Level,
        template: &str,
        args: &[LogValue],
        exception_info: ExceptionInfo,
    ) {
        if !self.is_enabled_for(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(self.name.as_str(), level, template, args.to_vec())
            .with_exception(exception_info);
        self.dispatch(&record);
    }

    /// Fan out `record` to every handler, isolating failures
    ///
    /// A handler that returns an error or panics is reported on stderr and
    /// counted; the remaining handlers still receive the record.
    fn dispatch(&self, record: &LogRecord) {
        self.metrics.record_emitted();

        // Snapshot so handlers never run under the list lock
        let mut handlers = self.handlers();
        if handlers.is_empty() && self.uses_root_handlers {
            handlers = logging_state().root().handlers();
        }

        for (idx, handler) in handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.handle(record)
            }));

            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Handler #{} ({}) of logger '{}' failed: {}",
                        idx,
                        handler.sink_name(),
                        self.name,
                        e
                    );
                    self.metrics.record_handler_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Handler #{} of logger '{}' panicked: {}. \
                         Other handlers continue to function.",
                        idx, self.name, panic_msg
                    );
                    self.metrics.record_handler_failure();
                }
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        for handler in self.handlers() {
            handler.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn trace(&self, template: &str, args: &[LogValue]) {
        self.log(Level::TRACE, template, args);
    }

    #[inline]
    pub fn debug(&self, template: &str, args: &[LogValue]) {
        self.log(Level::DEBUG, template, args);
    }

    #[inline]
    pub fn info(&self, template: &str, args: &[LogValue]) {
        self.log(Level::INFO, template, args);
    }

    #[inline]
    pub fn warning(&self, template: &str, args: &[LogValue]) {
        self.log(Level::WARNING, template, args);
    }

    #[inline]
    pub fn warn(&self, template: &str, args: &[LogValue]) {
        self.warning(template, args);
    }

    #[inline]
    pub fn error(&self, template: &str, args: &[LogValue]) {
        self.log(Level::ERROR, template, args);
    }

    #[inline]
    pub fn critical(&self, template: &str, args: &[LogValue]) {
        self.log(Level::CRITICAL, template, args);
    }

    /// Log at ERROR with `error` and its source chain appended to the message
    ///
    /// # Example
    ///
    /// ```
    /// use micro_logging::Logger;
    ///
    /// let logger = Logger::new("loader");
    /// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    /// logger.exception_from(&err, "startup failed after %d attempts", &[3.into()]);
    /// ```
    pub fn exception_from(
        &self,
        error: &(dyn Error + 'static),
        template: &str,
        args: &[LogValue],
    ) {
        if !self.is_enabled_for(Level::ERROR) {
            self.metrics.record_filtered();
            return;
        }

        let traceback = ExceptionInfo::from_error(error).render();
        // Only templates with arguments go through %-interpolation
        let traceback = if args.is_empty() {
            traceback
        } else {
            traceback.replace('%', "%%")
        };
        let message = format!("{}\n{}", template, traceback);
        self.log(Level::ERROR, &message, args);
    }

    /// Same as [`Logger::exception_from`]; the error must be passed explicitly
    #[inline]
    pub fn exception(&self, error: &(dyn Error + 'static), template: &str, args: &[LogValue]) {
        self.exception_from(error, template, args);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
