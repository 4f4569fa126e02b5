//! Handlers: threshold, formatter and sink
//!
//! A [`Handler`] applies its own level filter, renders records with its
//! [`Formatter`] and hands the resulting line to a [`Sink`]. Handlers are
//! shared as `Arc<Handler>` so one instance may serve several loggers.

use super::error::Result;
use super::formatter::Formatter;
use super::log_level::Level;
use super::log_record::LogRecord;
use super::registry::logging_state;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// Destination for rendered lines
///
/// Implemented by [`StreamSink`](crate::sinks::StreamSink),
/// [`FileSink`](crate::sinks::FileSink) and
/// [`DatagramSink`](crate::sinks::DatagramSink).
///
/// A sink runs while its handler's lock is held. It must not log through a
/// logger that can reach the same handler, or that call deadlocks. Logging
/// through an unrelated handler is fine.
pub trait Sink: Send {
    /// Deliver one rendered line, terminator included
    fn emit(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Release the underlying resource
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

pub const DEFAULT_TERMINATOR: &str = "\n";

pub struct Handler {
    level: RwLock<Level>,
    formatter: RwLock<Arc<Formatter>>,
    terminator: String,
    sink: Mutex<Box<dyn Sink>>,
}

impl Handler {
    /// Handler with the bare-message formatter and no own threshold
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::from_boxed(Box::new(sink))
    }

    pub fn from_boxed(sink: Box<dyn Sink>) -> Self {
        Self {
            level: RwLock::new(Level::NOTSET),
            formatter: RwLock::new(Arc::new(Formatter::default())),
            terminator: DEFAULT_TERMINATOR.to_string(),
            sink: Mutex::new(sink),
        }
    }

    #[must_use]
    pub fn with_formatter(self, formatter: impl Into<Arc<Formatter>>) -> Self {
        *self.formatter.write() = formatter.into();
        self
    }

    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        *self.level.write() = level;
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    /// Takes effect for subsequent emissions
    pub fn set_formatter(&self, formatter: impl Into<Arc<Formatter>>) {
        *self.formatter.write() = formatter.into();
    }

    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    /// Own threshold if set, else the process-wide default
    pub fn effective_level(&self) -> Level {
        self.level().or_default(logging_state().default_level())
    }

    pub fn formatter(&self) -> Arc<Formatter> {
        Arc::clone(&self.formatter.read())
    }

    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }

    /// Emit `record` if it passes this handler's threshold
    ///
    /// Returns whether the record was emitted.
    pub fn handle(&self, record: &LogRecord) -> Result<bool> {
        if record.level() < self.effective_level() {
            return Ok(false);
        }
        self.emit(record)?;
        Ok(true)
    }

    /// Format, terminate and write `record`, bypassing the threshold
    pub fn emit(&self, record: &LogRecord) -> Result<()> {
        let formatter = self.formatter();
        let mut line = formatter.format(record)?;
        line.push_str(&self.terminator);
        self.sink.lock().emit(&line)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    pub fn close(&self) -> Result<()> {
        self.sink.lock().close()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("level", &self.level())
            .field("formatter", &self.formatter())
            .field("terminator", &self.terminator)
            .field("sink", &self.sink_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::core::formatter::Style;

    #[derive(Default)]
    struct Capture {
        lines: Arc<Mutex<Vec<String>>>,
        closed: Arc<Mutex<bool>>,
    }

    impl Sink for Capture {
        fn emit(&mut self, line: &str) -> Result<()> {
            self.lines.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            *self.closed.lock() = true;
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    struct Broken;

    impl Sink for Broken {
        fn emit(&mut self, _line: &str) -> Result<()> {
            Err(LoggerError::writer("sink unavailable"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    /// Reports every line it writes through a separate diagnostics logger
    struct Chatty {
        diagnostics: Arc<crate::core::logger::Logger>,
    }

    impl Sink for Chatty {
        fn emit(&mut self, line: &str) -> Result<()> {
            self.diagnostics
                .log(Level::ERROR, "wrote %d bytes", &[line.len().into()]);
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "chatty"
        }
    }

    fn capture() -> (Capture, Arc<Mutex<Vec<String>>>) {
        let sink = Capture::default();
        let lines = Arc::clone(&sink.lines);
        (sink, lines)
    }

    #[test]
    fn test_handle_respects_own_threshold() {
        let (sink, lines) = capture();
        let handler = Handler::new(sink).with_level(Level::WARNING);

        let info = LogRecord::new("svc", Level::INFO, "quiet", vec![]);
        let warn = LogRecord::new("svc", Level::WARNING, "loud", vec![]);
        assert!(!handler.handle(&info).unwrap());
        assert!(handler.handle(&warn).unwrap());

        assert_eq!(*lines.lock(), vec!["loud\n".to_string()]);
    }

    #[test]
    fn test_emit_bypasses_threshold() {
        let (sink, lines) = capture();
        let handler = Handler::new(sink).with_level(Level::CRITICAL);
        handler
            .emit(&LogRecord::new("svc", Level::DEBUG, "forced", vec![]))
            .unwrap();
        assert_eq!(lines.lock().len(), 1);
    }

    #[test]
    fn test_set_formatter_affects_later_emissions() {
        let (sink, lines) = capture();
        let handler = Handler::new(sink).with_level(Level::DEBUG);
        let record = LogRecord::new("svc", Level::INFO, "ready", vec![]);

        handler.handle(&record).unwrap();
        handler.set_formatter(
            Formatter::new(Some("%(name)s|%(message)s"), None, Style::Percent).unwrap(),
        );
        handler.handle(&record).unwrap();

        assert_eq!(
            *lines.lock(),
            vec!["ready\n".to_string(), "svc|ready\n".to_string()]
        );
    }

    #[test]
    fn test_custom_terminator() {
        let (sink, lines) = capture();
        let handler = Handler::new(sink)
            .with_level(Level::DEBUG)
            .with_terminator("\r\n");
        handler
            .handle(&LogRecord::new("svc", Level::INFO, "crlf", vec![]))
            .unwrap();
        assert_eq!(*lines.lock(), vec!["crlf\r\n".to_string()]);
    }

    #[test]
    fn test_sink_error_propagates() {
        let handler = Handler::new(Broken).with_level(Level::DEBUG);
        let err = handler
            .handle(&LogRecord::new("svc", Level::INFO, "x", vec![]))
            .unwrap_err();
        assert!(matches!(err, LoggerError::SinkFailure(_)));
    }

    #[test]
    fn test_close_reaches_sink() {
        let sink = Capture::default();
        let closed = Arc::clone(&sink.closed);
        let handler = Handler::new(sink);
        handler.close().unwrap();
        assert!(*closed.lock());
        assert_eq!(handler.sink_name(), "capture");
    }

    #[test]
    fn test_sink_may_log_through_another_handler() {
        let (sink, lines) = capture();
        let diagnostics = Arc::new(crate::core::logger::Logger::new("diagnostics"));
        diagnostics.set_level(Level::DEBUG);
        diagnostics.add_handler(Arc::new(Handler::new(sink).with_level(Level::DEBUG)));

        let handler = Handler::new(Chatty {
            diagnostics: Arc::clone(&diagnostics),
        });
        let record = LogRecord::new("svc", Level::ERROR, "hello", vec![]);
        handler.emit(&record).unwrap();

        assert_eq!(*lines.lock(), vec!["wrote 6 bytes\n".to_string()]);
    }
}
