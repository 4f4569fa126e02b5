//! Stream sink implementation

use crate::core::{Result, Sink};
use std::io::Write;

/// Writes lines to an already-open stream it does not own
///
/// Closing is a no-op; the stream stays usable by its owner.
pub struct StreamSink {
    writer: Box<dyn Write + Send>,
    name: &'static str,
}

impl StreamSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            name: "stream",
        }
    }

    /// Sink on the process error stream (the default)
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            name: "stderr",
        }
    }

    pub fn stdout() -> Self {
        Self {
            writer: Box::new(std::io::stdout()),
            name: "stdout",
        }
    }

    pub fn from_boxed(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            name: "stream",
        }
    }
}

impl Default for StreamSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Sink for StreamSink {
    fn emit(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}
