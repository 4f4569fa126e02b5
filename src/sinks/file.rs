//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How the log file is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileMode {
    /// `"a"`: keep existing content
    #[default]
    Append,
    /// `"w"`: truncate on open
    Truncate,
}

impl FromStr for FileMode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a" => Ok(FileMode::Append),
            "w" => Ok(FileMode::Truncate),
            other => Err(LoggerError::config(
                "FileSink",
                format!("unsupported file mode '{}', expected 'a' or 'w'", other),
            )),
        }
    }
}

/// Appends lines to a named file, flushing after every line
pub struct FileSink {
    path: PathBuf,
    mode: FileMode,
    writer: Option<BufWriter<File>>,
    closed: bool,
}

impl FileSink {
    /// Open `path` in append mode right away
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(path, FileMode::Append, false)
    }

    /// Open with an explicit mode; `delay` postpones opening to the first line
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use micro_logging::sinks::{FileMode, FileSink};
    ///
    /// let sink = FileSink::with_options("/var/log/app.log", FileMode::Truncate, true)
    ///     .unwrap();
    /// assert!(!sink.is_open());
    /// ```
    pub fn with_options(path: impl Into<PathBuf>, mode: FileMode, delay: bool) -> Result<Self> {
        let mut sink = Self {
            path: path.into(),
            mode,
            writer: None,
            closed: false,
        };
        if !delay {
            sink.open()?;
        }
        Ok(sink)
    }

    fn open(&mut self) -> Result<()> {
        let mut options = OpenOptions::new();
        options.create(true);
        match self.mode {
            FileMode::Append => options.append(true),
            FileMode::Truncate => options.write(true).truncate(true),
        };
        let file = options.open(&self.path).map_err(|e| {
            LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
        })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl Sink for FileSink {
    fn emit(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(LoggerError::sink_closed(self.path.display().to_string()));
        }
        if self.writer.is_none() {
            self.open()?;
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
