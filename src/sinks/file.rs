//! File sink implementation

use crate::core::{LoggerError, Result, Severity, Sink, TimestampFormat};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Writes one timestamped line per record to any byte stream
///
/// Lines look like `10:30:45.123456 disk sda1 at 93%`: local wall-clock time
/// with microseconds, a space, then the rendered text.
pub struct FileSink {
    writer: Option<Box<dyn Write + Send>>,
    timestamp_format: TimestampFormat,
}

impl FileSink {
    /// Sink writing to the process's standard output
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Open `path` for appending, creating it if needed
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("open log file", path.display().to_string(), e)
            })?;

        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use slot_logger::sinks::FileSink;
    /// use slot_logger::TimestampFormat;
    ///
    /// let sink = FileSink::create("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Sink for FileSink {
    fn write(&mut self, _severity: Severity, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        if self.timestamp_format.is_none() {
            writeln!(writer, "{}", line)?;
        } else {
            writeln!(writer, "{} {}", self.timestamp_format.now(), line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
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
        let _ = self.flush();
    }
}
