//! Sink trait for rendered log lines

use super::{error::Result, severity::Severity};

/// Destination for rendered text
///
/// A handle owns exactly one sink at a time. Replacing it drops the old one,
/// which is where a sink closes whatever session it holds.
pub trait Sink: Send {
    /// Write one rendered line; `line` carries no trailing newline
    fn write(&mut self, severity: Severity, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, severity: Severity, line: &str) -> Result<()> {
        (**self).write(severity, line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
