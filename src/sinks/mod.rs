//! Sink implementations

pub mod file;
pub mod memory;
#[cfg(feature = "syslog")]
pub mod syslog;

pub use file::FileSink;
pub use memory::MemorySink;
#[cfg(feature = "syslog")]
pub use syslog::{Facility, SyslogSink};

pub use crate::core::Sink;
