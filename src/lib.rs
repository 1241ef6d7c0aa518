//! # Slot Logger
//!
//! Deferred-formatting message logging over a fixed pool of records.
//!
//! Producers claim a pre-allocated record, fill in a message code, a
//! severity and up to eight typed parameters, and publish it. A consumer
//! later takes records off the queue in publication order, renders them
//! against a message catalog and writes the text to a sink.
//!
//! ## Features
//!
//! - **No allocation on the hot path**: records live in a fixed arena and
//!   move between a free list and a FIFO queue
//! - **Deferred formatting**: parameters are stored raw; templates are only
//!   expanded when a record is emitted
//! - **Swappable catalogs**: change the language of every message at runtime
//! - **Multiple Sinks**: file, stdout, syslog and in-memory
//!
//! ## Example
//!
//! ```
//! use slot_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let handle = Handle::builder()
//!     .catalog(Catalog::new(["s:%1, i:%2, f:%3, percent:%%"]))
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! let mut record = handle.claim().expect("pool exhausted");
//! record.set_severity(Severity::Notice);
//! record.set_string(1, "string literal");
//! record.set_integer(2, 42);
//! record.set_real(3, 42.0);
//! handle.publish(record);
//!
//! handle.drain();
//! assert_eq!(sink.lines(), vec!["s:string literal, i:42, f:42, percent:%"]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Catalog, Consumer, DrainStats, Emitted, Handle, HandleBuilder, IntoParam, LoggerError,
        Param, PoolMetrics, Record, RecordRef, Result, Severity, Sink, TimestampFormat,
    };
    pub use crate::log_record;
    pub use crate::sinks::{FileSink, MemorySink};
    #[cfg(feature = "syslog")]
    pub use crate::sinks::{Facility, SyslogSink};
}

pub use core::{
    render, render_to_string, Catalog, Consumer, DrainStats, Emitted, Handle, HandleBuilder,
    IntoParam, LoggerError, Param, ParamKind, ParamStr, Pool, PoolMetrics, PoolStats, Record,
    RecordRef, Rendered, Result, Severity, Sink, SpinLock, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{FileSink, MemorySink};
#[cfg(feature = "syslog")]
pub use sinks::{Facility, SyslogSink};
