//! Core pool, record and formatting types

pub mod catalog;
pub mod consumer;
pub mod error;
pub mod format;
pub mod handle;
pub mod metrics;
pub mod param;
pub mod pool;
pub mod record;
pub mod severity;
pub mod sink;
pub mod spin;
pub mod timestamp;

pub use catalog::Catalog;
pub use consumer::{Consumer, DEFAULT_IDLE_INTERVAL, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use format::{render, render_to_string, Rendered};
pub use handle::{DrainStats, Emitted, Handle, HandleBuilder, LINE_CAPACITY};
pub use metrics::PoolMetrics;
pub use param::{IntoParam, Param, ParamKind, ParamStr, PARAM_STR_MAX};
pub use pool::{Pool, PoolStats, RecordRef, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use record::{Record, PARAM_MAX, RECORD_SIZE};
pub use severity::Severity;
pub use sink::Sink;
pub use spin::SpinLock;
pub use timestamp::TimestampFormat;
