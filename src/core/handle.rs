//! Logging handle
//!
//! A [`Handle`] ties a record [`Pool`] to the configuration used when its
//! records are emitted: the message [`Catalog`], the severity threshold and
//! the active [`Sink`]. Catalog, threshold and sink can all be replaced while
//! records are in flight; a record is rendered against whatever is current
//! when it is emitted.

use super::{
    catalog::Catalog,
    error::Result,
    format::{self, Rendered},
    metrics::PoolMetrics,
    pool::{Pool, PoolStats, RecordRef, DEFAULT_CAPACITY},
    record::Record,
    severity::Severity,
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::sinks::FileSink;
use parking_lot::{Mutex, RwLock};
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Size of the stack buffer a record is rendered into before reaching the
/// sink; longer output is truncated
pub const LINE_CAPACITY: usize = 1024;

/// What [`Handle::emit`] did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    /// Rendered and handed to the sink
    Written { truncated: bool },
    /// Below the severity threshold; nothing rendered
    Filtered,
}

/// Tally of one or more [`Handle::drain`] passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub written: u64,
    pub filtered: u64,
    /// Unknown code or sink failure; the record was still released
    pub failed: u64,
}

impl DrainStats {
    pub fn total(&self) -> u64 {
        self.written + self.filtered + self.failed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for DrainStats {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.filtered += other.filtered;
        self.failed += other.failed;
    }
}

pub struct Handle {
    pool: Pool,
    catalog: RwLock<Arc<Catalog>>,
    level: AtomicU8,
    sink: Mutex<Box<dyn Sink>>,
    metrics: PoolMetrics,
}

impl Handle {
    /// Handle with the default pool size, `Info` threshold and stdout sink
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::from_parts(
            Pool::with_valid_capacity(DEFAULT_CAPACITY),
            catalog,
            Severity::default(),
            Box::new(FileSink::stdout()),
        )
    }

    fn from_parts(pool: Pool, catalog: Catalog, level: Severity, sink: Box<dyn Sink>) -> Self {
        Self {
            pool,
            catalog: RwLock::new(Arc::new(catalog)),
            level: AtomicU8::new(level.value()),
            sink: Mutex::new(sink),
            metrics: PoolMetrics::new(),
        }
    }

    /// Claim a free record for filling in
    ///
    /// `None` means the pool is exhausted and this log line should be
    /// skipped. The failure is counted in [`PoolMetrics::claim_failures`].
    pub fn claim(&self) -> Option<RecordRef<'_>> {
        match self.pool.claim() {
            Some(record) => {
                self.metrics.record_claimed();
                Some(record)
            }
            None => {
                self.metrics.record_claim_failure();
                None
            }
        }
    }

    /// Queue a filled record for the consumer
    pub fn publish(&self, record: RecordRef<'_>) {
        self.pool.publish(record);
        self.metrics.record_published();
    }

    /// Oldest published record, if any
    pub fn next(&self) -> Option<RecordRef<'_>> {
        self.pool.next()
    }

    /// Return a record to the free list
    pub fn release(&self, record: RecordRef<'_>) {
        self.pool.release(record);
    }

    pub fn level(&self) -> Severity {
        // Only valid severities are ever stored.
        Severity::from_raw(i64::from(self.level.load(Ordering::Relaxed))).unwrap_or_default()
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.value(), Ordering::Relaxed);
    }

    /// Set the threshold from a raw syslog value
    ///
    /// Values outside 0..=7 are rejected and the current threshold is kept.
    pub fn set_level_raw(&self, level: i32) -> Result<()> {
        let level = Severity::try_from(level)?;
        self.set_level(level);
        Ok(())
    }

    /// Whether a record at `severity` would produce output
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity.value() <= self.level.load(Ordering::Relaxed)
    }

    /// The catalog currently used for rendering
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }

    /// Swap the catalog, e.g. to change language
    pub fn set_catalog(&self, catalog: impl Into<Arc<Catalog>>) {
        *self.catalog.write() = catalog.into();
    }

    /// Replace the sink; the previous one is flushed and dropped
    pub fn set_sink(&self, sink: impl Sink + 'static) {
        self.set_sink_boxed(Box::new(sink));
    }

    pub fn set_sink_boxed(&self, sink: Box<dyn Sink>) {
        let old = std::mem::replace(&mut *self.sink.lock(), sink);
        Self::retire_sink(old);
    }

    fn retire_sink(mut sink: Box<dyn Sink>) {
        if let Err(e) = sink.flush() {
            eprintln!("[LOGGER ERROR] Sink '{}' failed to flush on replacement: {}", sink.name(), e);
        }
    }

    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }

    /// Render a record with the current catalog into `buf`
    pub fn render(&self, record: &Record, buf: &mut [u8]) -> Result<Rendered> {
        format::render(&self.catalog(), record, buf)
    }

    pub fn render_to_string(&self, record: &Record) -> Result<String> {
        format::render_to_string(&self.catalog(), record)
    }

    /// Render a record and write it to the sink, unless its severity is
    /// below the threshold
    ///
    /// The caller still owns the record afterwards and must release it,
    /// whatever the outcome.
    pub fn emit(&self, record: &Record) -> Result<Emitted> {
        if !self.is_enabled(record.severity()) {
            self.metrics.record_filtered();
            return Ok(Emitted::Filtered);
        }

        let mut buf = [0u8; LINE_CAPACITY];
        let written = self.render(record, &mut buf).and_then(|rendered| {
            self.sink
                .lock()
                .write(record.severity(), rendered.text(&buf))?;
            Ok(rendered)
        });

        match written {
            Ok(rendered) => {
                self.metrics.record_emitted();
                Ok(Emitted::Written {
                    truncated: rendered.is_truncated(),
                })
            }
            Err(e) => {
                self.metrics.record_emit_failure();
                Err(e)
            }
        }
    }

    /// Emit and release everything currently queued
    ///
    /// Records that fail to render or write are counted and still released.
    pub fn drain(&self) -> DrainStats {
        let mut stats = DrainStats::default();
        while let Some(record) = self.next() {
            match self.emit(&record) {
                Ok(Emitted::Written { .. }) => stats.written += 1,
                Ok(Emitted::Filtered) => stats.filtered += 1,
                Err(_) => stats.failed += 1,
            }
            self.release(record);
        }
        stats
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Get the handle metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use slot_logger::{Catalog, Handle};
    ///
    /// let handle = Handle::new(Catalog::new(["%1"]));
    /// let metrics = handle.metrics();
    /// println!("Skipped: {}", metrics.claim_failures());
    /// println!("Exhaustion rate: {:.2}%", metrics.exhaustion_rate());
    /// ```
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    /// Create a builder for Handle
    ///
    /// # Example
    /// ```
    /// use slot_logger::prelude::*;
    ///
    /// let handle = Handle::builder()
    ///     .capacity(64)
    ///     .level(Severity::Debug)
    ///     .catalog(Catalog::new(["%1"]))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(handle.capacity(), 64);
    /// ```
    #[must_use]
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let Err(e) = self.sink.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let stats = self.pool.stats();
        if stats.queued > 0 {
            eprintln!(
                "[LOGGER WARNING] Handle dropped with {} unconsumed records (skipped claims: {})",
                stats.queued,
                self.metrics.claim_failures()
            );
        }
    }
}

/// Builder for constructing a Handle with a fluent API
///
/// # Example
/// ```
/// use slot_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let handle = Handle::builder()
///     .capacity(32)
///     .level(Severity::Warning)
///     .catalog(Catalog::new(["disk %1 at %2%%"]))
///     .sink(sink.clone())
///     .build()
///     .unwrap();
/// ```
pub struct HandleBuilder {
    capacity: usize,
    level: Severity,
    catalog: Catalog,
    sink: Option<Box<dyn Sink>>,
    timestamp_format: TimestampFormat,
}

impl HandleBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            level: Severity::default(),
            catalog: Catalog::default(),
            sink: None,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Number of record slots in the pool
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Output sink; stdout when not set
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Timestamp prefix for the default stdout sink
    ///
    /// Has no effect when a sink is set explicitly.
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Build the Handle
    ///
    /// Fails if the capacity is zero or too large.
    pub fn build(self) -> Result<Handle> {
        let pool = Pool::new(self.capacity)?;
        let timestamp_format = self.timestamp_format;
        let sink = self.sink.unwrap_or_else(|| {
            Box::new(FileSink::stdout().with_timestamp_format(timestamp_format))
        });
        Ok(Handle::from_parts(pool, self.catalog, self.level, sink))
    }
}

impl Default for HandleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::sinks::MemorySink;

    fn handle_with(sink: &MemorySink) -> Handle {
        Handle::builder()
            .capacity(4)
            .catalog(Catalog::new(["%1", "s:%1, i:%2, percent:%%"]))
            .sink(sink.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let handle = HandleBuilder::default().build().unwrap();
        assert_eq!(handle.capacity(), DEFAULT_CAPACITY);
        assert_eq!(handle.level(), Severity::Info);
        assert_eq!(handle.sink_name(), "file");
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = Handle::builder().capacity(0).build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_set_level_raw_validates() {
        let handle = Handle::new(Catalog::default());
        assert!(handle.set_level_raw(3).is_ok());
        assert_eq!(handle.level(), Severity::Error);

        assert!(handle.set_level_raw(8).is_err());
        assert!(handle.set_level_raw(-1).is_err());
        assert_eq!(handle.level(), Severity::Error);
    }

    #[test]
    fn test_emit_writes_rendered_line() {
        let sink = MemorySink::new();
        let handle = handle_with(&sink);

        let mut record = handle.claim().unwrap();
        record.set_code(1);
        record.set_string(1, "abc");
        record.set_integer(2, 42);

        assert_eq!(
            handle.emit(&record).unwrap(),
            Emitted::Written { truncated: false }
        );
        handle.release(record);
        assert_eq!(sink.lines(), vec!["s:abc, i:42, percent:%".to_string()]);
        assert_eq!(handle.metrics().emitted(), 1);
    }

    #[test]
    fn test_emit_filters_by_threshold() {
        let sink = MemorySink::new();
        let handle = handle_with(&sink);
        handle.set_level(Severity::Warning);

        let mut record = handle.claim().unwrap();
        record.set_severity(Severity::Notice);
        record.set_string(1, "hidden");
        assert_eq!(handle.emit(&record).unwrap(), Emitted::Filtered);

        record.set_severity(Severity::Warning);
        record.set_string(1, "shown");
        assert!(matches!(handle.emit(&record), Ok(Emitted::Written { .. })));
        handle.release(record);

        assert_eq!(sink.lines(), vec!["shown".to_string()]);
        assert_eq!(handle.metrics().filtered(), 1);
    }

    #[test]
    fn test_emit_unknown_code_fails() {
        let sink = MemorySink::new();
        let handle = handle_with(&sink);

        let mut record = handle.claim().unwrap();
        record.set_code(7);
        assert!(matches!(
            handle.emit(&record),
            Err(LoggerError::UnknownMessage { code: 7 })
        ));
        handle.release(record);

        assert!(sink.is_empty());
        assert_eq!(handle.metrics().emit_failures(), 1);
        assert_eq!(handle.pool_stats().free, 4);
    }

    #[test]
    fn test_emit_truncates_long_output() {
        let sink = MemorySink::new();
        let template = "%1".repeat(30);
        let handle = Handle::builder()
            .catalog(Catalog::new([template]))
            .sink(sink.clone())
            .build()
            .unwrap();

        let mut record = handle.claim().unwrap();
        record.set_string(1, &"y".repeat(47));
        assert_eq!(
            handle.emit(&record).unwrap(),
            Emitted::Written { truncated: true }
        );
        drop(record);

        assert_eq!(sink.lines()[0].len(), LINE_CAPACITY - 1);
    }

    #[test]
    fn test_drain_counts_and_releases() {
        let sink = MemorySink::new();
        let handle = handle_with(&sink);
        handle.set_level(Severity::Notice);

        for (code, severity) in [(0, Severity::Error), (5, Severity::Error), (0, Severity::Debug)] {
            let mut record = handle.claim().unwrap();
            record.set_code(code);
            record.set_severity(severity);
            record.set_string(1, "x");
            handle.publish(record);
        }

        let stats = handle.drain();
        assert_eq!(
            stats,
            DrainStats {
                written: 1,
                filtered: 1,
                failed: 1
            }
        );
        assert_eq!(handle.pool_stats().free, 4);
        assert!(handle.drain().is_empty());
    }

    #[test]
    fn test_claim_failure_counted() {
        let handle = handle_with(&MemorySink::new());
        let held: Vec<_> = (0..4).filter_map(|_| handle.claim()).collect();
        assert_eq!(held.len(), 4);
        assert!(handle.claim().is_none());
        assert_eq!(handle.metrics().claim_failures(), 1);
        assert_eq!(handle.metrics().claimed(), 4);
    }

    #[test]
    fn test_catalog_swap() {
        let sink = MemorySink::new();
        let handle = handle_with(&sink);

        let mut record = handle.claim().unwrap();
        record.set_code(1);
        record.set_string(1, "a");
        record.set_integer(2, 1);
        handle.publish(record);

        handle.set_catalog(Catalog::new(["%1", "i:%2, s:%1"]));
        handle.drain();
        assert_eq!(sink.lines(), vec!["i:1, s:a".to_string()]);
    }

    #[test]
    fn test_sink_swap() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let handle = handle_with(&first);

        crate::log_record!(handle, Severity::Info, 0, "one");
        handle.drain();
        handle.set_sink(second.clone());
        crate::log_record!(handle, Severity::Info, 0, "two");
        handle.drain();

        assert_eq!(first.lines(), vec!["one".to_string()]);
        assert_eq!(second.lines(), vec!["two".to_string()]);
    }
}
