//! Background consumer thread
//!
//! Producers only claim, fill and publish. A [`Consumer`] owns the other half
//! of the protocol: it repeatedly drains the handle's queue, emitting and
//! releasing each record, and sleeps for a short idle interval whenever the
//! queue is empty.

use super::{
    error::{LoggerError, Result},
    handle::{DrainStats, Handle},
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the consumer sleeps when it finds the queue empty
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(1);

/// How long dropping a consumer waits for the final drain
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Consumer {
    // Dropping the sender is the stop signal.
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<DrainStats>>,
}

impl Consumer {
    /// Start draining `handle` on a new thread
    pub fn spawn(handle: Arc<Handle>) -> Result<Self> {
        Self::with_idle_interval(handle, DEFAULT_IDLE_INTERVAL)
    }

    pub fn with_idle_interval(handle: Arc<Handle>, idle: Duration) -> Result<Self> {
        let (stop, stopped) = bounded::<()>(0);

        let worker = thread::Builder::new()
            .name("slot-logger-consumer".to_string())
            .spawn(move || {
                let mut total = DrainStats::default();
                loop {
                    let pass = handle.drain();
                    let idle_pass = pass.is_empty();
                    total += pass;

                    let signal = if idle_pass {
                        stopped.recv_timeout(idle)
                    } else {
                        stopped.try_recv().map_err(|e| {
                            if e.is_disconnected() {
                                RecvTimeoutError::Disconnected
                            } else {
                                RecvTimeoutError::Timeout
                            }
                        })
                    };
                    if matches!(signal, Err(RecvTimeoutError::Disconnected)) {
                        break;
                    }
                }

                // Whatever was published before the stop signal still goes out.
                total += handle.drain();
                if let Err(e) = handle.flush() {
                    eprintln!("[LOGGER ERROR] Consumer failed to flush sink: {}", e);
                }
                total
            })
            .map_err(|e| LoggerError::io_operation("spawn consumer thread", "thread::Builder::spawn failed", e))?;

        Ok(Self {
            stop: Some(stop),
            worker: Some(worker),
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    /// Stop the thread after a final drain
    ///
    /// Returns what the thread emitted over its lifetime, or `None` if it
    /// did not finish within `timeout`, panicked, or was already stopped.
    pub fn shutdown(&mut self, timeout: Duration) -> Option<DrainStats> {
        drop(self.stop.take());

        let worker = self.worker.take()?;
        let start = Instant::now();
        loop {
            if worker.is_finished() {
                return match worker.join() {
                    Ok(stats) => Some(stats),
                    Err(e) => {
                        eprintln!("[LOGGER ERROR] Consumer thread panicked during shutdown: {:?}", e);
                        None
                    }
                };
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Consumer thread did not finish within timeout. \
                     Some records may not have been emitted."
                );
                return None;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{catalog::Catalog, severity::Severity};
    use crate::sinks::MemorySink;

    #[test]
    fn test_consumer_drains_published_records() {
        let sink = MemorySink::new();
        let handle = Arc::new(
            Handle::builder()
                .catalog(Catalog::new(["n=%1"]))
                .sink(sink.clone())
                .build()
                .unwrap(),
        );
        let mut consumer = Consumer::spawn(Arc::clone(&handle)).unwrap();
        assert!(consumer.is_running());

        for i in 0..100 {
            // Spin until the consumer hands a slot back.
            loop {
                if let Some(mut record) = handle.claim() {
                    record.set_integer(1, i);
                    handle.publish(record);
                    break;
                }
                thread::yield_now();
            }
        }

        let stats = consumer.shutdown(Duration::from_secs(5)).unwrap();
        assert_eq!(stats.written, 100);
        assert!(!consumer.is_running());

        let expected: Vec<String> = (0..100).map(|i| format!("n={}", i)).collect();
        assert_eq!(sink.lines(), expected);
        assert_eq!(handle.pool_stats().free, handle.capacity());
    }

    #[test]
    fn test_shutdown_drains_backlog() {
        let sink = MemorySink::new();
        let handle = Arc::new(
            Handle::builder()
                .level(Severity::Debug)
                .catalog(Catalog::new(["%1"]))
                .sink(sink.clone())
                .build()
                .unwrap(),
        );
        // Long idle interval: only the final drain can pick these up.
        let mut consumer =
            Consumer::with_idle_interval(Arc::clone(&handle), Duration::from_secs(60)).unwrap();
        thread::sleep(Duration::from_millis(50));

        for word in ["a", "b", "c"] {
            let mut record = handle.claim().unwrap();
            record.set_string(1, word);
            handle.publish(record);
        }

        let stats = consumer.shutdown(Duration::from_secs(5)).unwrap();
        assert_eq!(stats.written, 3);
        assert_eq!(sink.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_second_shutdown_returns_none() {
        let handle = Arc::new(Handle::builder().sink(MemorySink::new()).build().unwrap());
        let mut consumer = Consumer::spawn(handle).unwrap();
        assert!(consumer.shutdown(Duration::from_secs(5)).is_some());
        assert!(consumer.shutdown(Duration::from_secs(5)).is_none());
    }
}
