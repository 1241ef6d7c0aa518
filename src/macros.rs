//! Producer-side convenience macro.
//!
//! # Examples
//!
//! ```
//! use slot_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let handle = Handle::builder()
//!     .catalog(Catalog::new(["%1 connected from %2", "load %1"]))
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! let peer: std::net::Ipv4Addr = "10.0.0.7".parse().unwrap();
//! assert!(log_record!(handle, Severity::Notice, 0, "alice", peer));
//! assert!(log_record!(handle, Severity::Info, 1, 0.75));
//!
//! handle.drain();
//! assert_eq!(sink.lines(), vec!["alice connected from 10.0.0.7", "load 0.75"]);
//! ```

/// Claim a record, fill it and publish it.
///
/// Arguments after the message code become parameters 1, 2, ... in order;
/// anything accepted by [`IntoParam`](crate::IntoParam) works. Arguments past
/// the eighth are ignored.
///
/// Evaluates to `false` if the pool was exhausted and the line was skipped.
/// Filtering by severity happens later, when the record is emitted.
#[macro_export]
macro_rules! log_record {
    ($handle:expr, $severity:expr, $code:expr $(, $arg:expr)* $(,)?) => {{
        let handle = &$handle;
        match handle.claim() {
            Some(mut record) => {
                record.set_severity($severity);
                record.set_code($code);
                #[allow(unused_mut)]
                let mut _argnum = 0usize;
                $(
                    _argnum += 1;
                    record.set_param(_argnum, $arg);
                )*
                handle.publish(record);
                true
            }
            None => false,
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;

    fn handle(capacity: usize, sink: &MemorySink) -> Handle {
        Handle::builder()
            .capacity(capacity)
            .catalog(Catalog::new(["%1 %2 %3 %4 %5 %6 %7 %8"]))
            .sink(sink.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_fills_params_in_order() {
        let sink = MemorySink::new();
        let handle = handle(4, &sink);

        assert!(log_record!(handle, Severity::Info, 0, 1, "two", 3.5, -4i64));
        handle.drain();
        assert_eq!(sink.lines(), vec!["1 two 3.5 -4    "]);
    }

    #[test]
    fn test_extra_args_ignored() {
        let sink = MemorySink::new();
        let handle = handle(4, &sink);

        assert!(log_record!(handle, Severity::Info, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10,));
        handle.drain();
        assert_eq!(sink.lines(), vec!["1 2 3 4 5 6 7 8"]);
    }

    #[test]
    fn test_returns_false_when_exhausted() {
        let sink = MemorySink::new();
        let handle = Arc::new(handle(2, &sink));

        assert!(log_record!(handle, Severity::Info, 0));
        assert!(log_record!(handle, Severity::Info, 0));
        assert!(!log_record!(handle, Severity::Info, 0));
        assert_eq!(handle.metrics().claim_failures(), 1);
    }
}
