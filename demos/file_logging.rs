//! File logging example
//!
//! Demonstrates writing to an append-mode log file, loading the catalog from
//! JSON, and switching to syslog when a local daemon is available.
//!
//! Run with: cargo run --example file_logging

use slot_logger::prelude::*;

const CATALOG_JSON: &str = r#"[
    "service %1 started (pid %2)",
    "request from %1 took %2 ms",
    "service %1 stopping"
]"#;

fn main() -> Result<()> {
    println!("=== Slot Logger - File Logging Example ===\n");

    let handle = Handle::builder()
        .level(Severity::Debug)
        .catalog(Catalog::from_json(CATALOG_JSON)?)
        .sink(FileSink::create("application.log")?.with_timestamp_format(TimestampFormat::Rfc3339))
        .build()?;

    println!("1. Logging to file:");
    log_record!(handle, Severity::Notice, 0, "demo", std::process::id());
    for ms in [12.5, 3.25, 480.0] {
        let peer: std::net::Ipv4Addr = "10.1.2.3".parse().expect("valid address");
        log_record!(handle, Severity::Info, 1, peer, ms);
    }
    let stats = handle.drain();
    println!("   {} lines written", stats.written);

    println!("\n2. Switching to syslog:");
    #[cfg(unix)]
    match SyslogSink::open("file_logging", Facility::User) {
        Ok(sink) => {
            handle.set_sink(sink.with_pid(true));
            println!("   sending to {}", slot_logger::sinks::syslog::DEFAULT_SOCKET);
        }
        Err(e) => println!("   no local syslog daemon ({}), staying on file", e),
    }
    log_record!(handle, Severity::Notice, 2, "demo");
    handle.drain();
    handle.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
