//! Basic slot_logger usage example
//!
//! Demonstrates claiming, filling and publishing records, then draining them
//! to stdout under different severity thresholds and catalogs.
//!
//! Run with: cargo run --example basic_usage

use slot_logger::prelude::*;
use std::net::Ipv4Addr;

const USER_LOGIN: u32 = 0;
const DISK_USAGE: u32 = 1;

fn english() -> Catalog {
    Catalog::new(["user %1 logged in from %2", "disk %1 at %2%%"])
}

fn french() -> Catalog {
    Catalog::new(["l'utilisateur %1 s'est connecté depuis %2", "disque %1 rempli à %2%%"])
}

fn main() -> Result<()> {
    println!("=== Slot Logger - Basic Usage Example ===\n");

    let handle = Handle::builder()
        .capacity(16)
        .level(Severity::Info)
        .catalog(english())
        .build()?;

    println!("1. Filling a record by hand:");
    if let Some(mut record) = handle.claim() {
        record.set_code(USER_LOGIN);
        record.set_severity(Severity::Notice);
        record.set_string(1, "alice");
        record.set_param(2, Ipv4Addr::new(192, 168, 1, 20));
        handle.publish(record);
    }
    handle.drain();

    println!("\n2. The log_record! macro:");
    log_record!(handle, Severity::Warning, DISK_USAGE, "sda1", 93.5);
    log_record!(handle, Severity::Debug, DISK_USAGE, "sdb1", 12);
    let stats = handle.drain();
    println!("   written: {}, filtered: {}", stats.written, stats.filtered);

    println!("\n3. Switching the catalog while records are queued:");
    log_record!(handle, Severity::Notice, USER_LOGIN, "bob", Ipv4Addr::LOCALHOST);
    handle.set_catalog(french());
    handle.drain();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
