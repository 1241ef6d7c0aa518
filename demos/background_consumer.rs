//! Background consumer example
//!
//! Demonstrates several producer threads sharing one handle while a
//! consumer thread emits their records in publication order.
//!
//! Run with: cargo run --example background_consumer

use slot_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Slot Logger - Background Consumer Example ===\n");

    let handle = Arc::new(
        Handle::builder()
            .capacity(8)
            .catalog(Catalog::new(["worker %1 step %2"]))
            .build()?,
    );
    let mut consumer = Consumer::spawn(Arc::clone(&handle))?;

    let workers: Vec<_> = (0..4u32)
        .map(|worker| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                let mut skipped = 0;
                for step in 0..10 {
                    if !log_record!(handle, Severity::Info, 0, worker, step) {
                        skipped += 1;
                    }
                    thread::sleep(Duration::from_millis(1));
                }
                skipped
            })
        })
        .collect();

    let skipped: u32 = workers
        .into_iter()
        .map(|w| w.join().unwrap_or_default())
        .sum();

    if let Some(stats) = consumer.shutdown(Duration::from_secs(5)) {
        println!("\n   emitted {} records, {} skipped on exhaustion", stats.written, skipped);
    }
    println!(
        "   pool exhaustion rate: {:.1}%",
        handle.metrics().exhaustion_rate()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
