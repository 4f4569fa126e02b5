//! Basic logger usage example
//!
//! Demonstrates named loggers, thresholds and the printf-style macros.
//!
//! Run with: cargo run --example basic_usage

use micro_logging::prelude::*;
use micro_logging::{debug, error, info, trace, warning};

fn main() -> Result<()> {
    println!("=== Micro Logging - Basic Usage Example ===\n");

    basic_config(
        BasicConfig::new()
            .level(Level::TRACE)
            .format("%(levelname)-8s %(name)s: %(message)s")
            .stream(std::io::stdout()),
    )?;

    let logger = get_logger("demo");

    // Log messages at different levels
    println!("1. Logging at different levels:");
    trace!(logger, "This is a trace message");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warning!(logger, "This is a warning message");
    error!(logger, "This is an error message");
    logger.critical("This is a critical message", &[]);

    println!("\n2. Deferred arguments:");
    info!(logger, "user %s logged in from %s (attempt %d)", "alice", "10.0.0.7", 2);
    info!(logger, "load average %.2f", 0.4172);

    println!("\n3. Logger threshold set to WARNING - trace to info won't show:");
    logger.set_level(Level::WARNING);
    debug!(logger, "Debug message (hidden)");
    info!(logger, "Info message (hidden)");
    warning!(logger, "Warning message (visible)");
    println!("   filtered so far: {}", logger.metrics().records_filtered());

    println!("\n4. Custom level:");
    micro_logging::register_level(25, "NOTICE");
    logger.set_level(Level::NOTSET);
    micro_logging::log!(logger, Level::new(25), "a %s-level event", "NOTICE");

    println!("\n5. Root logger:");
    micro_logging::warning("root says %s", &["hello".into()]);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
