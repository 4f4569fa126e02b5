//! File logging example
//!
//! Demonstrates configuring the root logger to write to a file and sharing
//! one file handler between several loggers.
//!
//! Run with: cargo run --example file_logging

use micro_logging::prelude::*;
use micro_logging::sinks::FileMode;
use micro_logging::{error, info};
use std::fs;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Micro Logging - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("micro_logging_demo");
    fs::create_dir_all(&log_dir)?;
    let root_file = log_dir.join("root.log");
    let shared_file = log_dir.join("shared.log");

    // 1. basic_config with a filename
    println!("1. Root logger writing to {}", root_file.display());
    basic_config(
        BasicConfig::new()
            .level(Level::DEBUG)
            .filename(&root_file)
            .filemode("w")
            .format("%(asctime)s %(levelname)s %(message)s"),
    )?;
    micro_logging::debug("debug goes to the file", &[]);
    micro_logging::info("processed %d records", &[128.into()]);

    // 2. One handler shared by two loggers
    println!("2. Shared handler writing to {}", shared_file.display());
    let formatter = Formatter::new(Some("[{name}] {levelname}: {message}"), None, Style::Brace)?;
    let handler = Arc::new(
        Handler::new(FileSink::with_options(&shared_file, FileMode::Truncate, true)?)
            .with_formatter(formatter),
    );

    let api = get_logger("demo.api");
    let db = get_logger("demo.db");
    api.add_handler(Arc::clone(&handler));
    db.add_handler(Arc::clone(&handler));

    info!(api, "GET %s -> %d", "/health", 200);
    error!(db, "connection to %s refused", "db-primary:5432");
    handler.flush()?;

    println!("\n--- {} ---", root_file.display());
    print!("{}", fs::read_to_string(&root_file)?);
    println!("--- {} ---", shared_file.display());
    print!("{}", fs::read_to_string(&shared_file)?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
