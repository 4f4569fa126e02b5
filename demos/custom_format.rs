//! Custom formatting example
//!
//! Demonstrates both format styles, date layouts, UTC conversion and
//! exception rendering.
//!
//! Run with: cargo run --example custom_format

use micro_logging::prelude::*;
use micro_logging::{info, warning};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct ConfigError {
    source: std::io::Error,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not load settings")
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn main() -> Result<()> {
    println!("=== Micro Logging - Custom Format Example ===\n");

    let logger = Logger::new("formats");
    logger.set_level(Level::DEBUG);

    println!("1. Percent style with padding:");
    let percent = Formatter::new(
        Some("%(asctime)s | %(levelname)-8s | %(module)s | %(message)s"),
        Some("{3}:{4}:{5}"),
        Style::Percent,
    )?;
    let handler = Arc::new(Handler::new(StreamSink::stdout()).with_formatter(percent));
    logger.add_handler(Arc::clone(&handler));
    info!(logger, module: "auth", "token refreshed for %s", "alice");

    println!("\n2. Brace style, UTC timestamps:");
    let brace = Formatter::new(
        Some("{asctime} {levelname:>8} [{name}] {message}"),
        Some("{0}-{1}-{2}T{3}:{4}:{5}Z"),
        Style::Brace,
    )?
    .with_converter(micro_logging::utc_time);
    handler.set_formatter(brace);
    warning!(logger, "disk usage at %d%%", 91);

    println!("\n3. Exceptions with a cause chain:");
    let chained = Formatter::new(Some("%(levelname)s %(message)s"), None, Style::Percent)?
        .with_exception_renderer(ChainRenderer);
    handler.set_formatter(chained);
    let err = ConfigError {
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "settings.json missing"),
    };
    logger.exception_from(&err, "startup aborted", &[]);
    logger.log_exc_info(
        Level::WARNING,
        "retrying with defaults",
        &[],
        ExceptionInfo::from_error(&err),
    );

    println!("\n4. Invalid format strings are rejected up front:");
    match Formatter::new(Some("%(user)s %(message)s"), None, Style::Percent) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   {}", e),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
