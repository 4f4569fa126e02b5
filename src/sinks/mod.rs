//! Sink implementations

pub mod stream;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "datagram")]
pub mod datagram;

pub use stream::StreamSink;

#[cfg(feature = "file")]
pub use file::{FileMode, FileSink};

#[cfg(feature = "datagram")]
pub use datagram::{DatagramSink, DEFAULT_DATAGRAM_PORT};

// Re-export the capability trait next to its implementations
pub use crate::core::Sink;
