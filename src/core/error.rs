//! Error types for the logging facade
//!
//! Configuration problems surface when a formatter, sink or handler is
//! built. Everything else surfaces while a record is rendered or written,
//! and the logger's fan-out reports those on stderr instead of returning
//! them to the caller.

use std::io;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure tied to a named resource (a path or a local address)
    #[error("failed {action} '{target}': {source}")]
    Io {
        action: String,
        target: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure while writing or flushing a sink
    #[error("sink I/O failed: {0}")]
    SinkIo(#[from] io::Error),

    #[error("malformed configuration document: {0}")]
    ConfigDocument(#[from] serde_json::Error),

    #[error("invalid {component} configuration: {reason}")]
    Configuration { component: String, reason: String },

    /// A record could not be rendered (`stage` is `%`, `{` or `date`)
    #[error("cannot render record ({stage}): {reason}")]
    Render { stage: String, reason: String },

    /// A capability the variant does not provide was invoked
    #[error("{operation} is not implemented for {variant}")]
    NotImplemented { operation: String, variant: String },

    #[error("cannot resolve '{address}': {reason}")]
    Resolve { address: String, reason: String },

    #[error("sink '{sink}' is closed")]
    SinkClosed { sink: String },

    #[error("sink failure: {0}")]
    SinkFailure(String),
}

impl LoggerError {
    pub fn io_operation(
        action: impl Into<String>,
        target: impl Into<String>,
        source: io::Error,
    ) -> Self {
        LoggerError::Io {
            action: action.into(),
            target: target.into(),
            source,
        }
    }

    pub fn config(component: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::Configuration {
            component: component.into(),
            reason: reason.into(),
        }
    }

    pub fn formatter(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::Render {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    pub fn not_implemented(operation: impl Into<String>, variant: impl Into<String>) -> Self {
        LoggerError::NotImplemented {
            operation: operation.into(),
            variant: variant.into(),
        }
    }

    pub fn address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::Resolve {
            address: address.into(),
            reason: reason.into(),
        }
    }

    pub fn sink_closed(sink: impl Into<String>) -> Self {
        LoggerError::SinkClosed { sink: sink.into() }
    }

    pub fn writer(reason: impl Into<String>) -> Self {
        LoggerError::SinkFailure(reason.into())
    }

    /// True for errors raised while building a formatter, sink or handler
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::Configuration { .. } | LoggerError::ConfigDocument(_)
        )
    }
}
