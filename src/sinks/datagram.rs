//! Datagram sink for remote logging
//!
//! Sends each line as one UDP datagram. Delivery is best effort: there is
//! no acknowledgement and no retry.

use crate::core::{LoggerError, Result, Sink};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

pub const DEFAULT_DATAGRAM_PORT: u16 = 4445;

/// UDP sink bound to an address resolved once at construction
///
/// # Example
///
/// ```no_run
/// use micro_logging::sinks::DatagramSink;
/// use micro_logging::Handler;
///
/// let sink = DatagramSink::connect("logs.internal", 5514)
///     .expect("Failed to resolve log collector");
/// let handler = Handler::new(sink);
/// ```
pub struct DatagramSink {
    socket: Option<UdpSocket>,
    target: SocketAddr,
}

impl DatagramSink {
    /// Target `host` on [`DEFAULT_DATAGRAM_PORT`]
    pub fn new(host: &str) -> Result<Self> {
        Self::connect(host, DEFAULT_DATAGRAM_PORT)
    }

    /// Resolve `host:port` and open a local socket of the matching family
    ///
    /// # Errors
    ///
    /// Returns error if the name does not resolve or the socket cannot be bound
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let address = format!("{}:{}", host, port);
        let target = (host, port)
            .to_socket_addrs()
            .map_err(|e| LoggerError::address(&address, e.to_string()))?
            .next()
            .ok_or_else(|| LoggerError::address(&address, "no addresses returned"))?;

        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)
            .map_err(|e| LoggerError::io_operation("binding datagram socket", local, e))?;

        Ok(Self {
            socket: Some(socket),
            target,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Sink for DatagramSink {
    fn emit(&mut self, line: &str) -> Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| LoggerError::sink_closed(self.target.to_string()))?;
        socket.send_to(line.as_bytes(), self.target)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.socket = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "datagram"
    }
}
