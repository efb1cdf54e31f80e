//! Single TCP connection attempts.
//!
//! Every attempt is bounded by its own timeout and classified by value as a
//! [`ConnectOutcome`]. Transport errors never escape this module.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use sonar_common::network::port::PortState;
use tokio::io::AsyncRead;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Result of one connection attempt.
///
/// `Open` hands the live stream to the caller, who owns it from then on.
/// Dropping the outcome closes the socket.
#[derive(Debug)]
pub enum ConnectOutcome<S> {
    Open(S),
    Closed,
    Filtered,
}

impl<S> ConnectOutcome<S> {
    pub fn state(&self) -> PortState {
        match self {
            ConnectOutcome::Open(_) => PortState::Open,
            ConnectOutcome::Closed => PortState::Closed,
            ConnectOutcome::Filtered => PortState::Filtered,
        }
    }

    pub fn into_stream(self) -> Option<S> {
        match self {
            ConnectOutcome::Open(stream) => Some(stream),
            _ => None,
        }
    }
}

/// Opens connections for the scanner and the prober.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Stream: AsyncRead + Unpin + Send + 'static;

    /// Attempts a connection to `addr:port`, giving up after `limit`.
    async fn attempt(
        &self,
        addr: IpAddr,
        port: u16,
        limit: Duration,
    ) -> ConnectOutcome<Self::Stream>;
}

/// Plain OS-level TCP connect. Needs no privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn attempt(&self, addr: IpAddr, port: u16, limit: Duration) -> ConnectOutcome<TcpStream> {
        let socket_addr: SocketAddr = SocketAddr::new(addr, port);

        // On timeout the pending connect future is dropped here, which closes its socket.
        match timeout(limit, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => ConnectOutcome::Open(stream),
            Ok(Err(e)) => classify_error(socket_addr, &e),
            Err(_elapsed) => ConnectOutcome::Filtered,
        }
    }
}

fn classify_error<S>(socket_addr: SocketAddr, err: &io::Error) -> ConnectOutcome<S> {
    match err.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => ConnectOutcome::Closed,
        _ => {
            trace!("connect to {socket_addr} failed: {err}");
            ConnectOutcome::Filtered
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
