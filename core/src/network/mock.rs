//! In-memory connector used by unit tests to track every stream it hands out.

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};

use super::tcp::{ConnectOutcome, Connector};

#[derive(Debug, Clone, Default)]
pub struct StreamTracker {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl StreamTracker {
    /// A stream that yields `payload` once, then never becomes readable again.
    pub fn stream(&self, payload: Option<Vec<u8>>) -> TrackedStream {
        self.opened.fetch_add(1, Ordering::SeqCst);
        TrackedStream {
            payload,
            closed: self.closed.clone(),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn open_streams(&self) -> usize {
        self.opened() - self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct TrackedStream {
    payload: Option<Vec<u8>>,
    closed: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut().payload.take() {
            Some(bytes) => {
                let n = bytes.len().min(buf.remaining());
                buf.put_slice(&bytes[..n]);
                Poll::Ready(Ok(()))
            }
            None => Poll::Pending,
        }
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub enum MockPort {
    /// Accepts and optionally sends a banner.
    Open(Option<Vec<u8>>),
    /// Refuses immediately.
    Closed,
    /// Never answers; the attempt runs into its timeout.
    Silent,
}

/// Answers according to a fixed port table. Unlisted ports are closed.
#[derive(Debug, Default)]
pub struct MockConnector {
    ports: HashMap<u16, MockPort>,
    latency: Duration,
    pub tracker: StreamTracker,
    attempts: Mutex<Vec<u16>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockConnector {
    pub fn new(ports: impl IntoIterator<Item = (u16, MockPort)>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Delays every answer, so concurrent attempts actually overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn attempts(&self) -> Vec<u16> {
        self.attempts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Stream = TrackedStream;

    async fn attempt(&self, _addr: IpAddr, port: u16, limit: Duration) -> ConnectOutcome<TrackedStream> {
        self.attempts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(port);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency.min(limit)).await;
        }

        let outcome = match self.ports.get(&port).cloned().unwrap_or(MockPort::Closed) {
            MockPort::Open(payload) => ConnectOutcome::Open(self.tracker.stream(payload)),
            MockPort::Closed => ConnectOutcome::Closed,
            MockPort::Silent => {
                let _ = tokio::time::timeout(limit, std::future::pending::<()>()).await;
                ConnectOutcome::Filtered
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
