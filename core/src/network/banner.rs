//! Passive banner grabbing.
//!
//! Nothing is sent to the service; we only read what it volunteers after the
//! handshake.

use std::time::Duration;

use sonar_common::network::port::Banner;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Reads one chunk of at most [`MAX_BANNER_SIZE`] bytes within `limit`.
///
/// Timeouts, an immediate EOF, read errors and non UTF-8 data all yield
/// [`Banner::None`]. The stream is consumed and closed before returning.
pub async fn read_banner<S>(mut stream: S, limit: Duration) -> Banner
where
    S: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_BANNER_SIZE];
    let read = timeout(limit, stream.read(&mut buffer)).await;
    drop(stream);

    match read {
        Ok(Ok(n)) if n > 0 => decode(&buffer[..n]),
        Ok(Ok(_)) => Banner::None,
        Ok(Err(e)) => {
            trace!("banner read failed: {e}");
            Banner::None
        }
        Err(_elapsed) => Banner::None,
    }
}

fn decode(bytes: &[u8]) -> Banner {
    match std::str::from_utf8(bytes) {
        Ok(text) => Banner::from_text(text),
        Err(e) => {
            trace!("banner is not valid UTF-8: {e}");
            Banner::None
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::{StreamTracker, TrackedStream};
    use std::time::Instant;
    use tokio::io::AsyncWriteExt;
    use tokio::net::{TcpListener, TcpStream};

    #[tokio::test]
    async fn read_banner_returns_trimmed_text() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 mail.example.org ESMTP\r\n").await.unwrap();
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let banner = read_banner(stream, Duration::from_secs(1)).await;

        assert_eq!(banner, Banner::Text("220 mail.example.org ESMTP".into()));
    }

    #[tokio::test]
    async fn read_banner_waits_full_timeout_on_silent_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let limit = Duration::from_millis(250);
        let stream = TcpStream::connect(addr).await.unwrap();
        let start = Instant::now();
        let banner = read_banner(stream, limit).await;

        assert_eq!(banner, Banner::None);
        assert!(start.elapsed() >= limit);
        server.abort();
    }

    #[tokio::test]
    async fn read_banner_handles_close_without_data() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        assert_eq!(read_banner(stream, Duration::from_secs(1)).await, Banner::None);
    }

    #[tokio::test]
    async fn read_banner_rejects_binary_payload() {
        let tracker = StreamTracker::default();
        let stream: TrackedStream = tracker.stream(Some(vec![0xff, 0xfe, 0x00, 0x81]));

        let banner = read_banner(stream, Duration::from_millis(100)).await;

        assert_eq!(banner, Banner::None);
        assert_eq!(tracker.open_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn read_banner_closes_stream_on_timeout() {
        let tracker = StreamTracker::default();
        let stream = tracker.stream(None);

        let banner = read_banner(stream, Duration::from_secs(1)).await;

        assert_eq!(banner, Banner::None);
        assert_eq!(tracker.opened(), 1);
        assert_eq!(tracker.open_streams(), 0);
    }
}
