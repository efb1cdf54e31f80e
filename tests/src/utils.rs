use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use sonar_common::system::{NetworkIdentity, OsInfo, SystemRepository};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// A loopback listener that lives as long as the value does.
pub struct TestServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Greets every connection with `banner`, then hangs up.
pub async fn banner_server(banner: &'static [u8]) -> TestServer {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.write_all(banner).await;
            });
        }
    });
    TestServer { port, handle }
}

/// Accepts connections and holds them open without ever writing.
pub async fn silent_server() -> TestServer {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });
    TestServer { port, handle }
}

/// A port that was just released and is very likely refusing connections.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

pub struct FixedSystem;

impl SystemRepository for FixedSystem {
    fn get_os_info(&self) -> anyhow::Result<OsInfo> {
        Ok(OsInfo {
            name: "Linux".into(),
            version: "6.8.0".into(),
            platform: "Linux-6.8.0-x86_64".into(),
            processor: "x86_64".into(),
        })
    }

    fn get_network_identity(&self) -> anyhow::Result<NetworkIdentity> {
        Ok(NetworkIdentity {
            hostname: "scanner".into(),
            ip_addr: LOCALHOST,
        })
    }
}
