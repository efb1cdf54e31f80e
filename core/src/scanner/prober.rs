//! Banner collection for ports the sweep found open.

use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use sonar_common::config::{DEFAULT_CONCURRENCY, ScanConfig};
use sonar_common::network::port::{Banner, BannerEntry, ServiceMap};
use tokio::task::JoinSet;
use tracing::{debug, error};

use super::queue::PortQueue;
use crate::network::banner;
use crate::network::tcp::{ConnectOutcome, Connector};

/// Reconnects to each open port and reads whatever the service volunteers.
///
/// The same timeout bounds the connect and the read.
pub struct ServiceProber<C: Connector> {
    connector: Arc<C>,
    timeout: Duration,
    concurrency: NonZeroUsize,
}

impl<C: Connector> ServiceProber<C> {
    pub fn new(connector: Arc<C>, timeout: Duration) -> Self {
        Self {
            connector,
            timeout,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn from_config(connector: Arc<C>, cfg: &ScanConfig) -> Self {
        Self::new(connector, cfg.probe_timeout).with_concurrency(cfg.concurrency)
    }

    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Produces exactly one entry per input port, in input order.
    pub async fn probe(&self, addr: IpAddr, ports: &[u16]) -> ServiceMap {
        let queue = PortQueue::new(ports.iter().copied());
        let workers: usize = queue.worker_count(self.concurrency);
        let probe = Arc::new(Probe {
            connector: self.connector.clone(),
            addr,
            timeout: self.timeout,
            queue,
        });

        let mut pool: JoinSet<Vec<(usize, Banner)>> = JoinSet::new();
        for _ in 0..workers {
            pool.spawn(probe_worker(probe.clone()));
        }

        let mut banners: Vec<Banner> = vec![Banner::None; ports.len()];
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(found) => {
                    for (idx, banner) in found {
                        banners[idx] = banner;
                    }
                }
                Err(e) => error!("Probe worker failed: {e}"),
            }
        }

        let entries: Vec<BannerEntry> = ports
            .iter()
            .zip(banners)
            .map(|(&port, banner)| BannerEntry { port, banner })
            .collect();

        ServiceMap::new(entries)
    }

    /// Grabs the banner of a single port over a fresh connection.
    pub async fn probe_port(&self, addr: IpAddr, port: u16) -> Banner {
        grab(self.connector.as_ref(), addr, port, self.timeout).await
    }
}

struct Probe<C: Connector> {
    connector: Arc<C>,
    addr: IpAddr,
    timeout: Duration,
    queue: PortQueue,
}

async fn probe_worker<C: Connector>(probe: Arc<Probe<C>>) -> Vec<(usize, Banner)> {
    let mut found = Vec::new();
    while let Some((idx, port)) = probe.queue.pop() {
        let banner = grab(probe.connector.as_ref(), probe.addr, port, probe.timeout).await;
        found.push((idx, banner));
    }
    found
}

async fn grab<C: Connector>(connector: &C, addr: IpAddr, port: u16, timeout: Duration) -> Banner {
    match connector.attempt(addr, port, timeout).await {
        ConnectOutcome::Open(stream) => banner::read_banner(stream, timeout).await,
        outcome => {
            debug!("{addr}:{port} stopped accepting connections ({:?})", outcome.state());
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
