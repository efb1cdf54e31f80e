//! Port sweeping.
//!
//! [`PortScanner`] drains a [`PortRange`] through a bounded pool of workers, each
//! running one [`Connector`] attempt at a time. Open connections are dropped as
//! soon as they are classified; banners are collected later by the
//! [`prober::ServiceProber`] over fresh connections, so a port can change state
//! between the two phases.
//!
//! **Ordering:** workers finish in any order. Results are merged after the pool
//! has been joined and sorted before they are returned.

use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sonar_common::config::{DEFAULT_CONCURRENCY, ScanConfig};
use sonar_common::network::port::{PortState, ScanResult};
use sonar_common::network::range::PortRange;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, trace};

use crate::network::tcp::Connector;
use queue::PortQueue;

pub mod prober;
mod queue;

/// Running totals handed to the progress callback after every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub attempted: usize,
    pub open: usize,
    pub total: usize,
}

pub type ProgressCallback = Arc<dyn Fn(ScanProgress) + Send + Sync>;

pub struct PortScanner<C: Connector> {
    connector: Arc<C>,
    timeout: Duration,
    concurrency: NonZeroUsize,
    max_duration: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl<C: Connector> PortScanner<C> {
    pub fn new(connector: Arc<C>, timeout: Duration) -> Self {
        Self {
            connector,
            timeout,
            concurrency: DEFAULT_CONCURRENCY,
            max_duration: None,
            on_progress: None,
        }
    }

    pub fn from_config(connector: Arc<C>, cfg: &ScanConfig) -> Self {
        Self::new(connector, cfg.scan_timeout)
            .with_concurrency(cfg.concurrency)
            .with_max_duration(cfg.max_duration)
    }

    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Stops handing out new ports once `max_duration` has passed.
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_progress(mut self, on_progress: Option<ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    /// Attempts every port in `range` once and returns the open ones, ascending.
    ///
    /// Always completes: each attempt is bounded by the scan timeout, so the
    /// worst case is `timeout * ceil(ports / concurrency)`, or the deadline plus
    /// one timeout when a deadline is set.
    pub async fn scan(&self, addr: IpAddr, range: PortRange) -> ScanResult {
        let started = Instant::now();
        let queue = PortQueue::new(range.to_iter());
        let workers: usize = queue.worker_count(self.concurrency);

        debug!(
            "Sweeping {} port(s) on {addr} with {workers} worker(s)",
            queue.len()
        );

        let sweep = Arc::new(Sweep {
            connector: self.connector.clone(),
            addr,
            timeout: self.timeout,
            deadline: self.max_duration.map(|limit| started + limit),
            total: queue.len(),
            queue,
            attempted: AtomicUsize::new(0),
            open: AtomicUsize::new(0),
            on_progress: self.on_progress.clone(),
        });

        let mut pool: JoinSet<Tally> = JoinSet::new();
        for _ in 0..workers {
            pool.spawn(sweep_worker(sweep.clone()));
        }

        let mut tally = Tally::default();
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(worker_tally) => tally.merge(worker_tally),
                Err(e) => error!("Scan worker failed: {e}"),
            }
        }

        let result: ScanResult = tally.into_result(started.elapsed());
        debug!(
            "Sweep finished: {} open, {} closed, {} filtered in {:.2}s",
            result.open_count(),
            result.closed,
            result.filtered,
            result.elapsed.as_secs_f64()
        );
        result
    }
}

/// State shared by the workers of one sweep. Only the counters are mutated.
struct Sweep<C: Connector> {
    connector: Arc<C>,
    addr: IpAddr,
    timeout: Duration,
    deadline: Option<Instant>,
    queue: PortQueue,
    total: usize,
    attempted: AtomicUsize,
    open: AtomicUsize,
    on_progress: Option<ProgressCallback>,
}

impl<C: Connector> Sweep<C> {
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn report(&self, state: PortState) {
        let attempted = self.attempted.fetch_add(1, Ordering::Relaxed) + 1;
        let open = match state {
            PortState::Open => self.open.fetch_add(1, Ordering::Relaxed) + 1,
            _ => self.open.load(Ordering::Relaxed),
        };

        if let Some(on_progress) = &self.on_progress {
            on_progress(ScanProgress {
                attempted,
                open,
                total: self.total,
            });
        }
    }
}

async fn sweep_worker<C: Connector>(sweep: Arc<Sweep<C>>) -> Tally {
    let mut tally = Tally::default();

    while let Some((_, port)) = sweep.queue.pop() {
        if sweep.deadline_passed() {
            tally.interrupted = true;
            break;
        }

        let outcome = sweep.connector.attempt(sweep.addr, port, sweep.timeout).await;
        let state: PortState = outcome.state();
        drop(outcome);

        trace!("{}:{port} is {state:?}", sweep.addr);
        tally.record(port, state);
        sweep.report(state);
    }

    tally
}

/// Results gathered by one worker, merged after the pool is joined.
#[derive(Debug, Default)]
struct Tally {
    open: Vec<u16>,
    attempted: usize,
    closed: usize,
    filtered: usize,
    interrupted: bool,
}

impl Tally {
    fn record(&mut self, port: u16, state: PortState) {
        self.attempted += 1;
        match state {
            PortState::Open => self.open.push(port),
            PortState::Closed => self.closed += 1,
            PortState::Filtered => self.filtered += 1,
        }
    }

    fn merge(&mut self, other: Tally) {
        self.open.extend(other.open);
        self.attempted += other.attempted;
        self.closed += other.closed;
        self.filtered += other.filtered;
        self.interrupted |= other.interrupted;
    }

    fn into_result(mut self, elapsed: Duration) -> ScanResult {
        self.open.sort_unstable();
        self.open.dedup();

        ScanResult {
            open_ports: self.open,
            attempted: self.attempted,
            closed: self.closed,
            filtered: self.filtered,
            elapsed,
            interrupted: self.interrupted,
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
