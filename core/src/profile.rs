//! # Host Profiling Service
//!
//! Implements the core "profile a host" use case.
//!
//! The service collects local facts through a [`SystemRepository`], sweeps the
//! target's port range and then reconnects to every open port for a banner.

use std::sync::Arc;

use sonar_common::config::ScanConfig;
use sonar_common::network::port::{ScanResult, ServiceMap};
use sonar_common::network::target::ResolvedTarget;
use sonar_common::system::{HostProfile, SystemRepository};

use crate::network::tcp::Connector;
use crate::scanner::prober::ServiceProber;
use crate::scanner::{PortScanner, ProgressCallback};

/// Everything the report needs, in one place.
#[derive(Debug, Clone)]
pub struct Profile {
    pub host: HostProfile,
    pub target: ResolvedTarget,
    pub scan: ScanResult,
    pub services: ServiceMap,
}

/// Application Service for host profiling.
///
/// The individual phases are public so a caller can present each one as it
/// finishes; [`ProfileService::profile`] runs them back to back.
pub struct ProfileService<C: Connector> {
    system_repo: Box<dyn SystemRepository>,
    connector: Arc<C>,
}

impl<C: Connector> ProfileService<C> {
    pub fn new(system_repo: Box<dyn SystemRepository>, connector: Arc<C>) -> Self {
        Self {
            system_repo,
            connector,
        }
    }

    /// Gathers OS and network facts about this machine.
    pub fn inspect_host(&self) -> anyhow::Result<HostProfile> {
        let os = self.system_repo.get_os_info()?;
        let network = self.system_repo.get_network_identity()?;
        Ok(HostProfile { os, network })
    }

    /// Scan phase: which ports of the target accept a connection.
    pub async fn scan(&self, cfg: &ScanConfig, on_progress: Option<ProgressCallback>) -> ScanResult {
        PortScanner::from_config(self.connector.clone(), cfg)
            .with_progress(on_progress)
            .scan(cfg.target.addr, cfg.ports)
            .await
    }

    /// Probe phase: a banner (or none) for each of `open_ports`.
    pub async fn probe(&self, cfg: &ScanConfig, open_ports: &[u16]) -> ServiceMap {
        ServiceProber::from_config(self.connector.clone(), cfg)
            .probe(cfg.target.addr, open_ports)
            .await
    }

    /// Executes the complete profile against `cfg.target`.
    ///
    /// The process involves:
    /// 1. **Inspection**: Local OS and network identity.
    /// 2. **Scanning**: Sweeping the configured port range.
    /// 3. **Probing**: Banner grabbing, skipped when nothing is open.
    pub async fn profile(
        &self,
        cfg: &ScanConfig,
        on_progress: Option<ProgressCallback>,
    ) -> anyhow::Result<Profile> {
        let host = self.inspect_host()?;
        let scan = self.scan(cfg, on_progress).await;

        let services = if scan.is_empty() {
            ServiceMap::default()
        } else {
            self.probe(cfg, &scan.open_ports).await
        };

        Ok(Profile {
            host,
            target: cfg.target.clone(),
            scan,
            services,
        })
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
