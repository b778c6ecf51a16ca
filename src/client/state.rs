use chrono::{DateTime, Local};

use super::api::{ClientError, DomainSnapshot};
use super::history::RollingHistory;
use super::poller::{BatchFailure, PollPayload};
use crate::domain::Domain;
use crate::metrics::{BYTES_PER_GB, CpuInfo, DiskInfo, GpuInfo, MemoryInfo, ProcessSample};

/// Buffer sizes for each chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCapacities {
    pub cpu: usize,
    pub memory: usize,
    pub disk: usize,
    pub gpu: usize,
    pub overview: usize,
}

impl Default for HistoryCapacities {
    fn default() -> Self {
        Self {
            cpu: 30,
            memory: 15,
            disk: 10,
            gpu: 15,
            overview: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomainView<T> {
    pub latest: Option<T>,
    /// Set while the most recent fetch for the domain failed.
    pub error: Option<String>,
}

impl<T> Default for DomainView<T> {
    fn default() -> Self {
        Self {
            latest: None,
            error: None,
        }
    }
}

impl<T> DomainView<T> {
    pub fn is_loading(&self) -> bool {
        self.latest.is_none() && self.error.is_none()
    }

    fn set(&mut self, value: T) {
        self.latest = Some(value);
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuPoint {
    pub label: String,
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPoint {
    pub label: String,
    pub used_gb: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskPoint {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuPoint {
    pub label: String,
    pub utilization: f64,
    pub memory_used_gb: f64,
}

/// Everything the dashboard renders: latest value per domain plus chart history.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub processes: DomainView<Vec<ProcessSample>>,
    pub cpu: DomainView<CpuInfo>,
    pub memory: DomainView<MemoryInfo>,
    pub disk: DomainView<DiskInfo>,
    pub gpu: DomainView<GpuInfo>,
    pub cpu_history: RollingHistory<CpuPoint>,
    pub memory_history: RollingHistory<MemoryPoint>,
    pub disk_history: RollingHistory<DiskPoint>,
    pub gpu_history: RollingHistory<GpuPoint>,
    pub overview_cpu: RollingHistory<f64>,
    /// All-or-nothing mode only: the failure that discarded the last cycle.
    pub cycle_error: Option<String>,
    pub last_update: Option<DateTime<Local>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(HistoryCapacities::default())
    }
}

fn time_label(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

impl DashboardState {
    pub fn new(capacities: HistoryCapacities) -> Self {
        Self {
            processes: DomainView::default(),
            cpu: DomainView::default(),
            memory: DomainView::default(),
            disk: DomainView::default(),
            gpu: DomainView::default(),
            cpu_history: RollingHistory::new(capacities.cpu),
            memory_history: RollingHistory::new(capacities.memory),
            disk_history: RollingHistory::new(capacities.disk),
            gpu_history: RollingHistory::new(capacities.gpu),
            overview_cpu: RollingHistory::new(capacities.overview),
            cycle_error: None,
            last_update: None,
        }
    }

    pub fn apply(&mut self, payload: PollPayload, now: DateTime<Local>) {
        match payload {
            PollPayload::Single { result: Ok(snapshot), .. } => self.apply_snapshot(snapshot, now),
            PollPayload::Single {
                domain,
                result: Err(error),
            } => self.record_error(domain, &error),
            PollPayload::Batch(Ok(snapshots)) => {
                self.cycle_error = None;
                for snapshot in snapshots {
                    self.apply_snapshot(snapshot, now);
                }
            }
            PollPayload::Batch(Err(BatchFailure { domain, error })) => {
                tracing::warn!(%domain, error = %error, "poll cycle discarded");
                self.cycle_error = Some(domain.client_failure_message());
            }
        }
    }

    pub fn record_error(&mut self, domain: Domain, error: &ClientError) {
        tracing::warn!(%domain, error = %error, "fetch failed");
        let message = Some(domain.client_failure_message());
        match domain {
            Domain::Process => self.processes.error = message,
            Domain::Cpu => self.cpu.error = message,
            Domain::Memory => self.memory.error = message,
            Domain::Disk => self.disk.error = message,
            Domain::Gpu => self.gpu.error = message,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: DomainSnapshot, now: DateTime<Local>) {
        let label = time_label(now);
        match snapshot {
            DomainSnapshot::Process(list) => self.processes.set(list),
            DomainSnapshot::Cpu(info) => {
                let utilization = info.utilization();
                self.cpu_history.push(CpuPoint { label, utilization });
                self.overview_cpu.push(utilization);
                self.cpu.set(*info);
            }
            DomainSnapshot::Memory(info) => {
                if let Some(percent) = info.used_percent() {
                    self.memory_history.push(MemoryPoint {
                        label,
                        used_gb: info.usedmemory as f64 / BYTES_PER_GB,
                        percent,
                    });
                }
                self.memory.set(info);
            }
            DomainSnapshot::Disk(info) => {
                let percent = info.used_percent().unwrap_or(0.0);
                self.disk.set(info);
                self.disk_history.push(DiskPoint { label, percent });
            }
            DomainSnapshot::Gpu(info) => {
                self.gpu_history.push(GpuPoint {
                    label,
                    utilization: info.utilization_percent().unwrap_or(0.0),
                    memory_used_gb: info.used_memory_gb().unwrap_or(0.0),
                });
                self.gpu.set(info);
            }
        }
        self.last_update = Some(now);
    }

    /// Used memory as a percentage of total, one decimal.
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.latest.as_ref()?.used_percent()
    }

    pub fn disk_percent(&self) -> Option<f64> {
        self.disk.latest.as_ref()?.used_percent()
    }

    /// Utilization of the most recent CPU history point.
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu_history.latest().map(|p| p.utilization)
    }

    pub fn gpu_percent(&self) -> Option<f64> {
        self.gpu.latest.as_ref()?.utilization_percent()
    }

    pub fn error_for(&self, domain: Domain) -> Option<&str> {
        match domain {
            Domain::Process => self.processes.error.as_deref(),
            Domain::Cpu => self.cpu.error.as_deref(),
            Domain::Memory => self.memory.error.as_deref(),
            Domain::Disk => self.disk.error.as_deref(),
            Domain::Gpu => self.gpu.error.as_deref(),
        }
    }
}
