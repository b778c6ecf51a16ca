use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Domain;

use super::snapshot::{
    CpuIdentity, CpuLoad, CpuSpeed, CpuTemperature, DiskDevice, FsUsage, GpuController,
    MemoryModule, MemoryTotals, ProcessList,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{domain} data unavailable: {reason}")]
    Unavailable { domain: Domain, reason: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("provider task did not complete")]
    Join(#[from] tokio::task::JoinError),
}

impl ProviderError {
    pub fn unavailable(domain: Domain, reason: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            domain,
            reason: reason.into(),
        }
    }
}

/// Source of live system readings.
///
/// Calls are blocking and independent of each other; nothing guarantees that two
/// calls observe the same instant. Implementations may keep sampling state
/// internally but must be safe to call from several threads at once.
pub trait MetricsProvider: Send + Sync + 'static {
    fn processes(&self) -> Result<ProcessList, ProviderError>;

    fn cpu(&self) -> Result<CpuIdentity, ProviderError>;

    fn cpu_speed(&self) -> Result<CpuSpeed, ProviderError>;

    fn current_load(&self) -> Result<CpuLoad, ProviderError>;

    fn cpu_temperature(&self) -> Result<CpuTemperature, ProviderError>;

    fn mem(&self) -> Result<MemoryTotals, ProviderError>;

    /// Populated physical memory modules, in slot order.
    fn mem_layout(&self) -> Result<Vec<MemoryModule>, ProviderError>;

    fn disk_layout(&self) -> Result<Vec<DiskDevice>, ProviderError>;

    fn fs_size(&self) -> Result<Vec<FsUsage>, ProviderError>;

    fn graphics(&self) -> Result<Vec<GpuController>, ProviderError>;
}
