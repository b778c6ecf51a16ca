//! Point-in-time readings returned by a [`MetricsProvider`](super::provider::MetricsProvider).
//!
//! Attributes a platform cannot always report are `Option`s. Substitute values
//! are chosen by the formatters in `crate::metrics`, never here.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    /// Share of total CPU time across all cores.
    pub cpu_percent: Option<f64>,
    pub mem_percent: Option<f64>,
    pub threads: Option<u32>,
    pub priority: Option<i32>,
    pub state: Option<String>,
    pub user: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessList {
    pub all: usize,
    /// Ordered by pid ascending.
    pub list: Vec<ProcessEntry>,
}

/// Cache sizes in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheSizes {
    pub l1d: Option<u64>,
    pub l1i: Option<u64>,
    pub l2: Option<u64>,
    pub l3: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuIdentity {
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub speed_ghz: Option<f64>,
    pub speed_min_ghz: Option<f64>,
    pub speed_max_ghz: Option<f64>,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub processors: Option<usize>,
    pub cache: CacheSizes,
    pub flags: Option<String>,
}

/// Current clock speeds in GHz.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuSpeed {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub cores: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuLoad {
    pub current: f64,
    pub user: Option<f64>,
    pub system: Option<f64>,
    pub idle: Option<f64>,
    pub per_core: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuTemperature {
    pub main: Option<f64>,
    pub max: Option<f64>,
    pub cores: Vec<f64>,
}

/// Memory totals in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryModule {
    /// Bytes.
    pub size: u64,
    pub bank: Option<String>,
    pub kind: Option<String>,
    /// MT/s.
    pub clock_speed: Option<u32>,
    pub form_factor: Option<String>,
    pub manufacturer: Option<String>,
    pub part_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiskDevice {
    pub name: String,
    pub kind: Option<String>,
    pub vendor: Option<String>,
    pub model: Option<String>,
    /// Bytes.
    pub size: u64,
}

/// One mounted filesystem, sizes in bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FsUsage {
    pub fs: String,
    pub mount: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GpuController {
    pub model: Option<String>,
    pub vendor: Option<String>,
    pub bus: Option<String>,
    pub memory_total_mb: Option<f64>,
    pub memory_used_mb: Option<f64>,
    pub utilization_gpu: Option<f64>,
    pub driver_version: Option<String>,
    pub driver_date: Option<String>,
    pub direct_x_version: Option<String>,
}
