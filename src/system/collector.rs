use std::sync::{Mutex, MutexGuard};

use sysinfo::{
    Components, DiskKind, Disks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind,
    Users,
};
use tracing::instrument;

use crate::domain::Domain;

use super::platform::{self, CpuTimes};
use super::provider::{MetricsProvider, ProviderError};
use super::snapshot::{
    CpuIdentity, CpuLoad, CpuSpeed, CpuTemperature, DiskDevice, FsUsage, GpuController,
    MemoryModule, MemoryTotals, ProcessEntry, ProcessList,
};

/// [`MetricsProvider`] backed by sysinfo and the platform readers.
///
/// CPU usage is a delta between two refreshes, so the process table and the CPU
/// sampler each keep their `System` between calls. Overlapping requests share
/// that state, so each one shortens the sampling window of the next.
pub struct SysinfoProvider {
    procs: Mutex<System>,
    cpu: Mutex<CpuSampler>,
    users: Users,
}

struct CpuSampler {
    sys: System,
    last_times: Option<CpuTimes>,
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut procs = System::new();
        procs.refresh_memory();
        procs.refresh_cpu_all();
        procs.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        let mut cpu = System::new();
        cpu.refresh_cpu_all();

        SysinfoProvider {
            procs: Mutex::new(procs),
            cpu: Mutex::new(CpuSampler {
                sys: cpu,
                last_times: platform::cpu_times(),
            }),
            users: Users::new_with_refreshed_list(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>, domain: Domain) -> Result<MutexGuard<'_, T>, ProviderError> {
    mutex
        .lock()
        .map_err(|_| ProviderError::unavailable(domain, "sampler lock poisoned"))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn manufacturer_name(vendor_id: &str) -> Option<String> {
    match vendor_id.trim() {
        "GenuineIntel" => Some("Intel".to_string()),
        "AuthenticAMD" => Some("AMD".to_string()),
        other => non_empty(other),
    }
}

fn is_cpu_sensor(label: &str) -> bool {
    ["cpu", "package", "core", "tctl", "tdie", "k10temp", "coretemp"]
        .iter()
        .any(|needle| label.contains(needle))
}

impl MetricsProvider for SysinfoProvider {
    #[instrument(level = "debug", skip_all)]
    fn processes(&self) -> Result<ProcessList, ProviderError> {
        let mut sys = lock(&self.procs, Domain::Process)?;
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_user(UpdateKind::OnlyIfNotSet),
        );

        let total_memory = sys.total_memory();
        // sysinfo reports per-core usage; normalize to a share of the whole machine
        let cores = sys.cpus().len().max(1) as f64;

        let mut list: Vec<ProcessEntry> = sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let pid = pid.as_u32();
                ProcessEntry {
                    pid,
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: Some(f64::from(process.cpu_usage()) / cores),
                    mem_percent: (total_memory > 0)
                        .then(|| process.memory() as f64 / total_memory as f64 * 100.0),
                    threads: platform::process_threads(pid),
                    priority: platform::process_priority(pid),
                    state: Some(process.status().to_string()),
                    user: process
                        .user_id()
                        .and_then(|uid| self.users.get_user_by_id(uid))
                        .map(|user| user.name().to_string()),
                }
            })
            .collect();
        list.sort_by_key(|p| p.pid);

        Ok(ProcessList {
            all: list.len(),
            list,
        })
    }

    #[instrument(level = "debug", skip_all)]
    fn cpu(&self) -> Result<CpuIdentity, ProviderError> {
        let mut sampler = lock(&self.cpu, Domain::Cpu)?;
        sampler.sys.refresh_cpu_frequency();
        let cpus = sampler.sys.cpus();
        let first = cpus
            .first()
            .ok_or_else(|| ProviderError::unavailable(Domain::Cpu, "no CPUs reported"))?;

        let summary = platform::cpu_summary();
        let limits = platform::cpu_frequency_limits();

        Ok(CpuIdentity {
            manufacturer: manufacturer_name(first.vendor_id()),
            brand: non_empty(first.brand()),
            speed_ghz: (first.frequency() > 0).then(|| round2(first.frequency() as f64 / 1000.0)),
            speed_min_ghz: limits.map(|(min, _)| round2(min)),
            speed_max_ghz: limits.map(|(_, max)| round2(max)),
            physical_cores: System::physical_core_count(),
            logical_cores: cpus.len(),
            processors: summary.packages,
            cache: platform::cpu_cache(),
            flags: summary.flags,
        })
    }

    fn cpu_speed(&self) -> Result<CpuSpeed, ProviderError> {
        let mut sampler = lock(&self.cpu, Domain::Cpu)?;
        sampler.sys.refresh_cpu_frequency();
        let cores: Vec<f64> = sampler
            .sys
            .cpus()
            .iter()
            .map(|cpu| round2(cpu.frequency() as f64 / 1000.0))
            .collect();
        if cores.is_empty() {
            return Err(ProviderError::unavailable(Domain::Cpu, "no CPU frequencies"));
        }

        let min = cores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = cores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = round2(cores.iter().sum::<f64>() / cores.len() as f64);
        Ok(CpuSpeed {
            min,
            max,
            avg,
            cores,
        })
    }

    fn current_load(&self) -> Result<CpuLoad, ProviderError> {
        let mut sampler = lock(&self.cpu, Domain::Cpu)?;
        sampler.sys.refresh_cpu_usage();
        let current = f64::from(sampler.sys.global_cpu_usage());
        let per_core: Vec<f64> = sampler
            .sys
            .cpus()
            .iter()
            .map(|cpu| f64::from(cpu.cpu_usage()))
            .collect();

        let now = platform::cpu_times();
        // Without an earlier sample the split covers the time since boot.
        let split = now.and_then(|now| now.load_since(&sampler.last_times.unwrap_or_default()));
        if now.is_some() {
            sampler.last_times = now;
        }

        Ok(CpuLoad {
            current,
            user: split.map(|s| s.user),
            system: split.map(|s| s.system),
            idle: split.map(|s| s.idle),
            per_core,
        })
    }

    fn cpu_temperature(&self) -> Result<CpuTemperature, ProviderError> {
        let components = Components::new_with_refreshed_list();
        let readings: Vec<(String, f64)> = components
            .list()
            .iter()
            .filter_map(|component| {
                let label = component.label().to_lowercase();
                let celsius = f64::from(component.temperature()?);
                (is_cpu_sensor(&label) && celsius.is_finite()).then_some((label, celsius))
            })
            .collect();

        let main = readings
            .iter()
            .find(|(label, _)| !label.contains("core"))
            .or_else(|| readings.first())
            .map(|(_, celsius)| *celsius);
        let max = readings
            .iter()
            .map(|(_, celsius)| *celsius)
            .reduce(f64::max);
        let cores = readings
            .iter()
            .filter(|(label, _)| label.contains("core"))
            .map(|(_, celsius)| *celsius)
            .collect();

        Ok(CpuTemperature { main, max, cores })
    }

    fn mem(&self) -> Result<MemoryTotals, ProviderError> {
        let mut sys = System::new();
        sys.refresh_memory();
        if sys.total_memory() == 0 {
            return Err(ProviderError::unavailable(
                Domain::Memory,
                "total memory reported as zero",
            ));
        }
        Ok(MemoryTotals {
            total: sys.total_memory(),
            free: sys.free_memory(),
            used: sys.used_memory(),
            available: sys.available_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
        })
    }

    fn mem_layout(&self) -> Result<Vec<MemoryModule>, ProviderError> {
        Ok(platform::memory_modules())
    }

    fn disk_layout(&self) -> Result<Vec<DiskDevice>, ProviderError> {
        if let Some(devices) = platform::block_devices() {
            return Ok(devices);
        }

        let disks = Disks::new_with_refreshed_list();
        let mut devices: Vec<DiskDevice> = Vec::new();
        for disk in disks.list() {
            let name = disk.name().to_string_lossy().to_string();
            if devices.iter().any(|d| d.name == name) {
                continue;
            }
            let kind = match disk.kind() {
                DiskKind::HDD => Some("HD".to_string()),
                DiskKind::SSD => Some("SSD".to_string()),
                DiskKind::Unknown(_) => None,
            };
            devices.push(DiskDevice {
                name,
                kind,
                vendor: None,
                model: None,
                size: disk.total_space(),
            });
        }
        Ok(devices)
    }

    fn fs_size(&self) -> Result<Vec<FsUsage>, ProviderError> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let size = disk.total_space();
                let available = disk.available_space();
                FsUsage {
                    fs: disk.name().to_string_lossy().to_string(),
                    mount: disk.mount_point().to_string_lossy().to_string(),
                    size,
                    used: size.saturating_sub(available),
                    available,
                }
            })
            .collect())
    }

    fn graphics(&self) -> Result<Vec<GpuController>, ProviderError> {
        Ok(platform::gpu_controllers())
    }
}
