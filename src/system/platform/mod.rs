pub mod parse;

use crate::system::snapshot::{CacheSizes, DiskDevice, GpuController, MemoryModule};

pub use parse::{CpuInfoSummary, CpuTimes};

/// Readings sysinfo does not expose. Every method has a "not available"
/// default so each platform only overrides what it can actually read.
pub trait PlatformExtensions {
    fn process_priority(_pid: u32) -> Option<i32> {
        None
    }

    fn process_threads(_pid: u32) -> Option<u32> {
        None
    }

    /// Hardware frequency limits in GHz.
    fn cpu_frequency_limits() -> Option<(f64, f64)> {
        None
    }

    fn cpu_cache() -> CacheSizes {
        CacheSizes::default()
    }

    fn cpu_summary() -> CpuInfoSummary {
        CpuInfoSummary::default()
    }

    fn cpu_times() -> Option<CpuTimes> {
        None
    }

    fn memory_modules() -> Vec<MemoryModule> {
        Vec::new()
    }

    fn block_devices() -> Option<Vec<DiskDevice>> {
        None
    }

    fn gpu_controllers() -> Vec<GpuController> {
        Vec::new()
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod fallback;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use fallback as platform_impl;
#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn process_priority(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_priority(pid)
}

pub fn process_threads(pid: u32) -> Option<u32> {
    platform_impl::Platform::process_threads(pid)
}

pub fn cpu_frequency_limits() -> Option<(f64, f64)> {
    platform_impl::Platform::cpu_frequency_limits()
}

pub fn cpu_cache() -> CacheSizes {
    platform_impl::Platform::cpu_cache()
}

pub fn cpu_summary() -> CpuInfoSummary {
    platform_impl::Platform::cpu_summary()
}

pub fn cpu_times() -> Option<CpuTimes> {
    platform_impl::Platform::cpu_times()
}

pub fn memory_modules() -> Vec<MemoryModule> {
    platform_impl::Platform::memory_modules()
}

pub fn block_devices() -> Option<Vec<DiskDevice>> {
    platform_impl::Platform::block_devices()
}

pub fn gpu_controllers() -> Vec<GpuController> {
    platform_impl::Platform::gpu_controllers()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic_for_current_pid() {
        let pid = std::process::id();
        let _ = process_priority(pid);
        let _ = process_threads(pid);
        let _ = cpu_frequency_limits();
        let _ = cpu_cache();
        let _ = cpu_summary();
        let _ = cpu_times();
        let _ = memory_modules();
        let _ = block_devices();
        let _ = gpu_controllers();
    }

    #[test]
    fn unknown_pid_yields_nothing() {
        assert_eq!(process_threads(u32::MAX), None);
        assert_eq!(process_priority(u32::MAX), None);
    }
}
