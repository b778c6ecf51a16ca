use std::fs;
use std::path::Path;

use super::parse::{self, CpuInfoSummary, CpuTimes};
use super::PlatformExtensions;
use crate::system::snapshot::{CacheSizes, DiskDevice, GpuController, MemoryModule};

const CPU0: &str = "/sys/devices/system/cpu/cpu0";
const DMI_ENTRIES: &str = "/sys/firmware/dmi/entries";
const DRM_CLASS: &str = "/sys/class/drm";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub struct Platform;

fn read_trimmed(path: impl AsRef<Path>) -> Option<String> {
    let value = fs::read_to_string(path).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn read_number<T: std::str::FromStr>(path: impl AsRef<Path>) -> Option<T> {
    read_trimmed(path)?.parse().ok()
}

impl PlatformExtensions for Platform {
    fn process_priority(pid: u32) -> Option<i32> {
        let contents = fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        parse::stat_priority(&contents)
    }

    fn process_threads(pid: u32) -> Option<u32> {
        let contents = fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        parse::stat_threads(&contents)
    }

    fn cpu_frequency_limits() -> Option<(f64, f64)> {
        let cpufreq = Path::new(CPU0).join("cpufreq");
        // kHz
        let min: f64 = read_number(cpufreq.join("cpuinfo_min_freq"))?;
        let max: f64 = read_number(cpufreq.join("cpuinfo_max_freq"))?;
        Some((min / 1_000_000.0, max / 1_000_000.0))
    }

    fn cpu_cache() -> CacheSizes {
        let mut cache = CacheSizes::default();
        let Ok(entries) = fs::read_dir(Path::new(CPU0).join("cache")) else {
            return cache;
        };
        for entry in entries.flatten() {
            let dir = entry.path();
            let is_index = dir
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("index"));
            if !is_index {
                continue;
            }
            let level: Option<u8> = read_number(dir.join("level"));
            let kind = read_trimmed(dir.join("type")).unwrap_or_default();
            let size = read_trimmed(dir.join("size")).and_then(|s| parse::parse_cache_size(&s));
            match (level, kind.as_str()) {
                (Some(1), "Data") => cache.l1d = size,
                (Some(1), "Instruction") => cache.l1i = size,
                (Some(2), _) => cache.l2 = size,
                (Some(3), _) => cache.l3 = size,
                _ => {}
            }
        }
        cache
    }

    fn cpu_summary() -> CpuInfoSummary {
        fs::read_to_string("/proc/cpuinfo")
            .map(|contents| parse::parse_cpuinfo(&contents))
            .unwrap_or_default()
    }

    fn cpu_times() -> Option<CpuTimes> {
        let contents = fs::read_to_string("/proc/stat").ok()?;
        parse::parse_cpu_times(&contents)
    }

    fn memory_modules() -> Vec<MemoryModule> {
        // Type 17 entries are usually root-only; unreadable means an empty layout.
        let Ok(entries) = fs::read_dir(DMI_ENTRIES) else {
            return Vec::new();
        };
        let mut devices: Vec<(u32, Vec<u8>)> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let index = name.strip_prefix("17-")?.parse().ok()?;
                let raw = fs::read(entry.path().join("raw")).ok()?;
                Some((index, raw))
            })
            .collect();
        devices.sort_by_key(|(index, _)| *index);
        devices
            .iter()
            .filter_map(|(_, raw)| parse::parse_memory_device(raw))
            .collect()
    }

    fn block_devices() -> Option<Vec<DiskDevice>> {
        let entries = fs::read_dir("/sys/block").ok()?;
        let mut devices: Vec<DiskDevice> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if ["loop", "ram", "zram", "dm-", "md"]
                    .iter()
                    .any(|prefix| name.starts_with(prefix))
                {
                    return None;
                }
                let dir = entry.path();
                let rotational: Option<u8> = read_number(dir.join("queue/rotational"));
                let kind = if name.starts_with("nvme") {
                    "NVMe"
                } else if rotational == Some(1) {
                    "HD"
                } else {
                    "SSD"
                };
                let sectors: u64 = read_number(dir.join("size")).unwrap_or(0);
                Some(DiskDevice {
                    kind: Some(kind.to_string()),
                    vendor: read_trimmed(dir.join("device/vendor")),
                    model: read_trimmed(dir.join("device/model")),
                    size: sectors * 512,
                    name,
                })
            })
            .collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Some(devices)
    }

    fn gpu_controllers() -> Vec<GpuController> {
        let Ok(entries) = fs::read_dir(DRM_CLASS) else {
            return Vec::new();
        };
        let mut cards: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            // connectors look like card0-HDMI-A-1
            .filter(|name| {
                name.strip_prefix("card")
                    .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
            })
            .collect();
        cards.sort();

        let mut controllers = Vec::new();
        let mut seen_slots = Vec::new();
        for card in cards {
            let device = Path::new(DRM_CLASS).join(&card).join("device");
            let uevent = fs::read_to_string(device.join("uevent")).unwrap_or_default();
            let slot = parse::uevent_value(&uevent, "PCI_SLOT_NAME").map(str::to_string);
            if let Some(slot) = &slot {
                if seen_slots.contains(slot) {
                    continue;
                }
                seen_slots.push(slot.clone());
            }

            let vendor_id = read_trimmed(device.join("vendor"));
            let device_id = read_trimmed(device.join("device"));
            let vendor = vendor_id
                .as_deref()
                .map(|id| parse::pci_vendor_name(id).map_or_else(|| id.to_string(), str::to_string));
            let model = read_trimmed(device.join("product_name")).or_else(|| {
                device_id
                    .as_deref()
                    .map(|id| format!("Device {}", id.trim_start_matches("0x")))
            });
            let driver = parse::uevent_value(&uevent, "DRIVER").map(str::to_string);
            let driver_version = driver
                .as_deref()
                .and_then(|d| read_trimmed(format!("/sys/module/{d}/version")));

            let memory_total_mb =
                read_number::<f64>(device.join("mem_info_vram_total")).map(|b| b / BYTES_PER_MB);
            let memory_used_mb =
                read_number::<f64>(device.join("mem_info_vram_used")).map(|b| b / BYTES_PER_MB);

            controllers.push(GpuController {
                model,
                vendor,
                bus: slot.as_deref().and_then(parse::format_pci_location),
                memory_total_mb,
                memory_used_mb,
                utilization_gpu: read_number(device.join("gpu_busy_percent")),
                driver_version,
                driver_date: None,
                direct_x_version: None,
            });
        }
        controllers
    }
}
