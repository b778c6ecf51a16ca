//! Parsers for the kernel and firmware formats read by the platform readers.
//!
//! Kept free of `cfg` so they are tested on every host.

use crate::system::snapshot::MemoryModule;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Whitespace-separated fields of `/proc/<pid>/stat` that follow the `comm` field.
pub fn stat_fields_after_comm(contents: &str) -> Option<Vec<&str>> {
    // comm may contain spaces and parens, so split on the last ')'
    let after_comm = contents.rfind(')')? + 1;
    Some(contents[after_comm..].split_whitespace().collect())
}

/// Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4) tpgid(5)
/// flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10) utime(11) stime(12)
/// cutime(13) cstime(14) priority(15) nice(16) num_threads(17)
pub fn stat_priority(contents: &str) -> Option<i32> {
    stat_fields_after_comm(contents)?.get(15)?.parse().ok()
}

pub fn stat_threads(contents: &str) -> Option<u32> {
    stat_fields_after_comm(contents)?.get(17)?.parse().ok()
}

/// Aggregate jiffies from the first `cpu` line of `/proc/stat`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadSplit {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Percent split of the time elapsed between `earlier` and `self`.
    pub fn load_since(&self, earlier: &CpuTimes) -> Option<LoadSplit> {
        let total = self.total().checked_sub(earlier.total())?;
        if total == 0 {
            return None;
        }
        let pct = |now: u64, then: u64| now.saturating_sub(then) as f64 / total as f64 * 100.0;
        Some(LoadSplit {
            user: pct(self.user + self.nice, earlier.user + earlier.nice),
            system: pct(
                self.system + self.irq + self.softirq,
                earlier.system + earlier.irq + earlier.softirq,
            ),
            idle: pct(self.idle + self.iowait, earlier.idle + earlier.iowait),
        })
    }
}

pub fn parse_cpu_times(proc_stat: &str) -> Option<CpuTimes> {
    let line = proc_stat
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))?;
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse().unwrap_or(0))
        .collect();
    if values.len() < 4 {
        return None;
    }
    let at = |i: usize| values.get(i).copied().unwrap_or(0);
    Some(CpuTimes {
        user: at(0),
        nice: at(1),
        system: at(2),
        idle: at(3),
        iowait: at(4),
        irq: at(5),
        softirq: at(6),
        steal: at(7),
    })
}

/// Parses sysfs cache sizes such as `32K`, `8192K` or `16M` into bytes.
pub fn parse_cache_size(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last()? {
        'K' | 'k' => (&raw[..raw.len() - 1], KIB),
        'M' | 'm' => (&raw[..raw.len() - 1], MIB),
        'G' | 'g' => (&raw[..raw.len() - 1], MIB * 1024),
        _ => (raw, 1),
    };
    digits.trim().parse::<u64>().ok().map(|v| v * multiplier)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuInfoSummary {
    pub packages: Option<usize>,
    pub flags: Option<String>,
}

/// Counts physical packages and picks the feature flags from `/proc/cpuinfo`.
pub fn parse_cpuinfo(contents: &str) -> CpuInfoSummary {
    let mut package_ids: Vec<&str> = Vec::new();
    let mut flags = None;
    for line in contents.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "physical id" => {
                let id = value.trim();
                if !package_ids.contains(&id) {
                    package_ids.push(id);
                }
            }
            // "Features" on arm
            "flags" | "Features" if flags.is_none() => {
                let value = value.trim();
                if !value.is_empty() {
                    flags = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    CpuInfoSummary {
        packages: (!package_ids.is_empty()).then_some(package_ids.len()),
        flags,
    }
}

/// Value of `KEY=value` in a sysfs `uevent` file.
pub fn uevent_value<'a>(contents: &'a str, key: &str) -> Option<&'a str> {
    contents.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k == key).then(|| v.trim())
    })
}

/// `0000:01:00.0` → `PCI bus 1, device 0, function 0`.
pub fn format_pci_location(slot: &str) -> Option<String> {
    let mut parts = slot.trim().rsplitn(3, ':');
    let dev_fn = parts.next()?;
    let bus = parts.next()?;
    let (device, function) = dev_fn.split_once('.')?;
    let bus = u32::from_str_radix(bus, 16).ok()?;
    let device = u32::from_str_radix(device, 16).ok()?;
    let function = u32::from_str_radix(function, 16).ok()?;
    Some(format!(
        "PCI bus {bus}, device {device}, function {function}"
    ))
}

pub fn pci_vendor_name(vendor_id: &str) -> Option<&'static str> {
    let id = vendor_id.trim().trim_start_matches("0x").to_ascii_lowercase();
    match id.as_str() {
        "10de" => Some("NVIDIA Corporation"),
        "1002" | "1022" => Some("Advanced Micro Devices, Inc. [AMD/ATI]"),
        "8086" => Some("Intel Corporation"),
        "1af4" => Some("Red Hat, Inc."),
        "15ad" => Some("VMware"),
        "1414" => Some("Microsoft Corporation"),
        "1234" => Some("QEMU"),
        _ => None,
    }
}

/// Decodes one SMBIOS type 17 (Memory Device) structure.
///
/// Returns `None` for empty slots and malformed entries.
pub fn parse_memory_device(raw: &[u8]) -> Option<MemoryModule> {
    let header_len = usize::from(*raw.get(1)?);
    if raw.first() != Some(&17) || header_len < 0x15 || raw.len() < header_len {
        return None;
    }
    let formatted = &raw[..header_len];
    let strings = &raw[header_len..];

    let byte = |offset: usize| formatted.get(offset).copied();
    let word = |offset: usize| {
        formatted
            .get(offset..offset + 2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
    };
    let dword = |offset: usize| {
        formatted
            .get(offset..offset + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    };
    let string_at = |offset: usize| byte(offset).and_then(|index| dmi_string(strings, index));

    let size = match word(0x0C)? {
        0 | 0xFFFF => return None,
        0x7FFF => u64::from(dword(0x1C)? & 0x7FFF_FFFF) * MIB,
        raw_size if raw_size & 0x8000 != 0 => u64::from(raw_size & 0x7FFF) * KIB,
        raw_size => u64::from(raw_size) * MIB,
    };

    let known_speed = |s: &u16| *s != 0 && *s != 0xFFFF;
    // Prefer the configured speed over the rated one.
    let clock_speed = word(0x20)
        .filter(known_speed)
        .or_else(|| word(0x15).filter(known_speed))
        .map(u32::from);

    Some(MemoryModule {
        size,
        bank: string_at(0x11).or_else(|| string_at(0x10)),
        kind: byte(0x12).and_then(memory_type_name).map(str::to_string),
        clock_speed,
        form_factor: byte(0x0E).and_then(form_factor_name).map(str::to_string),
        manufacturer: string_at(0x17),
        part_number: string_at(0x1A),
    })
}

fn dmi_string(strings: &[u8], index: u8) -> Option<String> {
    if index == 0 {
        return None;
    }
    let value = strings.split(|&b| b == 0).nth(usize::from(index) - 1)?;
    let text = String::from_utf8_lossy(value).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn memory_type_name(code: u8) -> Option<&'static str> {
    Some(match code {
        0x01 => "Other",
        0x03 => "DRAM",
        0x07 => "RAM",
        0x0F => "SDRAM",
        0x12 => "DDR",
        0x13 => "DDR2",
        0x14 => "DDR2 FB-DIMM",
        0x18 => "DDR3",
        0x1A => "DDR4",
        0x1B => "LPDDR",
        0x1C => "LPDDR2",
        0x1D => "LPDDR3",
        0x1E => "LPDDR4",
        0x22 => "DDR5",
        0x23 => "LPDDR5",
        _ => return None,
    })
}

fn form_factor_name(code: u8) -> Option<&'static str> {
    Some(match code {
        0x01 => "Other",
        0x03 => "SIMM",
        0x05 => "Chip",
        0x06 => "DIP",
        0x08 => "Proprietary Card",
        0x09 => "DIMM",
        0x0A => "TSOP",
        0x0B => "Row of chips",
        0x0C => "RIMM",
        0x0D => "SODIMM",
        0x0F => "FB-DIMM",
        0x10 => "Die",
        _ => return None,
    })
}
