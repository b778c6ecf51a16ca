use serde::{Deserialize, Serialize};

use crate::system::snapshot::{MemoryModule, MemoryTotals};

const UNKNOWN: &str = "Unknown";

/// Where the `slots` count comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Number of populated modules the provider reports.
    #[default]
    Modules,
    /// A per-deployment constant.
    Fixed(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryModuleInfo {
    pub size: u64,
    pub bank: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// MHz as reported by the module, `null` when unknown.
    pub clock_speed: Option<u32>,
    pub form_factor: String,
    pub manufacturer: String,
    #[serde(default)]
    pub part_num: String,
}

impl From<MemoryModule> for MemoryModuleInfo {
    fn from(module: MemoryModule) -> Self {
        MemoryModuleInfo {
            size: module.size,
            bank: module.bank.unwrap_or_default(),
            kind: module.kind.unwrap_or_else(|| UNKNOWN.to_string()),
            clock_speed: module.clock_speed.filter(|&mhz| mhz > 0),
            form_factor: module.form_factor.unwrap_or_else(|| UNKNOWN.to_string()),
            manufacturer: module.manufacturer.unwrap_or_else(|| UNKNOWN.to_string()),
            part_num: module.part_number.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub totalmemory: u64,
    pub freememory: u64,
    pub usedmemory: u64,
    #[serde(default)]
    pub availablememory: u64,
    #[serde(default)]
    pub swaptotal: u64,
    #[serde(default)]
    pub swapused: u64,
    #[serde(rename = "MemoryLayoutInfo")]
    pub layout: Vec<MemoryModuleInfo>,
    pub slots: usize,
}

impl MemoryInfo {
    /// Used share of total memory, one decimal. `None` when the total is zero.
    pub fn used_percent(&self) -> Option<f64> {
        (self.totalmemory > 0).then(|| {
            super::round_to(
                self.usedmemory as f64 / self.totalmemory as f64 * 100.0,
                1,
            )
        })
    }
}

pub fn format_memory(
    totals: MemoryTotals,
    modules: Vec<MemoryModule>,
    policy: SlotPolicy,
) -> MemoryInfo {
    let layout: Vec<MemoryModuleInfo> = modules.into_iter().map(MemoryModuleInfo::from).collect();
    let slots = match policy {
        SlotPolicy::Modules => layout.len(),
        SlotPolicy::Fixed(n) => n,
    };
    MemoryInfo {
        totalmemory: totals.total,
        freememory: totals.free,
        usedmemory: totals.used,
        availablememory: totals.available,
        swaptotal: totals.swap_total,
        swapused: totals.swap_used,
        layout,
        slots,
    }
}
