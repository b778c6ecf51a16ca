use serde::{Deserialize, Serialize};

use super::{BYTES_PER_GB, fixed, round_to};
use crate::system::snapshot::{DiskDevice, FsUsage};

/// How mounted filesystems are reduced to one capacity figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiskAggregation {
    /// The system volume only: `C:`, `/` or `/mnt/c`.
    #[default]
    #[serde(rename = "primary")]
    PrimaryVolume,
    /// Every mounted filesystem added together.
    #[serde(rename = "sum")]
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Capacity minus used, computed from the rounded GB figures.
    pub free: f64,
    #[serde(rename = "usedGB")]
    pub used_gb: String,
    pub capacity: String,
    #[serde(rename = "storagePercent")]
    pub storage_percent: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl DiskInfo {
    /// Used share of capacity. `None` when capacity is zero or unparsable.
    pub fn used_percent(&self) -> Option<f64> {
        let used: f64 = self.used_gb.parse().ok()?;
        let capacity: f64 = self.capacity.parse().ok()?;
        (capacity > 0.0).then(|| used / capacity * 100.0)
    }
}

fn is_primary_mount(mount: &str) -> bool {
    if mount == "/" || mount == "/mnt/c" {
        return true;
    }
    mount
        .trim_end_matches(['\\', '/'])
        .eq_ignore_ascii_case("c:")
}

fn usage(fs: &[FsUsage], aggregation: DiskAggregation) -> (u64, u64) {
    match aggregation {
        DiskAggregation::PrimaryVolume => fs
            .iter()
            .find(|entry| is_primary_mount(&entry.mount))
            .map_or((0, 0), |entry| (entry.size, entry.used)),
        DiskAggregation::Sum => fs.iter().fold((0, 0), |(size, used), entry| {
            (size.saturating_add(entry.size), used.saturating_add(entry.used))
        }),
    }
}

pub fn format_disk(layout: &[DiskDevice], fs: &[FsUsage], aggregation: DiskAggregation) -> DiskInfo {
    let (size, used) = usage(fs, aggregation);
    let total_gb = size as f64 / BYTES_PER_GB;
    let used_gb = used as f64 / BYTES_PER_GB;

    let storage_percent = if size == 0 {
        "0%".to_string()
    } else {
        format!("{}%", fixed(used as f64 / size as f64 * 100.0, 1))
    };

    DiskInfo {
        free: round_to(total_gb, 1) - round_to(used_gb, 1),
        used_gb: fixed(used_gb, 1),
        capacity: fixed(total_gb, 1),
        storage_percent,
        kind: layout
            .first()
            .and_then(|device| device.kind.clone())
            .filter(|kind| !kind.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}
