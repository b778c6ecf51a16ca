use serde::{Deserialize, Serialize};

use super::{NOT_AVAILABLE, fixed, leading_number, round_to};
use crate::system::snapshot::GpuController;

const FALLBACK_TOTAL_MB: f64 = 3.9 * 1024.0;
const FALLBACK_USED_MB: f64 = 0.2 * 1024.0;
const DIRECTX_PLACEHOLDER: &str = "12 (FL 12.1)";
const LOCATION_PLACEHOLDER: &str = "PCI bus 0, device 2, function 0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMemory {
    pub dedicated: String,
    pub shared: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub used_memory: String,
    /// Not clamped; can exceed 100 when the driver over-reports.
    pub usage_percent: f64,
    pub model: String,
    pub vendor: String,
    pub utilization: String,
    pub memory: GpuMemory,
    pub driver_version: String,
    pub driver_date: String,
    pub direct_x_version: String,
    pub physical_location: String,
}

impl GpuInfo {
    pub fn utilization_percent(&self) -> Option<f64> {
        leading_number(&self.utilization)
    }

    pub fn used_memory_gb(&self) -> Option<f64> {
        leading_number(&self.used_memory)
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0 && v.is_finite())
}

fn or_na(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats the first controller. `None` when the machine reports no GPU.
pub fn format_gpu(controllers: &[GpuController]) -> Option<GpuInfo> {
    let controller = controllers.first()?.clone();

    let total_mb = positive(controller.memory_total_mb).unwrap_or(FALLBACK_TOTAL_MB);
    let used_mb = positive(controller.memory_used_mb).unwrap_or(FALLBACK_USED_MB);
    let total = fixed(total_mb / 1024.0, 1);
    let used = fixed(used_mb / 1024.0, 1);

    let total_gb = round_to(total_mb / 1024.0, 1);
    let used_gb = round_to(used_mb / 1024.0, 1);
    let usage_percent = if total_gb > 0.0 {
        used_gb / total_gb * 100.0
    } else {
        0.0
    };

    let utilization = controller.utilization_gpu.unwrap_or(0.0);
    let memory = format!("{used}/{total} GB");

    Some(GpuInfo {
        used_memory: format!("{used} GB"),
        usage_percent,
        model: or_na(controller.model),
        vendor: or_na(controller.vendor),
        utilization: format!("{utilization}%"),
        memory: GpuMemory {
            dedicated: memory.clone(),
            shared: memory,
        },
        driver_version: or_na(controller.driver_version),
        driver_date: or_na(controller.driver_date),
        direct_x_version: controller
            .direct_x_version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DIRECTX_PLACEHOLDER.to_string()),
        physical_location: controller
            .bus
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| LOCATION_PLACEHOLDER.to_string()),
    })
}
