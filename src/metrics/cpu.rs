use serde::{Deserialize, Serialize};

use super::{NOT_AVAILABLE, fixed};
use crate::system::snapshot::{CpuIdentity, CpuLoad, CpuSpeed, CpuTemperature};

/// Everything the CPU endpoint gathers before formatting.
#[derive(Debug, Clone, Default)]
pub struct CpuReadings {
    pub total_processes: usize,
    pub identity: CpuIdentity,
    pub speed: CpuSpeed,
    pub load: CpuLoad,
    pub temperature: Option<CpuTemperature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSpeedInfo {
    #[serde(rename = "minGHz")]
    pub min_ghz: f64,
    #[serde(rename = "maxGHz")]
    pub max_ghz: f64,
    #[serde(rename = "avgGHz")]
    pub avg_ghz: f64,
    #[serde(rename = "perCoreGHz")]
    pub per_core_ghz: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuLoadInfo {
    pub total_load_percent: f64,
    #[serde(default)]
    pub user_load_percent: Option<f64>,
    #[serde(default)]
    pub system_load_percent: Option<f64>,
    #[serde(default)]
    pub idle_load_percent: Option<f64>,
    #[serde(default)]
    pub per_core_load_percent: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuTemperatureInfo {
    pub main_celsius: Option<f64>,
    pub max_celsius: Option<f64>,
    pub cores_celsius: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuHistoryPoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    #[serde(rename = "baseSpeedGHz")]
    pub base_speed_ghz: f64,
    #[serde(rename = "minSpeedGHz")]
    pub min_speed_ghz: f64,
    #[serde(rename = "maxSpeedGHz")]
    pub max_speed_ghz: f64,
    pub physical_cores: usize,
    pub logical_cores: usize,
    pub processors: usize,
    /// L3 cache in MB.
    pub cache3: String,
    /// L2 cache in KB.
    pub cache2: String,
    pub totalprocess: usize,
    pub current_speed: CpuSpeedInfo,
    pub load: CpuLoadInfo,
    #[serde(default)]
    pub temperature: Option<CpuTemperatureInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    pub historical_data: Vec<CpuHistoryPoint>,
}

impl CpuInfo {
    /// Utilization of the single point the server attaches to each response.
    pub fn utilization(&self) -> f64 {
        self.historical_data
            .last()
            .map_or(self.load.total_load_percent, |p| p.utilization)
    }
}

pub fn format_cpu(readings: CpuReadings, timestamp_ms: i64) -> CpuInfo {
    let CpuReadings {
        total_processes,
        identity,
        speed,
        load,
        temperature,
    } = readings;

    let l3_mb = identity.cache.l3.unwrap_or(0) as f64 / (1024.0 * 1024.0);
    let l2_kb = identity.cache.l2.unwrap_or(0) as f64 / 1024.0;

    CpuInfo {
        manufacturer: identity
            .manufacturer
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        brand: identity.brand.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        base_speed_ghz: identity.speed_ghz.unwrap_or(0.0),
        min_speed_ghz: identity.speed_min_ghz.unwrap_or(0.0),
        max_speed_ghz: identity.speed_max_ghz.unwrap_or(0.0),
        physical_cores: identity.physical_cores.unwrap_or(identity.logical_cores),
        logical_cores: identity.logical_cores,
        processors: identity.processors.unwrap_or(1),
        cache3: fixed(l3_mb, 2),
        cache2: fixed(l2_kb, 2),
        totalprocess: total_processes,
        current_speed: CpuSpeedInfo {
            min_ghz: speed.min,
            max_ghz: speed.max,
            avg_ghz: speed.avg,
            per_core_ghz: speed.cores,
        },
        historical_data: vec![CpuHistoryPoint {
            timestamp: timestamp_ms,
            utilization: load.current,
        }],
        load: CpuLoadInfo {
            total_load_percent: load.current,
            user_load_percent: load.user,
            system_load_percent: load.system,
            idle_load_percent: load.idle,
            per_core_load_percent: load.per_core,
        },
        temperature: temperature.map(|t| CpuTemperatureInfo {
            main_celsius: t.main,
            max_celsius: t.max,
            cores_celsius: t.cores,
        }),
        flags: identity.flags,
    }
}
