use serde::{Deserialize, Serialize};

use super::OrNa;
use crate::system::snapshot::{ProcessEntry, ProcessList};

pub const TOP_PROCESSES: usize = 20;

const FALLBACK_USER: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerTier {
    Low,
    Moderate,
    High,
}

impl PowerTier {
    pub fn from_cpu(cpu: f64) -> Self {
        if cpu > 50.0 {
            PowerTier::High
        } else if cpu > 20.0 {
            PowerTier::Moderate
        } else {
            PowerTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerTier::Low => "Low",
            PowerTier::Moderate => "Moderate",
            PowerTier::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu: f64,
    pub mem: f64,
    pub power: PowerTier,
    pub threads: OrNa<u32>,
    pub priority: OrNa<i32>,
    pub status: String,
    pub user: String,
}

impl From<ProcessEntry> for ProcessSample {
    fn from(entry: ProcessEntry) -> Self {
        let cpu = entry.cpu_percent.unwrap_or(0.0);
        ProcessSample {
            pid: entry.pid,
            name: entry.name,
            cpu,
            mem: entry.mem_percent.unwrap_or(0.0),
            power: PowerTier::from_cpu(cpu),
            threads: OrNa(entry.threads.filter(|&t| t > 0)),
            priority: OrNa(entry.priority),
            status: entry
                .state
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| "unknown".to_string()),
            user: entry
                .user
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| FALLBACK_USER.to_string()),
        }
    }
}

/// Top [`TOP_PROCESSES`] entries by CPU, highest first. Ties keep provider order.
pub fn format_processes(list: ProcessList) -> Vec<ProcessSample> {
    let mut samples: Vec<ProcessSample> = list.list.into_iter().map(ProcessSample::from).collect();
    // sort_by is stable
    samples.sort_by(|a, b| b.cpu.total_cmp(&a.cpu));
    samples.truncate(TOP_PROCESSES);
    samples
}
