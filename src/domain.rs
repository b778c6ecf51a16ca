use std::fmt;

use serde::{Deserialize, Serialize};

/// A metrics category with its own endpoint and poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Process,
    Cpu,
    Memory,
    Disk,
    Gpu,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Process,
        Domain::Cpu,
        Domain::Memory,
        Domain::Disk,
        Domain::Gpu,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Domain::Process => "/ProcessInfo",
            Domain::Cpu => "/CPUInfo",
            Domain::Memory => "/MemoryInfo",
            Domain::Disk => "/DiskInfo",
            Domain::Gpu => "/GpuInfo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Domain::Process => "process",
            Domain::Cpu => "CPU",
            Domain::Memory => "memory",
            Domain::Disk => "disk",
            Domain::Gpu => "GPU",
        }
    }

    /// Message returned to HTTP clients when the provider fails for this domain.
    pub fn server_failure_message(self) -> &'static str {
        match self {
            Domain::Process => "Error getting processes",
            Domain::Cpu => "Failed to get CPU info",
            Domain::Memory => "Failed to get memory info",
            Domain::Disk => "Failed to get disk info",
            Domain::Gpu => "Failed to get GPU info",
        }
    }

    /// Message shown by the dashboard in place of the domain's widget.
    pub fn client_failure_message(self) -> String {
        format!("Failed to fetch {} data", self.label())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_unique() {
        let mut paths: Vec<_> = Domain::ALL.iter().map(|d| d.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Domain::ALL.len());
    }

    #[test]
    fn client_failure_message_names_domain() {
        assert_eq!(
            Domain::Cpu.client_failure_message(),
            "Failed to fetch CPU data"
        );
        assert_eq!(
            Domain::Memory.client_failure_message(),
            "Failed to fetch memory data"
        );
    }
}
