//! Machine Descriptors
//!
//! Describes the host a baseline was recorded on. A profile is only a
//! meaningful comparison point on the machine that produced it.
//!
//! Linux reads `/proc`; other platforms degrade to `"unknown"` values.

use ratebench_core::format_bytes;
use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";

/// Host description stored alongside a baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    /// `<os> (<arch>) <kernel release>`
    pub os: String,
    /// Harness name and version
    pub runtime: String,
    /// CPU models with their counts, e.g. `8x AMD Ryzen 7 5800X`
    pub cpu: String,
    /// Total memory, e.g. `15.5GB`
    pub mem: String,
}

impl MachineInfo {
    /// Describe the current host
    pub fn collect() -> Self {
        let release = kernel_release().unwrap_or_else(|| UNKNOWN.to_string());
        let cpu = read_cpuinfo()
            .and_then(|content| cpu_description(&content))
            .unwrap_or_else(|| format!("{}x {UNKNOWN}", logical_cpus()));
        let mem = read_meminfo()
            .and_then(|content| parse_mem_total(&content))
            .map(format_bytes)
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            os: format!(
                "{} ({}) {release}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            runtime: runtime_version(),
            cpu,
            mem,
        }
    }

    /// One-line platform summary for report headers
    pub fn describe(&self) -> String {
        format!(
            "{}; {}; {}; {} Memory",
            self.os, self.runtime, self.cpu, self.mem
        )
    }
}

/// `ratebench <version>`
pub fn runtime_version() -> String {
    format!("ratebench {}", env!("CARGO_PKG_VERSION"))
}

/// Host name for report documents
pub fn hostname() -> String {
    #[cfg(target_os = "linux")]
    {
        if let Ok(name) = std::fs::read_to_string("/proc/sys/kernel/hostname") {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }

    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

/// Group `model name` entries by model, keeping first-seen order.
fn cpu_description(cpuinfo: &str) -> Option<String> {
    let mut models: Vec<(String, usize)> = Vec::new();
    for model in cpuinfo
        .lines()
        .filter(|l| l.starts_with("model name"))
        .filter_map(|l| l.split_once(':').map(|(_, m)| m.trim()))
    {
        match models.iter_mut().find(|(name, _)| name == model) {
            Some((_, count)) => *count += 1,
            None => models.push((model.to_string(), 1)),
        }
    }

    if models.is_empty() {
        return None;
    }
    Some(
        models
            .iter()
            .map(|(model, count)| format!("{count}x {model}"))
            .collect::<Vec<_>>()
            .join(" + "),
    )
}

/// `MemTotal` in bytes
fn parse_mem_total(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|l| l.starts_with("MemTotal"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

fn logical_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(target_os = "linux")]
fn kernel_release() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|s| s.trim().to_string())
}

#[cfg(target_os = "linux")]
fn read_cpuinfo() -> Option<String> {
    std::fs::read_to_string("/proc/cpuinfo").ok()
}

#[cfg(target_os = "linux")]
fn read_meminfo() -> Option<String> {
    std::fs::read_to_string("/proc/meminfo").ok()
}

#[cfg(not(target_os = "linux"))]
fn kernel_release() -> Option<String> {
    None
}

#[cfg(not(target_os = "linux"))]
fn read_cpuinfo() -> Option<String> {
    None
}

#[cfg(not(target_os = "linux"))]
fn read_meminfo() -> Option<String> {
    None
}
