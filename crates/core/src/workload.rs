use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Stable identifier of a simulated workload, assigned once at registry build.
pub type WorkloadId = u32;

/// Scheduling class of a workload. Declared highest first, so `Realtime < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Priority {
    Realtime,
    High,
    Normal,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Realtime => write!(f, "Realtime"),
            Priority::High => write!(f, "High"),
            Priority::Normal => write!(f, "Normal"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Health classification derived from the allocation-to-demand ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Running,
    Throttled,
    Critical,
}

impl Status {
    /// Throttled and Critical workloads count as bottlenecks.
    pub fn is_bottleneck(self) -> bool {
        matches!(self, Status::Throttled | Status::Critical)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => write!(f, "Running"),
            Status::Throttled => write!(f, "Throttled"),
            Status::Critical => write!(f, "Critical"),
        }
    }
}

/// Weight-table variant used when CPU demand exceeds capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    #[default]
    Balanced,
    Performance,
    Efficiency,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Balanced, Mode::Performance, Mode::Efficiency];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Balanced => "Balanced",
            Mode::Performance => "Performance",
            Mode::Efficiency => "Efficiency",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// One simulated process in the registry.
///
/// Field names follow the JSON contract consumed by the dashboard, hence the
/// camelCase renames on the demand and allocation fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
    pub id: WorkloadId,
    pub name: String,
    pub priority: Priority,
    #[serde(rename = "cpuDemand")]
    pub cpu_demand: f64,
    /// Megabytes.
    #[serde(rename = "ramDemand")]
    pub ram_demand: f64,
    #[serde(rename = "cpuAllocated")]
    pub cpu_allocated: f64,
    #[serde(rename = "ramAllocated")]
    pub ram_allocated: f64,
    pub status: Status,
}

impl Workload {
    /// A freshly registered workload: nothing allocated yet, status Running.
    pub fn new(
        id: WorkloadId,
        name: impl Into<String>,
        priority: Priority,
        cpu_demand: f64,
        ram_demand: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            cpu_demand,
            ram_demand,
            cpu_allocated: 0.0,
            ram_allocated: 0.0,
            status: Status::Running,
        }
    }
}

/// The fixed registry every run starts from and every reset returns to.
pub fn seed_workloads() -> Vec<Workload> {
    vec![
        Workload::new(1, "System Kernel", Priority::Realtime, 7.5, 1500.0),
        Workload::new(2, "Chrome Browser", Priority::Normal, 15.0, 3667.0),
        Workload::new(3, "VS Code", Priority::High, 19.2, 1023.0),
        Workload::new(4, "Docker Desktop", Priority::Normal, 29.3, 6590.0),
        Workload::new(5, "Spotify Music", Priority::Low, 6.5, 380.0),
    ]
}
