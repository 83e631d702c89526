//! Advisory analyzer. Works on an owned copy of the registry, never the live one.

use std::fmt::Write;

use winoptima_core::Workload;

/// Render a diagnostic summary of `workloads`, stamped with `timestamp`.
///
/// A single nominal line when nothing is bottlenecked, otherwise one
/// recommendation per Throttled or Critical workload in registry order.
pub fn analyze(workloads: &[Workload], timestamp: &str) -> String {
    let bottlenecks: Vec<&Workload> = workloads.iter().filter(|w| w.status.is_bottleneck()).collect();
    if bottlenecks.is_empty() {
        return format!("{timestamp}: System nominal. No immediate action required.");
    }

    let mut out = format!("{timestamp}: Recommendations:");
    for w in bottlenecks {
        let _ = write!(out, "\n- Reduce memory footprint or lower priority of {} ({}).", w.name, w.priority);
    }
    out.push_str("\n- Switch to Performance mode if needed.");
    out
}
