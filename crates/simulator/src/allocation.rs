//! Priority-weighted CPU and RAM allocation under fixed capacities.
//!
//! CPU is shared proportionally to `weight(priority, mode) * demand` when total
//! demand exceeds [`CPU_CAPACITY`]. RAM is cut proportionally to demand when
//! total demand exceeds [`RAM_CAPACITY_MB`]. Realtime workloads bypass both:
//! they always receive their full demand (CPU capped at capacity), even if that
//! pushes the granted total above capacity.

use winoptima_core::{Mode, Priority, Status, Workload};

/// Simulated CPU budget in percent units.
pub const CPU_CAPACITY: f64 = 100.0;
pub const RAM_CAPACITY_MB: f64 = 16384.0;

/// Floor for the weighted-demand denominator.
const WEIGHT_EPSILON: f64 = 1e-6;

/// Share below this fraction of demand is Critical.
const CRITICAL_RATIO: f64 = 0.4;
/// Share below this fraction of demand is Throttled.
const THROTTLED_RATIO: f64 = 0.8;

/// RAM cuts overshoot the overflow by this factor.
const RAM_CUT_FACTOR: f64 = 1.2;
/// No non-Realtime workload is cut below this many MB.
const RAM_FLOOR_MB: f64 = 100.0;
/// A RAM grant below this fraction of demand downgrades Running to Throttled.
const RAM_PRESSURE_RATIO: f64 = 0.9;

/// What the engine saw on one pass, for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationSummary {
    pub total_cpu_demand: f64,
    pub total_ram_demand: f64,
    pub cpu_contended: bool,
    pub ram_contended: bool,
}

/// CPU share weight of a priority class under a mode.
pub fn priority_weight(mode: Mode, priority: Priority) -> f64 {
    match (priority, mode) {
        (Priority::Realtime, Mode::Performance) => 4.0,
        (Priority::Realtime, Mode::Efficiency | Mode::Balanced) => 3.0,
        (Priority::High, Mode::Performance) => 3.0,
        (Priority::High, Mode::Efficiency | Mode::Balanced) => 2.0,
        (Priority::Normal, _) => 1.0,
        (Priority::Low, Mode::Efficiency) => 0.2,
        (Priority::Low, Mode::Performance | Mode::Balanced) => 0.5,
    }
}

/// Health of a workload granted `allocated` out of `demand`.
pub fn classify(allocated: f64, demand: f64) -> Status {
    if allocated < demand * CRITICAL_RATIO {
        Status::Critical
    } else if allocated < demand * THROTTLED_RATIO {
        Status::Throttled
    } else {
        Status::Running
    }
}

/// Recompute every workload's allocations and status from its current demand.
pub fn allocate(workloads: &mut [Workload], mode: Mode) -> AllocationSummary {
    let (total_cpu_demand, cpu_contended) = allocate_cpu(workloads, mode);
    let (total_ram_demand, ram_contended) = allocate_ram(workloads);
    AllocationSummary {
        total_cpu_demand,
        total_ram_demand,
        cpu_contended,
        ram_contended,
    }
}

fn allocate_cpu(workloads: &mut [Workload], mode: Mode) -> (f64, bool) {
    let total_demand: f64 = workloads.iter().map(|w| w.cpu_demand).sum();

    if total_demand <= CPU_CAPACITY {
        for w in workloads.iter_mut() {
            w.cpu_allocated = w.cpu_demand;
            w.status = Status::Running;
        }
        return (total_demand, false);
    }

    let total_weighted = workloads
        .iter()
        .map(|w| priority_weight(mode, w.priority) * w.cpu_demand)
        .sum::<f64>()
        .max(WEIGHT_EPSILON);

    for w in workloads.iter_mut() {
        if w.priority == Priority::Realtime {
            w.cpu_allocated = w.cpu_demand.min(CPU_CAPACITY);
            w.status = Status::Running;
            continue;
        }
        let weighted = priority_weight(mode, w.priority) * w.cpu_demand;
        let share = (weighted / total_weighted * CPU_CAPACITY).min(w.cpu_demand);
        w.cpu_allocated = share;
        w.status = classify(share, w.cpu_demand);
    }

    (total_demand, true)
}

/// Runs after CPU so RAM pressure can only worsen the CPU-derived status.
fn allocate_ram(workloads: &mut [Workload]) -> (f64, bool) {
    let total_demand: f64 = workloads.iter().map(|w| w.ram_demand).sum();

    if total_demand <= RAM_CAPACITY_MB {
        for w in workloads.iter_mut() {
            w.ram_allocated = w.ram_demand;
        }
        return (total_demand, false);
    }

    let overflow = total_demand - RAM_CAPACITY_MB;
    for w in workloads.iter_mut() {
        if w.priority == Priority::Realtime {
            w.ram_allocated = w.ram_demand;
            continue;
        }
        let cut = overflow * (w.ram_demand / total_demand) * RAM_CUT_FACTOR;
        w.ram_allocated = (w.ram_demand - cut).max(RAM_FLOOR_MB);
        if w.ram_allocated < w.ram_demand * RAM_PRESSURE_RATIO && w.status == Status::Running {
            w.status = Status::Throttled;
        }
    }

    (total_demand, true)
}

#[cfg(test)]
mod tests {
    use winoptima_core::seed_workloads;

    use super::*;

    fn workload(id: u32, priority: Priority, cpu: f64, ram: f64) -> Workload {
        Workload::new(id, format!("w{id}"), priority, cpu, ram)
    }

    #[test]
    fn weight_table() {
        use Mode::*;
        use Priority::*;

        assert_eq!(priority_weight(Performance, Realtime), 4.0);
        assert_eq!(priority_weight(Performance, High), 3.0);
        assert_eq!(priority_weight(Performance, Normal), 1.0);
        assert_eq!(priority_weight(Performance, Low), 0.5);

        assert_eq!(priority_weight(Efficiency, Realtime), 3.0);
        assert_eq!(priority_weight(Efficiency, High), 2.0);
        assert_eq!(priority_weight(Efficiency, Normal), 1.0);
        assert_eq!(priority_weight(Efficiency, Low), 0.2);

        assert_eq!(priority_weight(Balanced, Realtime), 3.0);
        assert_eq!(priority_weight(Balanced, High), 2.0);
        assert_eq!(priority_weight(Balanced, Normal), 1.0);
        assert_eq!(priority_weight(Balanced, Low), 0.5);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(10.0, 10.0), Status::Running);
        assert_eq!(classify(8.0, 10.0), Status::Running);
        assert_eq!(classify(7.99, 10.0), Status::Throttled);
        assert_eq!(classify(4.0, 10.0), Status::Throttled);
        assert_eq!(classify(3.99, 10.0), Status::Critical);
        assert_eq!(classify(0.0, 10.0), Status::Critical);
    }

    #[test]
    fn seed_registry_is_uncontended() {
        let mut workloads = seed_workloads();
        let summary = allocate(&mut workloads, Mode::Balanced);

        assert!((summary.total_cpu_demand - 77.5).abs() < 1e-9);
        assert!(!summary.cpu_contended);
        assert!(!summary.ram_contended);
        for w in &workloads {
            assert_eq!(w.cpu_allocated, w.cpu_demand);
            assert_eq!(w.ram_allocated, w.ram_demand);
            assert_eq!(w.status, Status::Running);
        }
    }

    #[test]
    fn exactly_at_capacity_is_uncontended() {
        let mut workloads = vec![
            workload(1, Priority::Low, 60.0, 8000.0),
            workload(2, Priority::Low, 40.0, 8384.0),
        ];
        let summary = allocate(&mut workloads, Mode::Efficiency);
        assert!(!summary.cpu_contended);
        assert!(!summary.ram_contended);
        assert_eq!(workloads[0].cpu_allocated, 60.0);
        assert_eq!(workloads[1].ram_allocated, 8384.0);
    }

    #[test]
    fn contention_with_realtime_in_balanced_mode() {
        // Total CPU demand 150 with one Realtime workload asking for 10.
        let mut workloads = vec![
            workload(1, Priority::Realtime, 10.0, 500.0),
            workload(2, Priority::High, 40.0, 500.0),
            workload(3, Priority::Normal, 60.0, 500.0),
            workload(4, Priority::Low, 40.0, 500.0),
        ];
        let summary = allocate(&mut workloads, Mode::Balanced);
        assert!(summary.cpu_contended);
        assert!((summary.total_cpu_demand - 150.0).abs() < 1e-9);

        assert_eq!(workloads[0].cpu_allocated, 10.0);
        assert_eq!(workloads[0].status, Status::Running);

        // weighted: 30 + 80 + 60 + 20 = 190
        let total_weighted = 190.0;
        let normal = 60.0 / total_weighted * 100.0;
        let low = 20.0 / total_weighted * 100.0;
        // High's share of 42.1 is capped at its demand.
        assert_eq!(workloads[1].cpu_allocated, 40.0);
        assert!((workloads[2].cpu_allocated - normal).abs() < 1e-9);
        assert!((workloads[3].cpu_allocated - low).abs() < 1e-9);

        assert_eq!(workloads[1].status, Status::Running);
        assert_eq!(workloads[2].status, Status::Throttled); // 31.6 of 60
        assert_eq!(workloads[3].status, Status::Critical); // 10.5 of 40
    }

    #[test]
    fn share_is_capped_at_demand() {
        let mut workloads = vec![
            workload(1, Priority::High, 10.0, 500.0),
            workload(2, Priority::Low, 95.0, 500.0),
        ];
        allocate(&mut workloads, Mode::Performance);
        // High: 30 / (30 + 47.5) * 100 = 38.7, capped at 10.
        assert_eq!(workloads[0].cpu_allocated, 10.0);
        assert_eq!(workloads[0].status, Status::Running);
        for w in &workloads {
            assert!(w.cpu_allocated <= w.cpu_demand);
        }
    }

    #[test]
    fn realtime_override_may_oversubscribe() {
        let mut workloads = vec![
            workload(1, Priority::Realtime, 90.0, 500.0),
            workload(2, Priority::Realtime, 90.0, 500.0),
        ];
        allocate(&mut workloads, Mode::Efficiency);
        let granted: f64 = workloads.iter().map(|w| w.cpu_allocated).sum();
        assert_eq!(granted, 180.0);
        assert!(workloads.iter().all(|w| w.status == Status::Running));
    }

    #[test]
    fn mode_changes_distribution() {
        let base = vec![
            workload(1, Priority::High, 60.0, 500.0),
            workload(2, Priority::Low, 60.0, 500.0),
        ];

        let mut perf = base.clone();
        allocate(&mut perf, Mode::Performance);
        let mut eff = base.clone();
        allocate(&mut eff, Mode::Efficiency);

        // Efficiency starves Low harder than Performance does.
        assert!(eff[1].cpu_allocated < perf[1].cpu_allocated);
    }

    #[test]
    fn ram_overflow_cuts_non_realtime_proportionally() {
        let mut workloads = vec![
            workload(1, Priority::Realtime, 5.0, 8000.0),
            workload(2, Priority::Normal, 5.0, 8000.0),
            workload(3, Priority::Low, 5.0, 4000.0),
        ];
        let summary = allocate(&mut workloads, Mode::Balanced);
        assert!(summary.ram_contended);

        let total = 20000.0;
        let overflow = total - RAM_CAPACITY_MB;
        assert_eq!(workloads[0].ram_allocated, 8000.0);

        let cut_normal = overflow * (8000.0 / total) * 1.2;
        assert!((workloads[1].ram_allocated - (8000.0 - cut_normal)).abs() < 1e-9);
        let cut_low = overflow * (4000.0 / total) * 1.2;
        assert!((workloads[2].ram_allocated - (4000.0 - cut_low)).abs() < 1e-9);

        // 8000 - 1735.68 < 7200: RAM pressure downgrades Running.
        assert_eq!(workloads[0].status, Status::Running);
        assert_eq!(workloads[1].status, Status::Throttled);
        assert_eq!(workloads[2].status, Status::Throttled);
    }

    #[test]
    fn ram_pressure_never_improves_status() {
        let mut workloads = vec![
            workload(1, Priority::Normal, 80.0, 8000.0),
            workload(2, Priority::Low, 80.0, 8000.0),
            workload(3, Priority::Low, 10.0, 8000.0),
        ];
        allocate(&mut workloads, Mode::Efficiency);
        // CPU contention makes the Low workloads Critical; RAM must not lift them.
        assert_eq!(workloads[1].status, Status::Critical);
        assert!(workloads[1].ram_allocated < workloads[1].ram_demand);
    }

    #[test]
    fn ram_cut_against_realtime_pressure_stays_within_demand() {
        let mut workloads = vec![
            workload(1, Priority::Realtime, 5.0, 8000.0),
            workload(2, Priority::Realtime, 5.0, 8000.0),
            workload(3, Priority::Realtime, 5.0, 8000.0),
            workload(4, Priority::Low, 5.0, 200.0),
        ];
        allocate(&mut workloads, Mode::Balanced);
        for w in &workloads[..3] {
            assert_eq!(w.ram_allocated, 8000.0);
        }
        // 200 - 7816 * (200 / 24200) * 1.2, well above the floor.
        assert!((workloads[3].ram_allocated - 122.486).abs() < 1e-3);
        assert!(workloads[3].ram_allocated <= workloads[3].ram_demand);
    }

    #[test]
    fn ram_cut_never_goes_below_floor() {
        let mut workloads = vec![
            workload(1, Priority::Normal, 5.0, 8000.0),
            workload(2, Priority::Normal, 5.0, 8000.0),
            workload(3, Priority::Normal, 5.0, 8000.0),
            workload(4, Priority::Normal, 5.0, 8000.0),
            workload(5, Priority::Low, 5.0, 200.0),
        ];
        allocate(&mut workloads, Mode::Balanced);

        // The proportional cut would leave about 82 MB.
        assert_eq!(workloads[4].ram_allocated, 100.0);
        assert_eq!(workloads[4].status, Status::Throttled);
        for w in &workloads {
            assert!(w.ram_allocated >= 100.0);
        }
    }

    #[test]
    fn status_bands_hold_under_contention() {
        let mut workloads = vec![
            workload(1, Priority::High, 90.0, 300.0),
            workload(2, Priority::Normal, 70.0, 300.0),
            workload(3, Priority::Low, 50.0, 300.0),
            workload(4, Priority::Normal, 5.0, 300.0),
        ];
        allocate(&mut workloads, Mode::Balanced);
        for w in &workloads {
            match w.status {
                Status::Critical => assert!(w.cpu_allocated < 0.4 * w.cpu_demand),
                Status::Throttled => {
                    assert!(w.cpu_allocated >= 0.4 * w.cpu_demand);
                    assert!(w.cpu_allocated < 0.8 * w.cpu_demand);
                }
                Status::Running => assert!(w.cpu_allocated >= 0.8 * w.cpu_demand),
            }
        }
    }
}
