//! Bounded random walk applied to every workload's demand once per tick.

use rand::Rng;

use winoptima_core::Workload;

pub const CPU_VARIANCE: f64 = 5.0;
pub const CPU_DEMAND_MIN: f64 = 1.0;
pub const CPU_DEMAND_MAX: f64 = 90.0;

pub const RAM_VARIANCE: f64 = 200.0;
pub const RAM_DEMAND_MIN: f64 = 200.0;
pub const RAM_DEMAND_MAX: f64 = 8000.0;

/// `current + U * variance` with `U` uniform in [-0.5, 0.5), clamped into `[min, max]`.
pub fn fluctuate<R: Rng + ?Sized>(rng: &mut R, current: f64, variance: f64, min: f64, max: f64) -> f64 {
    let change = (rng.gen::<f64>() - 0.5) * variance;
    (current + change).clamp(min, max)
}

/// Step every workload's CPU and RAM demand independently.
pub fn fluctuate_demands<R: Rng + ?Sized>(rng: &mut R, workloads: &mut [Workload]) {
    for w in workloads.iter_mut() {
        w.cpu_demand = fluctuate(rng, w.cpu_demand, CPU_VARIANCE, CPU_DEMAND_MIN, CPU_DEMAND_MAX);
        w.ram_demand = fluctuate(rng, w.ram_demand, RAM_VARIANCE, RAM_DEMAND_MIN, RAM_DEMAND_MAX);
    }
}
