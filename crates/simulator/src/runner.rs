//! Background tick scheduler driving a shared [`Simulation`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, trace};

use crate::simulation::{Simulation, TickOutcome};

/// The single lock guarding the whole simulation state block.
pub type SharedSimulation = Arc<Mutex<Simulation>>;

pub fn new_shared(simulation: Simulation) -> SharedSimulation {
    Arc::new(Mutex::new(simulation))
}

/// Run `step` against a copy of `sim` and commit the copy only if it returns.
///
/// A panicking step leaves `sim` exactly as it was and yields `None`.
pub fn run_staged<F>(sim: &mut Simulation, step: F) -> Option<TickOutcome>
where
    F: FnOnce(&mut Simulation) -> TickOutcome,
{
    let mut staged = sim.clone();
    let result = catch_unwind(AssertUnwindSafe(move || {
        let outcome = step(&mut staged);
        (staged, outcome)
    }));
    match result {
        Ok((staged, outcome)) => {
            *sim = staged;
            Some(outcome)
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(reason = %reason, "Tick failed; state left unchanged");
            None
        }
    }
}

/// Spawn the tick loop. It stops once `shutdown` flips to `true` or its sender drops.
pub fn spawn_tick_loop(
    sim: SharedSimulation,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run_tick_loop(sim, interval, shutdown))
}

pub async fn run_tick_loop(sim: SharedSimulation, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; the first step happens one period in.
    interval.tick().await;

    info!(interval_ms = period.as_millis() as u64, "Tick loop started");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut guard = sim.lock().await;
                if let Some(TickOutcome::Skipped) = run_staged(&mut guard, Simulation::tick) {
                    trace!("Tick skipped while paused");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("Tick loop stopped");
}
