//! The simulation state block: registry, history, events, mode and run flag.
//!
//! Every mutation goes through [`Simulation::tick`] or the control methods in
//! [`crate::control`]. Readers get owned copies via [`Simulation::snapshot`] so
//! nothing outside the lock ever sees a half-applied tick.

use std::time::{Duration, Instant};

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use winoptima_core::config::SimulationConfig;
use winoptima_core::{seed_workloads, Mode, Workload};

use crate::allocation;
use crate::fluctuation;
use crate::metrics::TickMetrics;
use crate::ring::RingBuffer;

/// Threads reported per simulated workload.
const THREADS_PER_WORKLOAD: usize = 12;

/// Local wall-clock `HH:MM:SS`, used for samples, events and advisories.
pub fn clock_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Aggregates of one completed tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSample {
    pub time: String,
    /// Sum of granted CPU units.
    #[serde(rename = "cpuUsage")]
    pub cpu_usage: f64,
    /// Sum of granted RAM in gigabytes.
    #[serde(rename = "ramUsage")]
    pub ram_usage: f64,
    /// Workloads that ended the tick Throttled or Critical.
    pub bottlenecks: usize,
}

impl TickSample {
    pub fn from_workloads(time: String, workloads: &[Workload]) -> Self {
        Self {
            time,
            cpu_usage: workloads.iter().map(|w| w.cpu_allocated).sum(),
            ram_usage: workloads.iter().map(|w| w.ram_allocated).sum::<f64>() / 1024.0,
            bottlenecks: workloads.iter().filter(|w| w.status.is_bottleneck()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The simulation is paused; nothing changed.
    Skipped,
    Completed(TickSample),
}

/// Owned copy of the observable state, shaped like `GET /api/state`.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub programs: Vec<Workload>,
    pub history: Vec<TickSample>,
    /// Newest first.
    pub events: Vec<String>,
    pub mode: Mode,
    pub is_running: bool,
    pub total_threads: usize,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) workloads: Vec<Workload>,
    pub(crate) history: RingBuffer<TickSample>,
    /// Oldest to newest; readers ask for newest first.
    pub(crate) events: RingBuffer<String>,
    pub(crate) mode: Mode,
    pub(crate) running: bool,
    pub(crate) metrics: TickMetrics,
    config: SimulationConfig,
    started_at: Instant,
    rng: StdRng,
}

impl Simulation {
    /// Seeded from `config.seed` when set, OS entropy otherwise.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, rng: StdRng) -> Self {
        Self {
            workloads: seed_workloads(),
            history: RingBuffer::new(config.history_capacity),
            events: RingBuffer::new(config.event_capacity),
            mode: Mode::default(),
            running: true,
            metrics: TickMetrics::default(),
            config,
            started_at: Instant::now(),
            rng,
        }
    }

    pub fn workloads(&self) -> &[Workload] {
        &self.workloads
    }

    pub fn history(&self) -> &RingBuffer<TickSample> {
        &self.history
    }

    pub fn events(&self) -> &RingBuffer<String> {
        &self.events
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Advance one step: fluctuate demands, reallocate, then append the
    /// sample and at most one event. No-op while paused.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            self.metrics.record_skip();
            return TickOutcome::Skipped;
        }

        let started = Instant::now();
        fluctuation::fluctuate_demands(&mut self.rng, &mut self.workloads);
        let summary = allocation::allocate(&mut self.workloads, self.mode);

        let ts = clock_label();
        let sample = TickSample::from_workloads(ts.clone(), &self.workloads);
        self.history.push(sample.clone());

        if sample.bottlenecks > 0 {
            self.events.push(format!(
                "Resource Contention: {} processes throttled at {}",
                sample.bottlenecks, ts
            ));
        } else if self.rng.gen::<f64>() < self.config.nominal_event_probability {
            self.events.push(format!("System Nominal at {ts}"));
        }

        self.metrics.record_execution(started.elapsed());
        debug!(
            cpu = sample.cpu_usage,
            ram_gb = sample.ram_usage,
            bottlenecks = sample.bottlenecks,
            cpu_contended = summary.cpu_contended,
            ram_contended = summary.ram_contended,
            "Tick complete"
        );
        TickOutcome::Completed(sample)
    }

    /// Copy of the registry for off-lock analysis.
    pub fn workloads_snapshot(&self) -> Vec<Workload> {
        self.workloads.clone()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            programs: self.workloads.clone(),
            history: self.history.to_vec(),
            events: self.events.newest_first(self.config.snapshot_event_limit),
            mode: self.mode,
            is_running: self.running,
            total_threads: self.workloads.len() * THREADS_PER_WORKLOAD,
            uptime_seconds: self.uptime().as_secs(),
        }
    }
}
