//! WinOptima simulation core.
//!
//! A fixed registry of simulated workloads whose demands drift every tick.
//! Each tick re-runs the priority-weighted allocation pass and appends a
//! sample to a bounded history, plus at most one entry to a bounded event
//! log. All of it lives in one [`Simulation`] value behind one lock
//! ([`SharedSimulation`]), driven by [`spawn_tick_loop`] and mutated by the
//! control commands in [`control`].

pub mod allocation;
pub mod analyzer;
pub mod control;
pub mod fluctuation;
pub mod metrics;
pub mod ring;
pub mod runner;
pub mod simulation;

pub use allocation::{allocate, priority_weight, AllocationSummary, CPU_CAPACITY, RAM_CAPACITY_MB};
pub use analyzer::analyze;
pub use control::ControlCommand;
pub use metrics::TickMetrics;
pub use ring::RingBuffer;
pub use runner::{new_shared, run_staged, spawn_tick_loop, SharedSimulation};
pub use simulation::{clock_label, Simulation, StateSnapshot, TickOutcome, TickSample};
