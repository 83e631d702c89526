use winoptima_simulator::{new_shared, SharedSimulation, Simulation};

/// Shared handler state. The simulation lock is the only mutable resource.
pub struct AppState {
    pub simulation: SharedSimulation,
}

impl AppState {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation: new_shared(simulation),
        }
    }
}
