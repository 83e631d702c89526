//! Control surface: pause, resume, reset and mode switching.
//!
//! Commands are parsed leniently. Anything unrecognized parses to `None` and
//! callers treat it as a no-op rather than an error.

use tracing::info;

use winoptima_core::{seed_workloads, Mode};

use crate::simulation::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Reset,
    SetMode(Mode),
}

impl ControlCommand {
    /// `mode` is only consulted for the `"mode"` action and must be an exact mode name.
    pub fn parse(action: Option<&str>, mode: Option<&str>) -> Option<Self> {
        match action? {
            "pause" => Some(ControlCommand::Pause),
            "resume" => Some(ControlCommand::Resume),
            "reset" => Some(ControlCommand::Reset),
            "mode" => mode?.parse::<Mode>().ok().map(ControlCommand::SetMode),
            _ => None,
        }
    }
}

impl Simulation {
    /// Returns whether the run state changed.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Returns whether the run state changed.
    pub fn resume(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    /// Restore the seed registry and clear history and events.
    /// Leaves the run state, mode and metrics alone.
    pub fn reset(&mut self) {
        self.workloads = seed_workloads();
        self.history.clear();
        self.events.clear();
    }

    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        std::mem::replace(&mut self.mode, mode) != mode
    }

    /// Returns whether any observable state changed.
    pub fn apply(&mut self, command: ControlCommand) -> bool {
        let changed = match command {
            ControlCommand::Pause => self.pause(),
            ControlCommand::Resume => self.resume(),
            ControlCommand::Reset => {
                self.reset();
                true
            }
            ControlCommand::SetMode(mode) => self.set_mode(mode),
        };
        info!(
            command = ?command,
            changed,
            running = self.running,
            mode = %self.mode,
            "Control command applied"
        );
        changed
    }
}

#[cfg(test)]
mod tests {
    use winoptima_core::config::SimulationConfig;

    use super::*;

    fn sim() -> Simulation {
        Simulation::with_seed(SimulationConfig::default(), 1)
    }

    #[test]
    fn parse_known_actions() {
        assert_eq!(ControlCommand::parse(Some("pause"), None), Some(ControlCommand::Pause));
        assert_eq!(ControlCommand::parse(Some("resume"), Some("ignored")), Some(ControlCommand::Resume));
        assert_eq!(ControlCommand::parse(Some("reset"), None), Some(ControlCommand::Reset));
        assert_eq!(
            ControlCommand::parse(Some("mode"), Some("Efficiency")),
            Some(ControlCommand::SetMode(Mode::Efficiency))
        );
    }

    #[test]
    fn parse_rejects_unknown_silently() {
        assert_eq!(ControlCommand::parse(None, None), None);
        assert_eq!(ControlCommand::parse(Some("explode"), None), None);
        assert_eq!(ControlCommand::parse(Some("Pause"), None), None);
        assert_eq!(ControlCommand::parse(Some("mode"), None), None);
        assert_eq!(ControlCommand::parse(Some("mode"), Some("Extreme")), None);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut sim = sim();
        assert!(sim.pause());
        assert!(!sim.pause());
        assert!(!sim.is_running());

        assert!(sim.resume());
        assert!(!sim.resume());
        assert!(sim.is_running());
    }

    #[test]
    fn set_mode_reports_change() {
        let mut sim = sim();
        assert!(!sim.set_mode(Mode::Balanced));
        assert!(sim.set_mode(Mode::Performance));
        assert_eq!(sim.mode(), Mode::Performance);
    }

    #[test]
    fn reset_keeps_run_state_and_mode() {
        let mut sim = sim();
        for _ in 0..5 {
            sim.tick();
        }
        sim.apply(ControlCommand::SetMode(Mode::Efficiency));
        sim.apply(ControlCommand::Pause);
        sim.apply(ControlCommand::Reset);

        assert_eq!(sim.workloads(), seed_workloads().as_slice());
        assert!(sim.history().is_empty());
        assert!(sim.events().is_empty());
        assert!(!sim.is_running());
        assert_eq!(sim.mode(), Mode::Efficiency);
        assert_eq!(sim.metrics().ticks_executed, 5);
    }
}
