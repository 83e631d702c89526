use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Resolves raw keys to values. `Config::from_env` plugs in the process
/// environment; tests plug in a map.
struct Source<'a> {
    profile: &'a str,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Source<'_> {
    /// Tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            let prefixed = format!("{}_{}", self.profile, key);
            if let Some(v) = (self.lookup)(&prefixed).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    /// Unparseable values fall back to the default.
    fn parsed<T: FromStr>(&self, key: &str, default: T) -> T {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WINOPTIMA_PROFILE`. When set (e.g. `DEV`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = process_env("WINOPTIMA_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, process_env)
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(profile: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let p = profile.to_uppercase();
        let source = Source {
            profile: &p,
            lookup: &lookup,
        };
        Self {
            profile: p.clone(),
            server: ServerConfig::from_source(&source),
            simulation: SimulationConfig::from_source(&source),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.simulation.validate()
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        let sim = &self.simulation;
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      host={}, port={}, cors={}", self.server.host, self.server.port, self.server.cors_origin);
        tracing::info!("  tick:        interval={}ms, seed={}", sim.tick_interval_ms, sim.seed.map(|s| s.to_string()).unwrap_or_else(|| "(entropy)".into()));
        tracing::info!("  logs:        history={}, events={}, snapshot_events={}", sim.history_capacity, sim.event_capacity, sim.snapshot_event_limit);
        tracing::info!("  heartbeat:   nominal_event_probability={}", sim.nominal_event_probability);
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` allows any origin.
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_source(s: &Source<'_>) -> Self {
        Self {
            host: s.or("HOST", "0.0.0.0"),
            port: s.parsed("PORT", 8000),
            cors_origin: s.or("CORS_ORIGIN", "*"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Simulation ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Tick samples retained, oldest evicted first.
    pub history_capacity: usize,
    /// Event lines retained, oldest evicted first.
    pub event_capacity: usize,
    /// Newest events included in a state snapshot.
    pub snapshot_event_limit: usize,
    /// Chance per uncontended tick of logging a heartbeat event.
    pub nominal_event_probability: f64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            history_capacity: 60,
            event_capacity: 100,
            snapshot_event_limit: 50,
            nominal_event_probability: 0.02,
            seed: None,
        }
    }
}

impl SimulationConfig {
    fn from_source(s: &Source<'_>) -> Self {
        let d = Self::default();
        Self {
            tick_interval_ms: s.parsed("TICK_INTERVAL_MS", d.tick_interval_ms),
            history_capacity: s.parsed("HISTORY_CAPACITY", d.history_capacity),
            event_capacity: s.parsed("EVENT_CAPACITY", d.event_capacity),
            snapshot_event_limit: s.parsed("SNAPSHOT_EVENT_LIMIT", d.snapshot_event_limit),
            nominal_event_probability: s.parsed("NOMINAL_EVENT_PROBABILITY", d.nominal_event_probability),
            seed: s.opt("SIM_SEED").and_then(|v| v.parse().ok()),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tick_interval_ms == 0 {
            return Err(CoreError::InvalidConfig("tick interval must be positive".into()));
        }
        if self.history_capacity == 0 || self.event_capacity == 0 {
            return Err(CoreError::InvalidConfig("history and event capacities must be positive".into()));
        }
        if self.snapshot_event_limit > self.event_capacity {
            return Err(CoreError::InvalidConfig(format!(
                "snapshot event limit {} exceeds event capacity {}",
                self.snapshot_event_limit, self.event_capacity
            )));
        }
        if !(0.0..=1.0).contains(&self.nominal_event_probability) {
            return Err(CoreError::InvalidConfig(format!(
                "nominal event probability {} outside [0, 1]",
                self.nominal_event_probability
            )));
        }
        Ok(())
    }
}
