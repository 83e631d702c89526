//! Command-line overrides for the environment-derived configuration.

use clap::Parser;

use winoptima_core::Config;

/// WinOptima resource scheduler simulation server.
///
/// Serves the simulation state and control API over HTTP while a background
/// task advances the simulation once per tick interval.
#[derive(Parser, Debug, Default)]
#[command(name = "winoptima-server", version, about = "WinOptima resource scheduler simulation server")]
pub struct CliArgs {
    /// Address to bind
    #[arg(long, env = "WINOPTIMA_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short, env = "WINOPTIMA_PORT")]
    pub port: Option<u16>,

    /// Milliseconds between simulation ticks
    #[arg(long, env = "WINOPTIMA_TICK_INTERVAL_MS")]
    pub tick_interval_ms: Option<u64>,

    /// Seed for the simulation RNG (reproducible runs)
    #[arg(long, env = "WINOPTIMA_SEED")]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Apply any flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ms) = self.tick_interval_ms {
            config.simulation.tick_interval_ms = ms;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
    }
}
