use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use winoptima_core::Config;
use winoptima_server::cli::CliArgs;
use winoptima_server::{build_router, cors_layer, AppState};
use winoptima_simulator::{spawn_tick_loop, Simulation};

fn load_config(args: &CliArgs) -> anyhow::Result<Config> {
    winoptima_core::config::load_dotenv();
    let mut config = Config::from_env();
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {}", e);
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    config.log_summary();

    let state = Arc::new(AppState::new(Simulation::new(config.simulation.clone())));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = spawn_tick_loop(
        state.simulation.clone(),
        config.simulation.tick_interval(),
        shutdown_rx,
    );

    let app = build_router(state, cors_layer(&config.server.cors_origin)?);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    ticker.await?;
    info!("Server stopped");

    Ok(())
}
