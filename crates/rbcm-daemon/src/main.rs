// crates/rbcm-daemon/src/main.rs
//
// Binary entrypoint for the RBCM reputation simulator daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, seeds the
// ghost population, spawns the simulation driver and RPC server, and shuts
// both down cleanly on Ctrl-C.

mod config;
mod shared;
mod state;

use clap::Parser;
use tokio::sync::watch;

use config::DaemonConfig;
use rbcm_rpc::{RbcmRpcServer, RpcConfig};
use rbcm_sim::SimulationDriver;
use shared::DaemonSharedState;
use state::{DaemonState, DaemonStateMachine};

/// RBCM daemon: trust-score registry with a simulated ghost population.
#[derive(Parser, Debug)]
#[command(name = "rbcm-daemon", version = "0.1.0", about = "RBCM reputation simulator daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.rbcm/config.toml")]
    config: String,

    /// Override the number of ghost nodes seeded at startup.
    #[arg(long)]
    ghosts: Option<usize>,

    /// Override the RPC port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults apply only when the config file is missing; a file that
    // exists but does not parse aborts startup. Tracing is initialized
    // afterwards so log_level applies.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load_if_present(&config_path)
        .map_err(|e| format!("Failed to load config from {}: {}", config_path, e))?;
    let from_file = loaded.is_some();
    let mut daemon_config = loaded.unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    if from_file {
        tracing::info!("Loaded configuration from {}", config_path);
    } else {
        tracing::warn!("No config file at {}. Using defaults.", config_path);
    }

    // CLI flags override the config file values.
    if let Some(ghosts) = args.ghosts {
        daemon_config.ghost_count = ghosts;
    }
    if let Some(port) = args.port {
        daemon_config.rpc_port = port;
    }

    let outcome_model = daemon_config.outcome_model()?;
    let tick_interval = daemon_config.tick_interval()?;

    tracing::info!("RBCM Daemon v0.1.0");
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );
    tracing::info!("Tick interval: {:?}", tick_interval);

    let shared_state = DaemonSharedState::new();
    let mut state_machine = DaemonStateMachine::new();

    state_machine.transition(DaemonState::Seeding)?;
    let ghosts = shared_state.seed_ghosts(daemon_config.ghost_count).await;
    tracing::info!("Seeded {} ghost nodes", ghosts);

    // Stop signal shared by the simulation driver and the RPC server.
    let (stop_tx, stop_rx) = watch::channel(false);

    let mut driver = SimulationDriver::new(
        shared_state.registry.clone(),
        shared_state.rogue.clone(),
        outcome_model,
        tick_interval,
    );
    if let Some(seed) = daemon_config.simulation_seed {
        tracing::info!("Simulation seed: {}", seed);
        driver = driver.with_seed(seed);
    }
    let sim_handle = tokio::spawn(async move { driver.run(stop_rx).await });

    let rpc_config = RpcConfig {
        host: daemon_config.rpc_host.clone(),
        port: daemon_config.rpc_port,
    };
    let rpc_server = RbcmRpcServer::new(
        rpc_config,
        shared_state.registry.clone(),
        shared_state.rogue.clone(),
    )
    .with_start_time(shared_state.start_time);
    let mut rpc_stop = stop_tx.subscribe();
    let mut rpc_handle = tokio::spawn(async move {
        let signal = async move {
            let _ = rpc_stop.wait_for(|stop| *stop).await;
        };
        rpc_server.start_with_shutdown(signal).await
    });

    state_machine.transition(DaemonState::Running)?;

    // The RPC task only finishes early if the server fails (e.g. bind error).
    let rpc_early = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Received shutdown signal");
            None
        }
        res = &mut rpc_handle => Some(res),
    };
    state_machine.transition(DaemonState::ShuttingDown)?;

    // Receivers may already be gone if both tasks exited on their own.
    let _ = stop_tx.send(true);

    match sim_handle.await {
        Ok(Ok(exit)) => tracing::info!("Simulation driver exited: {:?}", exit),
        Ok(Err(e)) => tracing::error!("Simulation driver failed: {}", e),
        Err(e) => tracing::error!("Simulation task panicked: {}", e),
    }
    let rpc_result = match rpc_early {
        Some(res) => res,
        None => rpc_handle.await,
    };
    match rpc_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!("RPC server error: {}", e);
            let e: Box<dyn std::error::Error> = e;
            return Err(e);
        }
        Err(e) => tracing::error!("RPC task panicked: {}", e),
    }

    let (physical, virtual_nodes) = shared_state.registry.counts().await;
    tracing::info!(
        "RBCM daemon shut down gracefully ({} physical, {} virtual nodes)",
        physical,
        virtual_nodes
    );

    Ok(())
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
