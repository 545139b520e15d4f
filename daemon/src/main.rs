//! Fichua daemon: entry point for running the contact-reveal service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use fichua_directory::{Directory, HttpDirectory, HttpDirectoryConfig};
use fichua_gateway::{HttpGateway, HttpGatewayConfig, PaymentGateway};
use fichua_reveal::{
    run_sweeper, DisclosureResolver, RevealController, RevealMetrics, ServiceConfig,
};
use fichua_rpc::{AppState, RpcServer};
use fichua_store::reveal::RevealStore;
use fichua_store_lmdb::environment::DEFAULT_MAP_SIZE;
use fichua_store_lmdb::LmdbEnvironment;
use fichua_types::{Clock, SystemClock};

#[derive(Parser)]
#[command(name = "fichua-daemon", about = "Fichua contact-reveal service daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address for the HTTP API.
    #[arg(long, env = "FICHUA_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Data directory for the reveal ledger.
    #[arg(long, env = "FICHUA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seconds until an unconfirmed reveal expires.
    #[arg(long, env = "FICHUA_REVEAL_TTL_SECS")]
    reveal_ttl_secs: Option<u64>,

    /// Seconds between expiry sweeps.
    #[arg(long, env = "FICHUA_SWEEP_INTERVAL_SECS")]
    sweep_interval_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FICHUA_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ServiceConfig::from_toml_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(addr) = cli.listen_addr {
        config.listen_addr = addr;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(ttl) = cli.reveal_ttl_secs {
        config.reveal_ttl_secs = ttl;
    }
    if let Some(interval) = cli.sweep_interval_secs {
        config.sweep_interval_secs = interval;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    fichua_utils::init_tracing_with(&config.log_level, config.log_format == "json");
    tracing::info!(
        data_dir = %config.data_dir.display(),
        ttl = %fichua_utils::format_duration(config.reveal_ttl_secs),
        "starting fichua daemon"
    );

    let env = LmdbEnvironment::open(&config.data_dir, DEFAULT_MAP_SIZE)?;
    let store: Arc<dyn RevealStore> = Arc::new(env.reveal_store());

    let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpGateway::new(HttpGatewayConfig {
        base_url: config.gateway.base_url.clone(),
        api_key: config.gateway.api_key.clone(),
        timeout: Duration::from_secs(config.gateway.timeout_secs),
    })?);
    let directory: Arc<dyn Directory> = Arc::new(HttpDirectory::new(HttpDirectoryConfig {
        base_url: config.directory.base_url.clone(),
        timeout: Duration::from_secs(config.directory.timeout_secs),
    })?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let metrics = Arc::new(RevealMetrics::new());
    let controller = Arc::new(RevealController::new(
        Arc::clone(&store),
        gateway,
        Arc::clone(&directory),
        clock,
        config.fees.clone(),
        config.reveal_ttl_secs,
        metrics,
    ));
    let resolver = Arc::new(DisclosureResolver::new(store, directory));

    let sweeper = tokio::spawn(run_sweeper(
        Arc::clone(&controller),
        config.sweep_interval_secs,
    ));

    let server = RpcServer::new(&config.listen_addr);
    let result = server
        .serve(AppState {
            controller,
            resolver,
        })
        .await;

    sweeper.abort();
    result?;
    Ok(())
}
