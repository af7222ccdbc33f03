//! # Ferrous DoH
//!
//! DNS-over-HTTPS proxy in front of a plain UDP resolver

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use ferrous_doh_domain::CliOverrides;
use ferrous_doh_jobs::{ExpirySweepJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-doh")]
#[command(version)]
#[command(about = "DNS-over-HTTPS proxy with query coalescing and caching")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Upstream DNS resolver (host:port) [default: 127.0.0.1:53]
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// HTTP listen port [default: 8080]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address [default: 0.0.0.0]
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Cache TTL in seconds [default: 30]
    #[arg(short = 't', long)]
    ttl: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            port: self.port,
            bind_address: self.bind.clone(),
            upstream: self.upstream.clone(),
            cache_ttl: self.ttl,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);
    bootstrap::log_config(&config, cli.config.as_deref());

    let services = di::DnsServices::new(&config).await?;

    let shutdown = CancellationToken::new();
    JobRunner::new()
        .with_expiry_sweep(
            ExpirySweepJob::new(services.sweep.clone())
                .with_interval(config.cache.sweep_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    let result = server::start_web_server(&config, services.app_state(), shutdown.clone()).await;

    shutdown.cancel();
    info!("Server exited");

    result
}
