//! ccip-gateway binary: off-chain read gateway for ENS subnames backed by SuiNS
//!
//! Run with:
//! ```bash
//! PRIVATE_KEY=0x... cargo run -p ccip-server --bin ccip-gateway -- --port 8080
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use ccip_core::{GatewayConfig, NameRecordProvider, StaticProvider};
use ccip_server::metrics::init_prometheus_recorder;
use ccip_server::ServerBuilder;
use clap::Parser;
use suins_client::{SuinsClient, SuinsConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ccip-gateway")]
#[command(about = "Serve signed ENS answers for subnames backed by SuiNS")]
struct Args {
    /// Gateway configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Signing key (hex); the resolver contract must trust its address
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Parent domain to serve, overrides the config file
    #[arg(long)]
    parent_domain: Option<String>,

    /// Response lifetime in seconds, overrides the config file
    #[arg(long)]
    ttl_secs: Option<u64>,

    /// Only sign for this resolver contract
    #[arg(long, env = "RESOLVER_ADDRESS")]
    resolver_address: Option<Address>,

    /// Serve records from a JSON file instead of SuiNS
    #[arg(long)]
    records: Option<PathBuf>,

    /// Sui fullnode JSON-RPC URL
    #[arg(long, env = "SUI_RPC_URL")]
    sui_rpc_url: Option<String>,

    /// SuiNS configuration file (JSON)
    #[arg(long)]
    suins_config: Option<PathBuf>,

    /// Disable the Prometheus endpoint
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ccip_server=info".parse()?)
                .add_directive("ccip_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(parent) = args.parent_domain {
        config.parent_domain = parent.to_lowercase();
    }
    if let Some(ttl) = args.ttl_secs {
        config = config.with_ttl(Duration::from_secs(ttl));
    }
    if let Some(resolver) = args.resolver_address {
        config = config.with_resolver(resolver);
    }

    let provider: Arc<dyn NameRecordProvider> = match &args.records {
        Some(path) => {
            let records = StaticProvider::load(path)?;
            tracing::info!("Serving {} static records from {}", records.len(), path.display());
            Arc::new(records)
        }
        None => {
            let mut suins = match &args.suins_config {
                Some(path) => SuinsConfig::load(path)?,
                None => SuinsConfig::default(),
            };
            if let Some(url) = args.sui_rpc_url {
                suins = suins.with_rpc_url(url);
            }
            tracing::info!(rpc_url = %suins.rpc_url, "Resolving through SuiNS");
            Arc::new(SuinsClient::new(suins).await?)
        }
    };

    let mut builder = ServerBuilder::new(config)
        .port(args.port)
        .private_key(args.private_key)
        .provider(provider);
    if !args.no_metrics {
        builder = builder.metrics(init_prometheus_recorder()?);
    }

    let server = builder.build()?;
    tracing::info!("Server ready on port {}", args.port);
    server.run().await?;

    Ok(())
}
