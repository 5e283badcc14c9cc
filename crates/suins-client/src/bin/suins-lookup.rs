//! Query the SuiNS registry for one name
//!
//! Run with:
//! ```bash
//! cargo run -p suins-client --bin suins-lookup -- bob.sui
//! ```

use std::path::PathBuf;

use clap::Parser;
use suins_client::{SuinsClient, SuinsConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "suins-lookup")]
#[command(about = "Print the SuiNS record for a name")]
struct Args {
    /// Native name, e.g. bob.sui
    name: String,

    /// Sui fullnode JSON-RPC URL
    #[arg(long, env = "SUI_RPC_URL")]
    rpc_url: Option<String>,

    /// JSON file with rpc_url / registry_table_id / domain_type
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("suins_client=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => SuinsConfig::load(&path)?,
        None => SuinsConfig::default(),
    };
    if let Some(url) = args.rpc_url {
        config = config.with_rpc_url(url);
    }

    let client = SuinsClient::new(config).await?;
    match client.get_name_record(&args.name).await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("[--] {} is not registered", args.name),
    }
    Ok(())
}
