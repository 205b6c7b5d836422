use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};

use sts_client::config::{read_config, ClientConfig};
use sts_client::observability::{self, logging, metrics};
use sts_client::SigningClient;

#[derive(Parser)]
#[command(name = "sts-client")]
#[command(about = "Request a signed timestamp for a digest", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "STS_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Signing service URL (overrides the configuration file)
    #[arg(short, long, env = "STS_ENDPOINT")]
    endpoint: Option<String>,

    /// Total retry budget in milliseconds
    #[arg(long)]
    total_timeout_ms: Option<u64>,

    /// Per-request deadline in milliseconds
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a hex-encoded digest (224, 256, 384 or 512 bits)
    Digest { value: String },
    /// Hash a file with SHA-256 and sign the result
    File { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(ms) = cli.total_timeout_ms {
        config.total_timeout_ms = ms;
    }
    if let Some(ms) = cli.request_timeout_ms {
        config.request_timeout_ms = ms;
    }

    logging::init(&config.observability.log_level);

    let digest = match cli.command {
        Commands::Digest { value } => hex::decode(value.trim())?,
        Commands::File { path } => {
            let data = tokio::fs::read(&path).await?;
            Sha256::digest(&data).to_vec()
        }
    };

    let client = SigningClient::new(config)?.with_notify(observability::retry_observer());

    tracing::info!(
        endpoint = %client.endpoint(),
        digest_bits = digest.len() * 8,
        "Requesting signed timestamp"
    );

    let result = client.sign(&digest).await;
    metrics::record_outcome(&result);

    match result {
        Ok(timestamp) => {
            println!("{}", serde_json::to_string_pretty(&timestamp)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                kind = ?e.kind(),
                attempts = e.attempts(),
                error = %e,
                "Signing failed"
            );
            Err(e.into())
        }
    }
}
