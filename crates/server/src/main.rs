//! Simple test harness for the discovery service.
//!
//! Loads the catalog and prints product and style twin recommendations for
//! every profile.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::{CandidateKind, Catalog};
use server::{DiscoveryService, EngineConfig};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Print recommendations for every profile in a catalog", long_about = None)]
struct Cli {
    /// Directory holding profiles.json, products.json and people.json
    #[arg(default_value = "data")]
    data_dir: PathBuf,

    /// Engine config (JSON)
    #[arg(short, long, env = "STYLE_MATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Results per list
    #[arg(short, long, default_value = "5")]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,pipeline=debug")),
        )
        .init();

    info!("Starting style match server test harness");

    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref())?;
    let catalog = Arc::new(Catalog::load_from_dir(&cli.data_dir)?);
    let service = DiscoveryService::new(catalog, config);

    let limit = cli.limit;
    for profile in service.profiles() {
        for kind in [CandidateKind::Product, CandidateKind::Person] {
            let results = service
                .recommend(&profile.id, kind, service.default_controls(), limit)
                .await?;

            info!("Top {} {} for {} ({}):", results.len(), kind, profile.name, profile.relationship);
            for (i, result) in results.iter().enumerate() {
                info!(
                    "{}. {} - Score: {:.3} (adjusted {:.3})",
                    i + 1,
                    result.candidate.display.title,
                    result.score,
                    result.adjusted_score
                );
                for reason in &result.reasons {
                    info!("   {}", reason);
                }
            }
        }
    }

    Ok(())
}
