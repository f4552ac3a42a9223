//! Discmeta main entry point
//!
//! Command-line interface: fetch the metadata record for one catalog code
//! from one source and print it as JSON.

use anyhow::Context;
use clap::Parser;
use discmeta::config::{load_config_with_hash, Config};
use discmeta::crawler::SourceId;
use discmeta::{build_crawler, EndpointResolver, MetadataRecord};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Discmeta: fetch catalog metadata from source websites
#[derive(Parser, Debug)]
#[command(name = "discmeta")]
#[command(version)]
#[command(about = "Fetch catalog metadata from source websites", long_about = None)]
struct Cli {
    /// Catalog code of the item to fetch
    identifier: String,

    /// Source website to query
    #[arg(short, long, default_value = "prestige")]
    source: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let source: SourceId = cli
        .source
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Load configuration, or run on built-in defaults without one
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let resolver = EndpointResolver::new(&config.network)?;

    tracing::info!("Constructing crawler for source '{}'", source);
    let crawler = build_crawler(source, &config, &resolver).await?;

    let mut record = MetadataRecord::new(cli.identifier);
    match crawler.crawl_and_fill(&mut record).await {
        Ok(()) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Crawl failed ({}): {}",
                if e.is_retryable() {
                    "retryable"
                } else {
                    "not retryable"
                },
                e
            );
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("discmeta=info,warn"),
            1 => EnvFilter::new("discmeta=debug,info"),
            2 => EnvFilter::new("discmeta=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
