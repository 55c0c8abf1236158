use std::sync::Arc;

use clap::{Parser, Subcommand};

use cdr_analytics_core::{CdrStore, ConfigLoader};
use cdr_analytics_data::{CsvLoader, MemoryCdrStore, PgCdrStore};
use cdr_analytics_web_api::ApiServer;

#[derive(Parser)]
#[command(name = "cdr-analytics")]
#[command(about = "CDR ingestion and analytics service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Server {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Listen address override (host:port)
        #[arg(short, long)]
        addr: Option<String>,
        /// Use an in-memory store instead of PostgreSQL
        #[arg(long)]
        memory: bool,
    },
    /// Load a CDR CSV file into the store
    Ingest {
        /// CSV file path
        #[arg(short, long)]
        file: String,
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            config,
            addr,
            memory,
        } => {
            run_server(&config, addr.as_deref(), memory).await?;
        }
        Commands::Ingest { file, config } => {
            run_ingest(&file, &config).await?;
        }
    }

    Ok(())
}

async fn run_server(config_path: &str, addr: Option<&str>, memory: bool) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let addr = addr.map_or_else(
        || format!("{}:{}", config.server.host, config.server.port),
        str::to_string,
    );

    let store: Arc<dyn CdrStore> = if memory {
        tracing::warn!("using in-memory store; records will not survive a restart");
        Arc::new(MemoryCdrStore::new())
    } else {
        Arc::new(PgCdrStore::connect(&config.database.url, config.database.max_connections).await?)
    };

    ApiServer::new(store).serve(&addr).await
}

async fn run_ingest(file: &str, config_path: &str) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let bytes = std::fs::read(file)?;
    let records = CsvLoader::parse(&bytes)?;
    let parsed = records.len();

    let store =
        PgCdrStore::connect(&config.database.url, config.database.max_connections).await?;
    let written = store.append_batch(records).await?;

    tracing::info!(parsed, written, "ingest complete");
    println!("{written} records uploaded successfully.");
    Ok(())
}
