use anyhow::Result;
use clap::Parser;
use news_data_services::CompanyIngestionPipeline;
use tracing::{info, Level};
use tracing_subscriber;

/// Company Ticker Ingestion CLI
///
/// Loads company records from the ticker dataset directory, flattens them
/// to text documents, generates embeddings, and uploads them to the Qdrant
/// vector database for RAG-backed ticker extraction.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of ticker dataset JSON files
    #[arg(short = 'd', long, default_value = "./data/tickers")]
    data_dir: String,

    /// Qdrant URL
    #[arg(short = 'q', long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection name
    #[arg(short = 'c', long, default_value = "company_tickers")]
    collection: String,

    /// Drop and recreate the collection before ingesting
    #[arg(long)]
    recreate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Parse log level from string
    fn parse_log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(args.parse_log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("🚀 Company Ticker Ingestion Tool");
    info!("================================");
    info!("Configuration:");
    info!("  Data dir: {}", args.data_dir);
    info!("  Qdrant URL: {}", args.qdrant_url);
    info!("  Collection: {}", args.collection);
    info!("  Recreate: {}", args.recreate);
    info!("");

    // Create ingestion pipeline
    info!("Initializing ingestion pipeline...");
    let mut pipeline =
        CompanyIngestionPipeline::new(&args.qdrant_url, args.collection, args.recreate).await?;

    info!("Pipeline initialized successfully");
    info!("");

    // Ingest the dataset directory
    let stats = pipeline.ingest_directory(&args.data_dir).await?;

    // Display results
    info!("");
    info!("✅ Ingestion Complete!");
    info!("=====================");
    info!(
        "  {} companies loaded, {} records skipped, {} embeddings, {} points uploaded",
        stats.companies_loaded,
        stats.records_skipped,
        stats.embeddings_generated,
        stats.points_uploaded
    );

    Ok(())
}
