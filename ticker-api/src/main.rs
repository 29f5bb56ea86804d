mod api;
mod config;
mod error;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;
use state::AppState;

#[derive(Parser)]
#[command(name = "ticker-api")]
#[command(about = "HTTP server for RAG ticker extraction")]
struct Cli {
    /// Server host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to bind to
    #[arg(long, default_value = "5521")]
    port: u16,

    /// Qdrant vector database URL
    #[arg(long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection name
    #[arg(long, default_value = "company_tickers")]
    collection_name: String,

    /// Data directory (news feed and food photos live under it)
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// News feed file (defaults to <data-dir>/ai_summary.json)
    #[arg(long)]
    news_file: Option<String>,

    /// Food photos directory (defaults to <data-dir>/example_food_photos)
    #[arg(long)]
    photos_dir: Option<String>,

    /// Number of company documents to retrieve per query
    #[arg(long, default_value = "5")]
    top_k: usize,

    /// Similarity floor for retrieved documents
    #[arg(long, default_value = "0.35")]
    min_similarity: f32,

    /// Minimum number of matches required to use retrieved context
    #[arg(long, default_value = "1")]
    min_matches: usize,

    /// Disable retrieval (context-free prompts only)
    #[arg(long)]
    no_rag: bool,

    /// Chat model used for extraction and recipes
    #[arg(long, default_value = "gpt-4-turbo")]
    llm_model: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "ticker_api={},ticker_extraction={},news_data_services={}",
                cli.log_level, cli.log_level, cli.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY must be set for the chat endpoint")?;

    let config = ServerConfig {
        news_file: cli
            .news_file
            .unwrap_or_else(|| format!("{}/ai_summary.json", cli.data_dir)),
        photos_dir: cli
            .photos_dir
            .unwrap_or_else(|| format!("{}/example_food_photos", cli.data_dir)),
        host: cli.host,
        port: cli.port,
        qdrant_url: cli.qdrant_url,
        collection_name: cli.collection_name,
        data_dir: cli.data_dir,
        top_k: cli.top_k,
        min_similarity: cli.min_similarity,
        min_matches: cli.min_matches,
        rag_enabled: !cli.no_rag,
        llm_model: cli.llm_model,
    };

    tracing::info!("🚀 Ticker Extraction API Starting");
    tracing::info!("Configuration:");
    tracing::info!("  Host: {}", config.host);
    tracing::info!("  Port: {}", config.port);
    tracing::info!("  Qdrant URL: {}", config.qdrant_url);
    tracing::info!("  Collection: {}", config.collection_name);
    tracing::info!("  Data dir: {}", config.data_dir);
    tracing::info!("  News file: {}", config.news_file);
    tracing::info!("  Top K: {} (min similarity {})", config.top_k, config.min_similarity);
    tracing::info!("  RAG enabled: {}", config.rag_enabled);
    tracing::info!("  Model: {}", config.llm_model);

    let addr = format!("{}:{}", config.host, config.port);

    let state = Arc::new(AppState::initialize(config, api_key).await?);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Ticker Extraction API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
