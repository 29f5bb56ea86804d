use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use news_core::NewsArticle;
use news_data_services::{load_news, VectorStore};
use std::sync::Arc;
use ticker_extraction::{
    CompanyRetriever, ExtractorConfig, LlmClient, LlmConfig, RecipeRecommender, TickerExtractor,
};

use crate::config::ServerConfig;

/// Shared state behind every request handler
pub struct AppState {
    pub config: ServerConfig,
    pub vector_store: Arc<VectorStore>,
    pub extractor: Arc<TickerExtractor>,
    pub recommender: Arc<RecipeRecommender>,
    /// News feed preloaded at startup
    pub news: Vec<NewsArticle>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire up the RAG components and preload the news feed
    pub async fn initialize(config: ServerConfig, api_key: String) -> Result<Self> {
        tracing::info!("Initializing RAG components...");

        let vector_store = Arc::new(
            VectorStore::new(&config.qdrant_url, config.collection_name.clone())
                .await
                .context("Failed to connect to Qdrant")?,
        );

        let retriever = Arc::new(
            CompanyRetriever::new(Arc::clone(&vector_store), config.min_matches)
                .await
                .context("Failed to initialize company retriever")?,
        );

        let llm_config = LlmConfig {
            model: config.llm_model.clone(),
            ..Default::default()
        };
        let llm_client = Arc::new(
            LlmClient::new(llm_config, api_key).context("Failed to initialize LLM client")?,
        );

        let extractor_config = ExtractorConfig {
            top_k: config.top_k,
            min_similarity: config.min_similarity,
            rag_enabled: config.rag_enabled,
            ..Default::default()
        };
        let extractor = Arc::new(TickerExtractor::new(
            extractor_config,
            retriever,
            Arc::clone(&llm_client),
        ));

        let recommender = Arc::new(RecipeRecommender::new(llm_client, config.photos_dir.clone()));

        // A missing news feed degrades the batch endpoints but should not
        // keep the server from answering POST /tickers
        let news = match load_news(&config.news_file) {
            Ok(news) => news,
            Err(e) => {
                tracing::warn!("Failed to load news feed: {}. Continuing with none", e);
                Vec::new()
            }
        };

        tracing::info!("✅ RAG components initialized successfully");

        Ok(Self {
            config,
            vector_store,
            extractor,
            recommender,
            news,
            started_at: Utc::now(),
        })
    }
}
