use anyhow::{bail, Result};
use moka::future::Cache;
use news_core::{NewsArticle, TickerSymbol};
use std::sync::Arc;
use std::time::Duration;

use crate::llm::{
    parse_tickers, CompanyRetriever, ExtractionMetrics, LlmClient, MetricsTimer,
    TickerPromptFormatter,
};

/// Configuration for the RAG ticker extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Number of top company documents to retrieve
    pub top_k: usize,

    /// Similarity floor for retrieved documents
    pub min_similarity: f32,

    /// Enable or disable retrieval (for A/B comparison against the
    /// context-free prompt)
    pub rag_enabled: bool,

    /// Maximum number of cached article results
    pub cache_capacity: u64,

    /// How long a cached result stays valid
    pub cache_ttl_seconds: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_similarity: 0.35,
            rag_enabled: true,
            cache_capacity: 1024,
            cache_ttl_seconds: 600,
        }
    }
}

/// Result of one extraction request
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub tickers: Vec<TickerSymbol>,
    /// Company documents that were in the prompt context
    pub matches_considered: usize,
    pub from_cache: bool,
}

/// RAG ticker extraction service.
///
/// For each article it:
/// 1. Flattens the article into query text
/// 2. Retrieves similar company documents from the vector store
/// 3. Formats a prompt with the retrieved context
/// 4. Asks the LLM to extract the tickers mentioned
/// 5. Parses the answer into a ticker list
///
/// Falls back to a context-free prompt when retrieval fails or returns
/// too few documents. Results are cached per article text so repeated
/// queries don't re-run retrieval and generation.
pub struct TickerExtractor {
    config: ExtractorConfig,
    retriever: Arc<CompanyRetriever>,
    llm_client: Arc<LlmClient>,
    cache: Cache<String, Vec<TickerSymbol>>,
}

impl TickerExtractor {
    pub fn new(
        config: ExtractorConfig,
        retriever: Arc<CompanyRetriever>,
        llm_client: Arc<LlmClient>,
    ) -> Self {
        tracing::info!(
            "Initializing ticker extractor: rag_enabled={}, top_k={}, min_similarity={}",
            config.rag_enabled,
            config.top_k,
            config.min_similarity
        );

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self {
            config,
            retriever,
            llm_client,
            cache,
        }
    }

    /// Extract the tickers mentioned in a news article
    pub async fn extract(&self, article: &NewsArticle) -> Result<ExtractionOutcome> {
        if article.is_blank() {
            bail!("Article has neither title nor summary");
        }

        let query_text = article.query_text();

        if let Some(tickers) = self.cache.get(&query_text).await {
            let mut metrics = ExtractionMetrics::new();
            metrics.cache_hit = true;
            metrics.tickers_extracted = tickers.len();
            metrics.report();

            return Ok(ExtractionOutcome {
                tickers,
                matches_considered: 0,
                from_cache: true,
            });
        }

        let mut metrics = ExtractionMetrics::new();

        // Retrieve company context (if enabled); retrieval failure falls
        // back to the context-free prompt rather than failing the request
        let matches = if self.config.rag_enabled {
            match self
                .retriever
                .find_relevant_companies_with_timings(
                    &query_text,
                    self.config.top_k,
                    self.config.min_similarity,
                )
                .await
            {
                Ok((matches, timings)) => {
                    metrics.set_retrieval_timings(timings);
                    matches
                }
                Err(e) => {
                    tracing::warn!("Retrieval failed: {}, using baseline prompt", e);
                    Vec::new()
                }
            }
        } else {
            tracing::debug!("RAG disabled, using baseline prompt");
            Vec::new()
        };

        metrics.set_similarity_scores(matches.iter().map(|m| m.similarity).collect());

        for m in &matches {
            tracing::debug!(
                "Context document: {} [{}] (similarity {:.2})",
                m.company_name,
                m.exchange_tickers.join(","),
                m.similarity
            );
        }

        let prompt = if matches.is_empty() {
            TickerPromptFormatter::format_baseline(&query_text)
        } else {
            TickerPromptFormatter::format_with_context(&query_text, &matches)
        };

        let llm_timer = MetricsTimer::start();
        let response = self.llm_client.complete(prompt).await?;
        metrics.set_llm_latency(llm_timer.stop());

        let tickers = parse_tickers(&response.raw_response);
        metrics.tickers_extracted = tickers.len();
        metrics.report();

        tracing::info!(
            "Extracted {} tickers from article ({} context documents)",
            tickers.len(),
            matches.len()
        );

        self.cache.insert(query_text, tickers.clone()).await;

        Ok(ExtractionOutcome {
            tickers,
            matches_considered: matches.len(),
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_similarity, 0.35);
        assert!(config.rag_enabled);
        assert_eq!(config.cache_capacity, 1024);
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache: Cache<String, Vec<TickerSymbol>> = Cache::builder()
            .max_capacity(4)
            .time_to_live(Duration::from_secs(60))
            .build();

        let key = "Title: Blockbuster Earnings".to_string();
        assert!(cache.get(&key).await.is_none());

        cache
            .insert(key.clone(), vec!["INTC".to_string(), "TWTR".to_string()])
            .await;

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached, vec!["INTC", "TWTR"]);
    }
}
