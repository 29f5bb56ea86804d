use anyhow::{anyhow, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use news_core::TickerSymbol;
use news_data_services::VectorStore;
use std::collections::HashMap;
use std::sync::Arc;

use super::metrics::{MetricsTimer, RetrievalTimings};

/// A company document retrieved for an article query
#[derive(Debug, Clone)]
pub struct CompanyMatch {
    pub similarity: f32, // 0.0 to 1.0 (cosine similarity)
    pub company_name: String,
    pub exchange_tickers: Vec<TickerSymbol>,
    pub related_exchange_tickers: Vec<TickerSymbol>,
    /// The flattened document text the match was embedded from
    pub document: String,
}

/// Retriever for company documents relevant to a news article
pub struct CompanyRetriever {
    embedding_model: TextEmbedding,
    vector_store: Arc<VectorStore>,
    min_matches: usize,
}

impl CompanyRetriever {
    /// Create a new retriever.
    ///
    /// `min_matches` is the smallest useful result set: below it the
    /// retriever returns nothing and the caller falls back to a
    /// context-free prompt.
    pub async fn new(vector_store: Arc<VectorStore>, min_matches: usize) -> Result<Self> {
        tracing::info!("Initializing company retriever with BGE-small-en-v1.5 model...");

        let embedding_model =
            TextEmbedding::try_new(InitOptions::new(EmbeddingModel::BGESmallENV15))?;

        tracing::info!("Company retriever initialized successfully");

        Ok(Self {
            embedding_model,
            vector_store,
            min_matches,
        })
    }

    /// Find company documents relevant to the query text, measuring
    /// embedding and search latency
    pub async fn find_relevant_companies_with_timings(
        &self,
        query_text: &str,
        top_k: usize,
        min_similarity: f32,
    ) -> Result<(Vec<CompanyMatch>, RetrievalTimings)> {
        tracing::debug!(
            "Searching for relevant companies: top_k={}, min_similarity={}",
            top_k,
            min_similarity
        );

        // 1. Embed the query text
        let embed_timer = MetricsTimer::start();
        let query_embedding = self
            .embedding_model
            .embed(vec![query_text.to_string()], None)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to generate query embedding"))?;
        let embedding = embed_timer.stop();

        // 2. Search the vector store
        let search_timer = MetricsTimer::start();
        let scored_points = self
            .vector_store
            .search(query_embedding, top_k as u64, Some(min_similarity))
            .await?;
        let search = search_timer.stop();

        tracing::info!(
            "Found {} candidate companies (similarity threshold: {})",
            scored_points.len(),
            min_similarity
        );

        // 3. Parse payloads into CompanyMatch structs
        let mut matches = Vec::new();

        for scored_point in scored_points {
            let payload = scored_point.payload;

            let company_match = CompanyMatch {
                similarity: scored_point.score,
                company_name: Self::get_payload_string(&payload, "company_name")?,
                exchange_tickers: Self::split_tickers(&Self::get_payload_string(
                    &payload,
                    "exchange_tickers",
                )?),
                related_exchange_tickers: Self::split_tickers(
                    &Self::get_payload_string(&payload, "related_exchange_tickers")
                        .unwrap_or_default(),
                ),
                document: Self::get_payload_string(&payload, "document")?,
            };

            matches.push(company_match);
        }

        // 4. Enforce minimum match count (caller falls back to a baseline prompt)
        if matches.len() < self.min_matches {
            tracing::warn!(
                "Insufficient matches: found {}, need {}. Returning empty (will use baseline prompt)",
                matches.len(),
                self.min_matches
            );
            return Ok((Vec::new(), RetrievalTimings { embedding, search }));
        }

        Ok((matches, RetrievalTimings { embedding, search }))
    }

    /// Split the comma-joined ticker payload field back into symbols
    fn split_tickers(joined: &str) -> Vec<TickerSymbol> {
        joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn get_payload_string(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
        key: &str,
    ) -> Result<String> {
        payload
            .get(key)
            .and_then(|v| v.kind.as_ref())
            .and_then(|kind| match kind {
                qdrant_client::qdrant::value::Kind::StringValue(s) => Some(s.clone()),
                _ => None,
            })
            .ok_or_else(|| anyhow!("Missing or invalid field: {}", key))
    }
}
