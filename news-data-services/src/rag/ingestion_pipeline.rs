use anyhow::Result;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use news_core::CompanyRecord;
use std::path::Path;
use std::sync::Arc;
use tracing;

use super::dataset_loader::load_companies;
use super::document_formatter::DocumentFormatter;
use super::vector_store::{company_to_point, VectorStore, EMBEDDING_DIM};

/// Statistics from an ingestion run
#[derive(Debug, Default, Clone)]
pub struct IngestStats {
    pub companies_loaded: usize,
    pub records_skipped: usize,
    pub embeddings_generated: usize,
    pub points_uploaded: usize,
}

/// Company ingestion pipeline that:
/// 1. Loads company records from the dataset directory
/// 2. Flattens them to natural language documents
/// 3. Generates embeddings
/// 4. Uploads to Qdrant
pub struct CompanyIngestionPipeline {
    embedding_model: TextEmbedding,
    vector_store: Arc<VectorStore>,
}

impl CompanyIngestionPipeline {
    /// Create a new ingestion pipeline.
    ///
    /// With `recreate` set, the collection is dropped and rebuilt instead
    /// of appended to.
    pub async fn new(qdrant_url: &str, collection_name: String, recreate: bool) -> Result<Self> {
        // Initialize embedding model (downloads BGE model on first run)
        tracing::info!("Loading embedding model (BGE-small-en-v1.5)...");
        let embedding_model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(true),
        )?;

        let vector_store = Arc::new(VectorStore::new(qdrant_url, collection_name).await?);

        if recreate {
            vector_store.recreate_collection(EMBEDDING_DIM).await?;
        } else {
            vector_store
                .create_collection_if_not_exists(EMBEDDING_DIM)
                .await?;
        }

        tracing::info!("Ingestion pipeline initialized successfully");

        Ok(Self {
            embedding_model,
            vector_store,
        })
    }

    /// Load the dataset directory and ingest every company record found
    pub async fn ingest_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<IngestStats> {
        let dataset = load_companies(dir)?;

        let distinct_tickers: std::collections::HashSet<_> = dataset
            .companies
            .iter()
            .flat_map(|c| c.all_tickers())
            .collect();
        tracing::info!(
            "Dataset covers {} distinct tickers across {} companies",
            distinct_tickers.len(),
            dataset.companies.len()
        );

        let mut stats = self.ingest_companies(&dataset.companies).await?;
        stats.records_skipped = dataset.records_skipped;
        Ok(stats)
    }

    /// Ingest a list of company records
    pub async fn ingest_companies(&mut self, companies: &[CompanyRecord]) -> Result<IngestStats> {
        let mut stats = IngestStats {
            companies_loaded: companies.len(),
            ..Default::default()
        };

        if companies.is_empty() {
            tracing::warn!("No company records to ingest");
            return Ok(stats);
        }

        // Generate embeddings in batches
        const BATCH_SIZE: usize = 100;
        let mut point_id = 0u64;

        for batch in companies.chunks(BATCH_SIZE) {
            // Convert to text
            let texts: Vec<String> = batch.iter().map(|c| c.to_embedding_text()).collect();

            tracing::info!("Generating embeddings for batch of {} documents...", texts.len());

            // Generate embeddings (much faster in batch)
            let embeddings = self.embedding_model.embed(texts, None)?;
            stats.embeddings_generated += embeddings.len();

            // Create Qdrant points
            let mut points = Vec::with_capacity(batch.len());
            for (record, embedding) in batch.iter().zip(embeddings.iter()) {
                points.push(company_to_point(record, embedding.clone(), point_id));
                point_id += 1;
            }

            // Upload batch; a failed batch is logged and skipped so one bad
            // upsert doesn't abort the whole run
            let batch_len = points.len();
            match self.vector_store.upsert_points(points).await {
                Ok(()) => {
                    stats.points_uploaded += batch_len;
                }
                Err(e) => {
                    tracing::error!("Failed to upsert batch of {} points: {}", batch_len, e);
                }
            }

            tracing::info!(
                "Processed {} embeddings (total: {})",
                batch_len,
                stats.embeddings_generated
            );
        }

        tracing::info!("Ingestion complete: {:?}", stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Qdrant running
    async fn test_ingestion_pipeline() {
        let mut pipeline = CompanyIngestionPipeline::new(
            "http://localhost:6333",
            "test_company_tickers".to_string(),
            true,
        )
        .await
        .unwrap();

        let companies = vec![
            CompanyRecord {
                company_name: "Apple Inc.".to_string(),
                exchange_tickers: vec!["AAPL".to_string()],
                related_exchange_tickers: vec![],
            },
            CompanyRecord {
                company_name: "Intel Corporation".to_string(),
                exchange_tickers: vec!["INTC".to_string()],
                related_exchange_tickers: vec![],
            },
        ];

        let stats = pipeline.ingest_companies(&companies).await.unwrap();

        assert_eq!(stats.companies_loaded, 2);
        assert_eq!(stats.embeddings_generated, 2);
        assert_eq!(stats.points_uploaded, 2);
    }
}
