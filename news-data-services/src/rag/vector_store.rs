use anyhow::Result;
use news_core::CompanyRecord;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json;
use tracing;

use super::document_formatter::DocumentFormatter;

/// Embedding model identifier recorded in every payload
pub const EMBEDDING_MODEL: &str = "bge-small-en-v1.5";

/// BGE-small produces 384-dimensional vectors
pub const EMBEDDING_DIM: u64 = 384;

/// Qdrant vector store for company documents
pub struct VectorStore {
    client: Qdrant,
    collection_name: String,
}

impl VectorStore {
    /// Initialize Qdrant client (embedded for dev, cloud for prod)
    pub async fn new(qdrant_url: &str, collection_name: String) -> Result<Self> {
        let client = Qdrant::from_url(qdrant_url).build()?;

        tracing::info!("Connecting to Qdrant at {}", qdrant_url);

        Ok(Self {
            client,
            collection_name,
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Create collection if it doesn't exist
    pub async fn create_collection_if_not_exists(&self, dimension: u64) -> Result<()> {
        match self
            .client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await
        {
            Ok(_) => {
                tracing::info!("Created Qdrant collection: {}", self.collection_name);
                Ok(())
            }
            Err(e) => {
                // Collection might already exist
                tracing::info!(
                    "Qdrant collection {} already exists or error: {}",
                    self.collection_name,
                    e
                );
                Ok(())
            }
        }
    }

    /// Drop and recreate the collection (full re-ingest)
    pub async fn recreate_collection(&self, dimension: u64) -> Result<()> {
        if let Err(e) = self
            .client
            .delete_collection(self.collection_name.as_str())
            .await
        {
            tracing::warn!(
                "Failed to delete collection {} (may not exist): {}",
                self.collection_name,
                e
            );
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await?;

        tracing::info!("Recreated Qdrant collection: {}", self.collection_name);
        Ok(())
    }

    /// Upload points to Qdrant
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        tracing::info!("Upserting {} points to Qdrant", points.len());

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points))
            .await?;

        Ok(())
    }

    /// Search for similar vectors
    pub async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> Result<Vec<ScoredPoint>> {
        let mut search_builder =
            SearchPointsBuilder::new(&self.collection_name, query_vector, limit).with_payload(true);

        if let Some(threshold) = score_threshold {
            search_builder = search_builder.score_threshold(threshold);
        }

        let search_result = self.client.search_points(search_builder).await?;

        Ok(search_result.result)
    }

    /// Number of points in the collection, if it exists
    pub async fn point_count(&self) -> Result<Option<u64>> {
        match self.client.collection_info(self.collection_name.as_str()).await {
            Ok(info) => Ok(info.result.and_then(|r| r.points_count)),
            Err(e) => {
                tracing::warn!("Failed to get collection info: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Helper to create Qdrant points from company records
pub fn company_to_point(
    record: &CompanyRecord,
    embedding: Vec<f32>,
    point_id: u64,
) -> PointStruct {
    let build_id = std::env::var("GIT_SHA").unwrap_or_else(|_| "dev".to_string());
    let ingested_at = chrono::Utc::now().to_rfc3339();

    let payload_json = serde_json::json!({
        // Identification
        "company_name": record.company_name,
        "exchange_tickers": record.joined_tickers(),
        "related_exchange_tickers": record.joined_related_tickers(),

        // The flattened document the embedding was computed from
        "document": record.to_embedding_text(),

        // Metadata & provenance
        "schema_version": 1,
        "embedding_model": EMBEDDING_MODEL,
        "embedding_dim": EMBEDDING_DIM,
        "build_id": build_id,
        "ingested_at": ingested_at,
    });

    // Convert to Map for Qdrant Payload compatibility
    let payload = payload_json.as_object().unwrap().clone();

    PointStruct::new(point_id, embedding, payload)
}
