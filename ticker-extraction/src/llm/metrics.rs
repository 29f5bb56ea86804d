//! Extraction performance metrics
//!
//! Tracks per-request latency for embedding, retrieval, and LLM inference,
//! plus similarity quality of the retrieved company documents.

use std::time::{Duration, Instant};

/// Latencies measured inside the retriever
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrievalTimings {
    pub embedding: Duration,
    pub search: Duration,
}

/// Metrics for one ticker extraction request
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetrics {
    /// Time taken to embed the query text (milliseconds)
    pub embedding_latency_ms: u64,

    /// Time taken to search the vector store (milliseconds)
    pub retrieval_latency_ms: u64,

    /// Time taken for the LLM to generate its answer (milliseconds)
    pub llm_latency_ms: u64,

    /// Similarity scores of all retrieved company documents
    pub similarity_scores: Vec<f32>,

    /// Minimum similarity among matches
    pub similarity_min: Option<f32>,

    /// Maximum similarity among matches
    pub similarity_max: Option<f32>,

    /// Number of company documents retrieved
    pub num_matches: usize,

    /// Number of tickers parsed out of the model answer
    pub tickers_extracted: usize,

    /// Whether the result came from the cache (no retrieval/LLM work done)
    pub cache_hit: bool,
}

impl ExtractionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_retrieval_timings(&mut self, timings: RetrievalTimings) {
        self.embedding_latency_ms = timings.embedding.as_millis() as u64;
        self.retrieval_latency_ms = timings.search.as_millis() as u64;
    }

    pub fn set_llm_latency(&mut self, duration: Duration) {
        self.llm_latency_ms = duration.as_millis() as u64;
    }

    /// Add similarity scores and compute statistics
    pub fn set_similarity_scores(&mut self, scores: Vec<f32>) {
        if scores.is_empty() {
            self.similarity_min = None;
            self.similarity_max = None;
            self.num_matches = 0;
        } else {
            self.similarity_min = scores
                .iter()
                .copied()
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            self.similarity_max = scores
                .iter()
                .copied()
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            self.num_matches = scores.len();
        }
        self.similarity_scores = scores;
    }

    /// Calculate average similarity score
    pub fn avg_similarity(&self) -> f32 {
        if self.similarity_scores.is_empty() {
            0.0
        } else {
            self.similarity_scores.iter().sum::<f32>() / self.similarity_scores.len() as f32
        }
    }

    /// Calculate total latency (embedding + retrieval + LLM)
    pub fn total_latency_ms(&self) -> u64 {
        self.embedding_latency_ms + self.retrieval_latency_ms + self.llm_latency_ms
    }

    /// Report metrics to tracing logs
    pub fn report(&self) {
        tracing::info!(
            "Extraction metrics: embedding={}ms, retrieval={}ms, llm={}ms, total={}ms, \
             matches={}, avg_sim={:.2}, sim_range=[{:?},{:?}], tickers={}, cache_hit={}",
            self.embedding_latency_ms,
            self.retrieval_latency_ms,
            self.llm_latency_ms,
            self.total_latency_ms(),
            self.num_matches,
            self.avg_similarity(),
            self.similarity_min,
            self.similarity_max,
            self.tickers_extracted,
            self.cache_hit,
        );
    }
}

/// Timer helper for measuring operation latency
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = ExtractionMetrics::new();
        assert_eq!(metrics.num_matches, 0);
        assert_eq!(metrics.embedding_latency_ms, 0);
        assert_eq!(metrics.retrieval_latency_ms, 0);
        assert_eq!(metrics.llm_latency_ms, 0);
        assert!(!metrics.cache_hit);
    }

    #[test]
    fn test_similarity_scores() {
        let mut metrics = ExtractionMetrics::new();
        let scores = vec![0.9, 0.85, 0.75, 0.95, 0.8];
        metrics.set_similarity_scores(scores);

        assert_eq!(metrics.num_matches, 5);
        assert_eq!(metrics.similarity_min, Some(0.75));
        assert_eq!(metrics.similarity_max, Some(0.95));
        assert_eq!(metrics.avg_similarity(), 0.85);
    }

    #[test]
    fn test_empty_similarity_scores() {
        let mut metrics = ExtractionMetrics::new();
        metrics.set_similarity_scores(vec![]);

        assert_eq!(metrics.num_matches, 0);
        assert_eq!(metrics.similarity_min, None);
        assert_eq!(metrics.similarity_max, None);
        assert_eq!(metrics.avg_similarity(), 0.0);
    }

    #[test]
    fn test_latency_accumulation() {
        let mut metrics = ExtractionMetrics::new();
        metrics.set_retrieval_timings(RetrievalTimings {
            embedding: Duration::from_millis(30),
            search: Duration::from_millis(50),
        });
        metrics.set_llm_latency(Duration::from_millis(200));

        assert_eq!(metrics.embedding_latency_ms, 30);
        assert_eq!(metrics.retrieval_latency_ms, 50);
        assert_eq!(metrics.llm_latency_ms, 200);
        assert_eq!(metrics.total_latency_ms(), 280);
    }

    #[test]
    fn test_timer() {
        let timer = MetricsTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }
}
