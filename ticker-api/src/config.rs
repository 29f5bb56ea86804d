/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub qdrant_url: String,
    pub collection_name: String,
    /// Directory holding the ticker dataset and news feed
    pub data_dir: String,
    /// News feed file loaded once at startup
    pub news_file: String,
    /// Directory of example food photos for the recipe endpoint
    pub photos_dir: String,
    pub top_k: usize,
    pub min_similarity: f32,
    /// Below this many retrieved documents the extractor uses the
    /// context-free prompt
    pub min_matches: usize,
    pub rag_enabled: bool,
    pub llm_model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5521,
            qdrant_url: "http://localhost:6333".to_string(),
            collection_name: "company_tickers".to_string(),
            data_dir: "./data".to_string(),
            news_file: "./data/ai_summary.json".to_string(),
            photos_dir: "./data/example_food_photos".to_string(),
            top_k: 5,
            min_similarity: 0.35,
            min_matches: 1,
            rag_enabled: true,
            llm_model: "gpt-4-turbo".to_string(),
        }
    }
}
