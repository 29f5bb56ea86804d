pub mod extractor;
pub mod llm;

// Re-export commonly used items from llm module
pub use llm::{
    parse_tickers, CompanyMatch, CompanyRetriever, ExtractionMetrics, LlmClient, LlmConfig,
    LlmResponse, TickerPromptFormatter,
};

// Re-export commonly used items from extractor module
pub use extractor::{
    ExtractionOutcome, ExtractorConfig, RecipeRecommendation, RecipeRecommender, TickerExtractor,
};
