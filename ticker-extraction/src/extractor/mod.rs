/// Extraction services built on the retrieval + generation stack
pub mod rag_extractor;
pub mod recipe;

pub use rag_extractor::{ExtractionOutcome, ExtractorConfig, TickerExtractor};
pub use recipe::{RecipeRecommendation, RecipeRecommender};
