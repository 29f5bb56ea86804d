pub mod rag;

// Re-export commonly used items
pub use rag::{
    load_companies, load_news, CompanyDataset, CompanyIngestionPipeline, DocumentFormatter,
    IngestStats, VectorStore,
};
