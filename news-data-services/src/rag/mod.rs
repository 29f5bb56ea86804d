pub mod dataset_loader;
pub mod document_formatter;
pub mod ingestion_pipeline;
pub mod vector_store;

// Re-export commonly used items
pub use dataset_loader::{load_companies, load_news, CompanyDataset};
pub use document_formatter::DocumentFormatter;
pub use ingestion_pipeline::{CompanyIngestionPipeline, IngestStats};
pub use vector_store::VectorStore;
