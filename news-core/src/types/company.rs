use serde::{Deserialize, Serialize};

use crate::types::TickerSymbol;

/// A company record loaded from the ticker dataset files.
///
/// Records are flattened into free-text documents, embedded, and stored in
/// the vector database; the exchange tickers come back out of retrieval
/// payloads as the ground truth the LLM is asked to match against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Legal or common company name (required in the source files;
    /// records without it are skipped at load time)
    pub company_name: String,

    /// Primary exchange tickers (e.g., ["AAPL"])
    #[serde(default)]
    pub exchange_tickers: Vec<TickerSymbol>,

    /// Secondary listings and closely related symbols (e.g., ["USS"])
    #[serde(default)]
    pub related_exchange_tickers: Vec<TickerSymbol>,
}

impl CompanyRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            exchange_tickers: Vec::new(),
            related_exchange_tickers: Vec::new(),
        }
    }

    /// All symbols associated with this company, primary listings first.
    pub fn all_tickers(&self) -> Vec<TickerSymbol> {
        self.exchange_tickers
            .iter()
            .chain(self.related_exchange_tickers.iter())
            .cloned()
            .collect()
    }

    /// Comma-joined primary tickers, as stored in retrieval payloads.
    pub fn joined_tickers(&self) -> String {
        self.exchange_tickers.join(",")
    }

    /// Comma-joined related tickers, as stored in retrieval payloads.
    pub fn joined_related_tickers(&self) -> String {
        self.related_exchange_tickers.join(",")
    }
}
