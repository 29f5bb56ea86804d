use news_core::CompanyRecord;

/// Trait for flattening structured records into natural language text for
/// embeddings
pub trait DocumentFormatter {
    /// Convert the record into the free-text document that gets embedded
    /// and stored alongside the vector payload
    fn to_embedding_text(&self) -> String;
}

impl DocumentFormatter for CompanyRecord {
    fn to_embedding_text(&self) -> String {
        let mut parts = Vec::new();

        parts.push(format!("Company name: {}", self.company_name));

        if self.exchange_tickers.is_empty() {
            parts.push("Exchange tickers: none listed".to_string());
        } else {
            parts.push(format!(
                "Exchange tickers: {}",
                self.exchange_tickers.join(", ")
            ));
        }

        if !self.related_exchange_tickers.is_empty() {
            parts.push(format!(
                "Related exchange tickers: {}",
                self.related_exchange_tickers.join(", ")
            ));
        }

        parts.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_full_record() {
        let record = CompanyRecord {
            company_name: "United States Steel Corporation".to_string(),
            exchange_tickers: vec!["X".to_string()],
            related_exchange_tickers: vec!["USS".to_string()],
        };

        let text = record.to_embedding_text();
        assert_eq!(
            text,
            "Company name: United States Steel Corporation. \
             Exchange tickers: X. Related exchange tickers: USS"
        );
    }

    #[test]
    fn test_embedding_text_without_related() {
        let record = CompanyRecord {
            company_name: "Apple Inc.".to_string(),
            exchange_tickers: vec!["AAPL".to_string()],
            related_exchange_tickers: vec![],
        };

        let text = record.to_embedding_text();
        assert!(text.contains("Apple Inc."));
        assert!(text.contains("Exchange tickers: AAPL"));
        assert!(!text.contains("Related"));
    }

    #[test]
    fn test_embedding_text_no_tickers() {
        let record = CompanyRecord::new("Stealth Startup LLC");
        let text = record.to_embedding_text();
        assert!(text.contains("none listed"));
    }
}
