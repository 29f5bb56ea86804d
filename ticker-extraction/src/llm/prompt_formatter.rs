use super::CompanyMatch;

/// Formatter for ticker extraction prompts with or without retrieved context
pub struct TickerPromptFormatter;

impl TickerPromptFormatter {
    /// Format a prompt enriched with retrieved company documents
    pub fn format_with_context(article_text: &str, matches: &[CompanyMatch]) -> String {
        let mut prompt = String::new();

        prompt.push_str("═══ TICKER EXTRACTION ═══\n\n");

        prompt.push_str("KNOWN COMPANIES (most relevant first):\n\n");
        for (i, m) in matches.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} (Relevance: {:.1}%)\n",
                i + 1,
                m.document,
                m.similarity * 100.0
            ));
        }

        prompt.push('\n');
        prompt.push_str("ARTICLE:\n");
        prompt.push_str(article_text);
        prompt.push_str("\n\n");

        Self::push_instructions(&mut prompt);
        prompt
    }

    /// Format a context-free prompt.
    ///
    /// Used when retrieval found too few company documents or RAG is
    /// disabled; the model extracts from the article text alone.
    pub fn format_baseline(article_text: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("═══ TICKER EXTRACTION ═══\n\n");
        prompt.push_str("ARTICLE:\n");
        prompt.push_str(article_text);
        prompt.push_str("\n\n");

        Self::push_instructions(&mut prompt);
        prompt
    }

    fn push_instructions(prompt: &mut String) {
        prompt.push_str("TASK:\n");
        prompt.push_str(
            "Extract all the stock tickers of companies mentioned in the article above.\n",
        );
        prompt.push_str(
            "Answer with a comma-separated list of exchange ticker symbols only \
             (e.g., AAPL, TSLA).\n",
        );
        prompt.push_str("If the article mentions no listed company, answer NONE.\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(name: &str, ticker: &str, similarity: f32) -> CompanyMatch {
        CompanyMatch {
            similarity,
            company_name: name.to_string(),
            exchange_tickers: vec![ticker.to_string()],
            related_exchange_tickers: vec![],
            document: format!("Company name: {}. Exchange tickers: {}", name, ticker),
        }
    }

    #[test]
    fn test_context_prompt_format() {
        let matches = vec![
            sample_match("Apple Inc.", "AAPL", 0.91),
            sample_match("Intel Corporation", "INTC", 0.72),
        ];

        let prompt = TickerPromptFormatter::format_with_context(
            "Title: Apple Reports Record Earnings Amid Strong iPhone Sales",
            &matches,
        );

        assert!(prompt.contains("KNOWN COMPANIES"));
        assert!(prompt.contains("1. Company name: Apple Inc."));
        assert!(prompt.contains("Relevance: 91.0%"));
        assert!(prompt.contains("ARTICLE:"));
        assert!(prompt.contains("Apple Reports Record Earnings"));
        assert!(prompt.contains("comma-separated list"));
        assert!(prompt.contains("NONE"));
    }

    #[test]
    fn test_baseline_prompt_format() {
        let prompt =
            TickerPromptFormatter::format_baseline("Title: Tesla's Market Cap Surpasses $1 Trillion");

        assert!(!prompt.contains("KNOWN COMPANIES"));
        assert!(prompt.contains("ARTICLE:"));
        assert!(prompt.contains("Tesla"));
        assert!(prompt.contains("TASK:"));
    }
}
