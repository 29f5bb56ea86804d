use serde::{Deserialize, Serialize};

/// A news article (title plus AI-generated summary) from the news feed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub summary: String,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// True when neither title nor summary carries any text.
    ///
    /// Title-only and summary-only articles are valid queries; an article
    /// that is blank on both sides is not.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.summary.trim().is_empty()
    }

    /// Flatten the article into the text used for retrieval and prompts.
    pub fn query_text(&self) -> String {
        let title = self.title.trim();
        let summary = self.summary.trim();

        match (title.is_empty(), summary.is_empty()) {
            (false, false) => format!("Title: {}\nSummary: {}", title, summary),
            (false, true) => format!("Title: {}", title),
            (true, false) => format!("Summary: {}", summary),
            (true, true) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_full() {
        let article = NewsArticle::new(
            "Apple Reports Record Earnings Amid Strong iPhone Sales",
            "Apple Inc. announced record quarterly earnings.",
        );

        let text = article.query_text();
        assert!(text.starts_with("Title: Apple Reports"));
        assert!(text.contains("Summary: Apple Inc."));
    }

    #[test]
    fn test_query_text_title_only() {
        let article = NewsArticle::new("Tesla's Market Cap Surpasses $1 Trillion", "");
        assert_eq!(
            article.query_text(),
            "Title: Tesla's Market Cap Surpasses $1 Trillion"
        );
        assert!(!article.is_blank());
    }

    #[test]
    fn test_query_text_summary_only() {
        let article = NewsArticle::new("  ", "The mining giant increased copper output.");
        assert_eq!(
            article.query_text(),
            "Summary: The mining giant increased copper output."
        );
    }

    #[test]
    fn test_blank_article() {
        let article = NewsArticle::new(" ", "\t");
        assert!(article.is_blank());
        assert_eq!(article.query_text(), "");
    }
}
