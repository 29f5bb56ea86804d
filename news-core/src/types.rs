pub mod article;
pub mod company;

// Re-export common types
pub use article::NewsArticle;
pub use company::CompanyRecord;

/// Exchange ticker symbol (e.g., "AAPL", "BRK.A", "X")
pub type TickerSymbol = String;

/// Normalize a raw symbol string into canonical ticker form.
///
/// Trims surrounding whitespace and quotes and uppercases the rest.
/// Returns `None` when nothing usable remains.
pub fn normalize_symbol(raw: &str) -> Option<TickerSymbol> {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`');

    if cleaned.is_empty() {
        return None;
    }

    Some(cleaned.to_uppercase())
}
