//! Deterministic parsing of LLM answers into ticker lists.
//!
//! The model is instructed to answer with a comma-separated list of
//! exchange symbols (or NONE), but real answers drift: JSON arrays,
//! markdown fences, lead-in sentences, parenthesized symbols inside
//! prose. The parser accepts all of these and never fails; an answer
//! with nothing usable in it parses to an empty list.

use news_core::{normalize_symbol, TickerSymbol};
use std::collections::HashSet;

/// All-caps tokens that look symbol-shaped but are never tickers in an
/// answer (articles, finance acronyms, the NONE sentinel).
const STOPWORDS: &[&str] = &[
    "NONE", "N/A", "NA", "NULL", "A", "AN", "AND", "ARE", "AS", "AT", "BE", "BUT", "BY", "CEO",
    "CFO", "ETF", "FOR", "GDP", "I", "IN", "IPO", "IS", "IT", "ITS", "MAY", "NASDAQ", "NO", "NOT",
    "NYSE", "OF", "ON", "OR", "Q1", "Q2", "Q3", "Q4", "SEC", "SO", "STOCK", "THE", "TICKER", "TO",
    "TOO", "US", "USA", "USD",
];

/// Parse raw model output into a deduplicated list of ticker symbols.
pub fn parse_tickers(raw: &str) -> Vec<TickerSymbol> {
    let text = strip_fences(raw);
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }

    if let Some(tickers) = parse_json_array(text) {
        return dedup(tickers);
    }

    let candidates = if text.contains(',') {
        parse_comma_list(text)
    } else {
        scan_tokens(text)
    };

    dedup(candidates)
}

/// Drop markdown code fences and stray backticks
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").replace('`', "")
}

/// Accept a JSON string array anywhere in the answer
fn parse_json_array(text: &str) -> Option<Vec<TickerSymbol>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }

    let list: Vec<String> = serde_json::from_str(&text[start..=end]).ok()?;

    Some(
        list.iter()
            .filter_map(|s| normalize_symbol(s))
            .filter(|s| is_symbol_shaped(s) && !is_stopword(s))
            .collect(),
    )
}

/// Comma-separated answers, possibly with a lead-in sentence
/// ("The tickers are: INTC, TWTR."). Each segment contributes its final
/// word; lowercase words are only accepted when the segment is a bare
/// single-word list entry.
fn parse_comma_list(text: &str) -> Vec<TickerSymbol> {
    let mut tickers = Vec::new();

    for segment in text.split(',') {
        let word_count = segment.split_whitespace().count();
        let last_word = match segment.split_whitespace().last() {
            Some(word) => strip_punctuation(word),
            None => continue,
        };

        if last_word.is_empty() {
            continue;
        }

        let already_upper = !last_word.chars().any(|c| c.is_ascii_lowercase());
        if word_count > 1 && !already_upper {
            continue;
        }

        let candidate = last_word.to_uppercase();
        if is_symbol_shaped(&candidate) && !is_stopword(&candidate) {
            tickers.push(candidate);
        }
    }

    tickers
}

/// Prose answers without commas: pick out tokens that are already written
/// as exchange symbols ("(AAPL)", "TSLA.")
fn scan_tokens(text: &str) -> Vec<TickerSymbol> {
    text.split_whitespace()
        .map(strip_punctuation)
        .filter(|token| {
            !token.is_empty()
                && !token.chars().any(|c| c.is_ascii_lowercase())
                && is_symbol_shaped(token)
                && !is_stopword(token)
        })
        .map(|token| token.to_string())
        .collect()
}

/// Trim surrounding punctuation ("(AAPL)", "**TSLA**", "TWTR.")
fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_ascii_alphanumeric())
}

/// 1-6 characters of A-Z/0-9 with optional interior '.' or '-', at least
/// one letter
fn is_symbol_shaped(token: &str) -> bool {
    if token.is_empty() || token.len() > 6 {
        return false;
    }

    if token.starts_with('.') || token.starts_with('-') || token.ends_with('.') || token.ends_with('-')
    {
        return false;
    }

    let valid_chars = token
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-');

    valid_chars && token.chars().any(|c| c.is_ascii_uppercase())
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Remove duplicates preserving first-seen order
fn dedup(tickers: Vec<TickerSymbol>) -> Vec<TickerSymbol> {
    let mut seen = HashSet::new();
    tickers
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
