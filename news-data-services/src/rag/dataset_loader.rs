use anyhow::{Context, Result};
use news_core::{CompanyRecord, NewsArticle};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing;

/// Company records loaded from a dataset directory, with load bookkeeping
#[derive(Debug, Default)]
pub struct CompanyDataset {
    pub companies: Vec<CompanyRecord>,
    /// Records dropped for missing/invalid fields (load continues past them)
    pub records_skipped: usize,
    /// Files dropped because they were unreadable or not valid JSON
    pub files_skipped: usize,
}

#[derive(Debug, Deserialize)]
struct CompaniesFile {
    companies: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NewsFile {
    news: Vec<NewsArticle>,
}

/// Load all company records from the JSON files in a directory.
///
/// Each file holds `{"companies": [...]}`. Subdirectories are ignored.
/// A file that fails to parse, or a record without a usable
/// `company_name`, is logged and skipped; loading always continues.
pub fn load_companies<P: AsRef<Path>>(dir: P) -> Result<CompanyDataset> {
    let dir = dir.as_ref();
    tracing::info!("Loading company records from {}", dir.display());

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read ticker directory {}", dir.display()))?;

    let mut dataset = CompanyDataset::default();

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Skipping unreadable file {}: {}", path.display(), e);
                dataset.files_skipped += 1;
                continue;
            }
        };

        let file: CompaniesFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Skipping non-dataset file {}: {}", path.display(), e);
                dataset.files_skipped += 1;
                continue;
            }
        };

        for value in file.companies {
            match serde_json::from_value::<CompanyRecord>(value) {
                Ok(record) if !record.company_name.trim().is_empty() => {
                    dataset.companies.push(record);
                }
                Ok(_) => {
                    tracing::warn!("Skipping record with empty company_name in {}", path.display());
                    dataset.records_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed record in {}: {}", path.display(), e);
                    dataset.records_skipped += 1;
                }
            }
        }
    }

    tracing::info!(
        "Loaded {} company records ({} records skipped, {} files skipped)",
        dataset.companies.len(),
        dataset.records_skipped,
        dataset.files_skipped
    );

    Ok(dataset)
}

/// Load the news articles from the `ai_summary.json` feed file.
pub fn load_news<P: AsRef<Path>>(path: P) -> Result<Vec<NewsArticle>> {
    let path = path.as_ref();
    tracing::info!("Loading news articles from {}", path.display());

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read news file {}", path.display()))?;

    let file: NewsFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse news file {}", path.display()))?;

    tracing::info!("Loaded {} news articles", file.news.len());

    Ok(file.news)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_errors() {
        let result = load_companies("/nonexistent/tickers");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_news_file_errors() {
        let result = load_news("/nonexistent/ai_summary.json");
        assert!(result.is_err());
    }
}
