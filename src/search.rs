use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search returned status {0}")]
    Status(reqwest::StatusCode),
}

/// External search index. Each call re-issues the query against the live
/// index, so results may differ between calls for the same query.
pub trait SearchProvider {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ProviderError>;
}

/// Candidate-URL discovery through the DuckDuckGo HTML endpoint.
pub struct DuckDuckGoSearch {
    client: Client,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build Search Client");

        DuckDuckGoSearch { client }
    }

    fn parse_results(&self, html: &str, limit: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        // DDG HTML uses specific classes. .result__a is the link title.
        let selector = Selector::parse(".result__a").unwrap();

        let mut urls = Vec::new();
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if href.starts_with("http") && !href.contains("duckduckgo.com") {
                    urls.push(href.to_string());
                    if urls.len() >= limit {
                        break;
                    }
                }
            }
        }
        if urls.is_empty() {
            warn!("No candidate URLs found in search results.");
        }
        urls
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProvider for DuckDuckGoSearch {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
        let encoded_query = urlencoding::encode(query);
        let search_url = format!("https://html.duckduckgo.com/html/?q={}", encoded_query);

        info!("Searching for: '{}'", query);

        let resp = self.client.get(&search_url).send()?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status()));
        }
        let text = resp.text()?;
        Ok(self.parse_results(&text, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_HTML: &str = r#"
        <html><body>
          <a class="result__a" href="https://duckduckgo.com/about">DDG itself</a>
          <a class="result__a" href="https://jobs.example.com/rust-dev">Rust Dev</a>
          <a class="result__a" href="/relative/link">Relative</a>
          <a class="result__a" href="https://careers.example.org/listing/42">Listing</a>
          <a class="result__a" href="https://boards.example.net/posting">Posting</a>
        </body></html>
    "#;

    #[test]
    fn parsing_keeps_absolute_external_links_in_order() {
        let engine = DuckDuckGoSearch::new();
        let urls = engine.parse_results(RESULTS_HTML, 5);
        assert_eq!(
            urls,
            vec![
                "https://jobs.example.com/rust-dev",
                "https://careers.example.org/listing/42",
                "https://boards.example.net/posting",
            ]
        );
    }

    #[test]
    fn parsing_is_bounded_by_limit() {
        let engine = DuckDuckGoSearch::new();
        let urls = engine.parse_results(RESULTS_HTML, 2);
        assert_eq!(urls.len(), 2);
    }
}
