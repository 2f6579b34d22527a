use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};
use log::{info, warn};
use scraper::Html;
use thiserror::Error;

use crate::delay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Timeout,
    Error,
}

/// Result of retrieving one candidate URL. On success `text` holds the
/// rendered page text, lower-cased and whitespace-normalized; otherwise it
/// is empty and the caller skips the URL.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub url: String,
    pub text: String,
    pub outcome: FetchOutcome,
}

pub trait PageFetcher {
    fn fetch(&self, url: &str) -> PageResult;
}

#[derive(Debug, Error)]
#[error("could not start headless browser: {0}")]
pub struct FetchInitError(String);

/// Rendering context for one scrape run: a headless browser owned for the
/// fetcher's lifetime. Target sites commonly require client-side rendering
/// before any posting text is visible, so a plain HTTP GET is not enough.
///
/// Every URL gets a fresh tab that is closed after the fetch; the browser's
/// temporary profile is discarded when the fetcher drops, so no page state
/// leaks between URLs or between runs.
pub struct BrowserFetcher {
    browser: Browser,
    timeout: Duration,
    delay_range: (u64, u64),
}

impl BrowserFetcher {
    pub fn launch(timeout: Duration, delay_range: (u64, u64)) -> Result<Self, FetchInitError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| FetchInitError(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| FetchInitError(e.to_string()))?;
        info!("Headless rendering context started.");
        Ok(BrowserFetcher {
            browser,
            timeout,
            delay_range,
        })
    }

    fn render(&self, url: &str) -> anyhow::Result<String> {
        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(self.timeout);
        let navigation: anyhow::Result<String> = (|| {
            tab.navigate_to(url)?;
            tab.wait_until_navigated()?;
            tab.get_content()
        })();
        // Close regardless of the navigation outcome so tabs never pile up.
        let _ = tab.close(true);
        Ok(page_text(&navigation?))
    }
}

impl PageFetcher for BrowserFetcher {
    fn fetch(&self, url: &str) -> PageResult {
        delay::random_fetch_delay(self.delay_range);
        info!("Visiting: {}", url);
        match self.render(url) {
            Ok(text) => PageResult {
                url: url.to_string(),
                text,
                outcome: FetchOutcome::Success,
            },
            Err(e) => {
                let outcome = classify_render_error(&e);
                warn!("Browser error while fetching {} ({:?}): {}", url, outcome, e);
                PageResult {
                    url: url.to_string(),
                    text: String::new(),
                    outcome,
                }
            }
        }
    }
}

// The browser reports navigation timeouts as "timed out" or, from its wait
// helper, "the event waited for never came".
fn classify_render_error(err: &anyhow::Error) -> FetchOutcome {
    let message = err.to_string().to_lowercase();
    if message.contains("timed out") || message.contains("timeout") || message.contains("never came")
    {
        FetchOutcome::Timeout
    } else {
        FetchOutcome::Error
    }
}

/// Strips markup from rendered HTML and normalizes the remaining text:
/// element text joined with single spaces, lower-cased.
pub(crate) fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let joined = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    joined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_text_is_lowercased_and_whitespace_normalized() {
        let html = "<html><body><h1>Apply   Now</h1>\n<p>Posted 2 Days ago</p></body></html>";
        assert_eq!(page_text(html), "apply now posted 2 days ago");
    }

    #[test]
    fn page_text_of_empty_document_is_empty() {
        assert_eq!(page_text(""), "");
    }

    #[test]
    fn timeout_messages_classify_as_timeout() {
        let err = anyhow::anyhow!("navigation timed out after 20s");
        assert_eq!(classify_render_error(&err), FetchOutcome::Timeout);
        let err = anyhow::anyhow!("The event waited for never came");
        assert_eq!(classify_render_error(&err), FetchOutcome::Timeout);
        let err = anyhow::anyhow!("net::ERR_NAME_NOT_RESOLVED");
        assert_eq!(classify_render_error(&err), FetchOutcome::Error);
    }
}
