use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::classify;
use crate::fetch::{FetchOutcome, PageFetcher};
use crate::search::SearchProvider;

/// Cooperative cancellation for one scrape run: an optional deadline plus a
/// manual flag. Checked between keywords and between URLs, so in-flight
/// work stops at the next boundary.
#[derive(Clone)]
pub struct CancelToken {
    deadline: Option<Instant>,
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken {
            deadline: None,
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_deadline(limit: Duration) -> Self {
        CancelToken {
            deadline: Some(Instant::now() + limit),
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the discovery run: per keyword, search for candidate URLs, fetch
/// and classify each one, and collect accepted URLs per keyword.
///
/// Failure isolation is layered: a fetch failure skips one URL, a search
/// failure empties one keyword, and neither aborts the run. The coordinator
/// consumes itself on `run`, so the fetcher (the rendering context) is
/// owned by exactly one run and released exactly once on every exit path.
pub struct ScrapeCoordinator<S, F> {
    search: S,
    fetcher: F,
    hiring_signals: Vec<String>,
    search_limit: usize,
    cancel: CancelToken,
}

impl<S: SearchProvider, F: PageFetcher> ScrapeCoordinator<S, F> {
    pub fn new(
        search: S,
        fetcher: F,
        hiring_signals: Vec<String>,
        search_limit: usize,
        cancel: CancelToken,
    ) -> Self {
        ScrapeCoordinator {
            search,
            fetcher,
            hiring_signals,
            search_limit,
            cancel,
        }
    }

    pub fn run(self, keywords: &[String]) -> HashMap<String, Vec<String>> {
        // Every keyword gets its slot up front, so the one-entry-per-keyword
        // invariant holds even when processing fails or the run is cancelled.
        let mut results: HashMap<String, Vec<String>> = keywords
            .iter()
            .map(|k| (k.clone(), Vec::new()))
            .collect();

        'keywords: for keyword in keywords {
            if self.cancel.cancelled() {
                info!("Run cancelled; stopping before keyword '{}'", keyword);
                break;
            }

            info!("Searching postings for: {}", keyword);
            let query = format!("{} job", keyword);
            let urls = match self.search.search(&query, self.search_limit) {
                Ok(urls) => urls,
                Err(e) => {
                    warn!("Search failed for '{}': {}", keyword, e);
                    continue;
                }
            };

            for url in urls {
                if self.cancel.cancelled() {
                    info!("Run cancelled; stopping mid-keyword '{}'", keyword);
                    break 'keywords;
                }

                let page = self.fetcher.fetch(&url);
                match page.outcome {
                    FetchOutcome::Success => {}
                    FetchOutcome::Timeout | FetchOutcome::Error => continue,
                }

                if classify::is_relevant(&page.text, &self.hiring_signals)
                    && classify::is_recent(&page.text)
                {
                    info!("Accepted job posting: {}", url);
                    if let Some(slot) = results.get_mut(keyword) {
                        if !slot.contains(&url) {
                            slot.push(url);
                        }
                    }
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::fetch::PageResult;
    use crate::search::ProviderError;

    struct StubSearch {
        fail_for: Vec<&'static str>,
        urls: Vec<String>,
    }

    impl SearchProvider for StubSearch {
        fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
            if self.fail_for.iter().any(|k| query.starts_with(k)) {
                return Err(ProviderError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS));
            }
            Ok(self.urls.iter().take(limit).cloned().collect())
        }
    }

    /// Fetcher returning canned outcomes; URLs containing "down" time out
    /// and URLs containing "broken" error out.
    struct StubFetcher {
        page_text: &'static str,
        fetched: Rc<RefCell<Vec<String>>>,
    }

    impl StubFetcher {
        fn new(page_text: &'static str) -> Self {
            StubFetcher {
                page_text,
                fetched: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn fetch_log(&self) -> Rc<RefCell<Vec<String>>> {
            Rc::clone(&self.fetched)
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> PageResult {
            self.fetched.borrow_mut().push(url.to_string());
            let outcome = if url.contains("down") {
                FetchOutcome::Timeout
            } else if url.contains("broken") {
                FetchOutcome::Error
            } else {
                FetchOutcome::Success
            };
            let text = match outcome {
                FetchOutcome::Success => self.page_text.to_string(),
                _ => String::new(),
            };
            PageResult {
                url: url.to_string(),
                text,
                outcome,
            }
        }
    }

    fn signals() -> Vec<String> {
        crate::config::default_hiring_signals()
    }

    fn keywords(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn one_keywords_search_failure_does_not_abort_the_run() {
        let search = StubSearch {
            fail_for: vec!["Rust"],
            urls: vec!["https://jobs.example.com/a".to_string()],
        };
        let fetcher = StubFetcher::new("we are hiring, just posted");
        let coordinator =
            ScrapeCoordinator::new(search, fetcher, signals(), 5, CancelToken::new());

        let results = coordinator.run(&keywords(&["Rust", "Go"]));

        assert_eq!(results.len(), 2);
        assert!(results["Rust"].is_empty());
        assert_eq!(results["Go"], vec!["https://jobs.example.com/a"]);
    }

    #[test]
    fn failed_fetches_are_skipped_and_never_accepted() {
        let urls: Vec<String> = vec![
            "https://a.example.com/1".to_string(),
            "https://down.example.com/2".to_string(),
            "https://b.example.com/3".to_string(),
            "https://broken.example.com/4".to_string(),
            "https://c.example.com/5".to_string(),
        ];
        let search = StubSearch {
            fail_for: vec![],
            urls,
        };
        let fetcher = StubFetcher::new("careers page, new opening");
        let coordinator =
            ScrapeCoordinator::new(search, fetcher, signals(), 5, CancelToken::new());

        let results = coordinator.run(&keywords(&["Python"]));

        assert_eq!(
            results["Python"],
            vec![
                "https://a.example.com/1",
                "https://b.example.com/3",
                "https://c.example.com/5",
            ]
        );
    }

    #[test]
    fn relevance_and_recency_are_both_required() {
        let search = StubSearch {
            fail_for: vec![],
            urls: vec!["https://jobs.example.com/evergreen".to_string()],
        };
        // Relevant but carries no recency language: excluded.
        let fetcher = StubFetcher::new("apply now for this vacancy");
        let coordinator =
            ScrapeCoordinator::new(search, fetcher, signals(), 5, CancelToken::new());

        let results = coordinator.run(&keywords(&["Docker"]));
        assert!(results["Docker"].is_empty());
    }

    #[test]
    fn duplicate_candidates_appear_at_most_once_per_keyword() {
        let search = StubSearch {
            fail_for: vec![],
            urls: vec![
                "https://jobs.example.com/a".to_string(),
                "https://jobs.example.com/a".to_string(),
            ],
        };
        let fetcher = StubFetcher::new("hiring, 2 days ago");
        let coordinator =
            ScrapeCoordinator::new(search, fetcher, signals(), 5, CancelToken::new());

        let results = coordinator.run(&keywords(&["Kubernetes"]));
        assert_eq!(results["Kubernetes"], vec!["https://jobs.example.com/a"]);
    }

    #[test]
    fn every_keyword_has_a_slot_even_with_empty_results() {
        let search = StubSearch {
            fail_for: vec![],
            urls: vec![],
        };
        let fetcher = StubFetcher::new("");
        let coordinator =
            ScrapeCoordinator::new(search, fetcher, signals(), 5, CancelToken::new());

        let results = coordinator.run(&keywords(&["Rust", "Python", "Terraform"]));
        assert_eq!(results.len(), 3);
        assert!(results.values().all(|v| v.is_empty()));
    }

    #[test]
    fn cancelled_run_keeps_slots_and_fetches_nothing() {
        let search = StubSearch {
            fail_for: vec![],
            urls: vec!["https://jobs.example.com/a".to_string()],
        };
        let fetcher = StubFetcher::new("hiring, just posted");
        let fetch_log = fetcher.fetch_log();
        let cancel = CancelToken::new();
        cancel.cancel();
        let coordinator = ScrapeCoordinator::new(search, fetcher, signals(), 5, cancel);

        let results = coordinator.run(&keywords(&["Rust", "Go"]));

        assert_eq!(results.len(), 2);
        assert!(results.values().all(|v| v.is_empty()));
        assert!(fetch_log.borrow().is_empty());
    }

    #[test]
    fn expired_deadline_cancels_the_run() {
        let token = CancelToken::with_deadline(Duration::from_secs(0));
        assert!(token.cancelled());
        let token = CancelToken::with_deadline(Duration::from_secs(3600));
        assert!(!token.cancelled());
    }
}
