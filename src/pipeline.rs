use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info, warn};

use crate::config::Config;
use crate::coordinator::{CancelToken, ScrapeCoordinator};
use crate::fetch::BrowserFetcher;
use crate::keywords::KeywordExtractor;
use crate::publisher::{PublishOutcome, ResultPublisher};
use crate::search::DuckDuckGoSearch;

/// One pipeline invocation: extract keywords, scrape postings, publish the
/// aggregate. Produces exactly one outcome per invocation; everything below
/// keyword granularity degrades internally and only shows up in logs.
pub struct Pipeline {
    extractor: Arc<KeywordExtractor>,
    config: Config,
}

impl Pipeline {
    pub fn new(extractor: Arc<KeywordExtractor>, config: Config) -> Self {
        Pipeline { extractor, config }
    }

    pub fn run(&self, resume_text: &str) -> PublishOutcome {
        if self.extractor.degraded() {
            warn!("Keyword extraction running in degraded mode.");
        }
        let keywords = self.extractor.extract(resume_text);
        let results = self.scrape(&keywords);

        let publisher = ResultPublisher::new(
            self.config.publish_endpoint.clone(),
            self.config.publish_timeout,
        );
        publisher.publish(&results)
    }

    fn scrape(&self, keywords: &[String]) -> HashMap<String, Vec<String>> {
        if keywords.is_empty() {
            info!("No keywords extracted; nothing to scrape.");
            return HashMap::new();
        }

        let cancel = match self.config.run_deadline {
            Some(limit) => CancelToken::with_deadline(limit),
            None => CancelToken::new(),
        };

        // The rendering context is acquired per invocation and owned by this
        // one coordinator run; dropping the coordinator releases it.
        let fetcher =
            match BrowserFetcher::launch(self.config.fetch_timeout, self.config.fetch_delay_range) {
                Ok(fetcher) => fetcher,
                Err(e) => {
                    error!("{}", e);
                    return keywords.iter().map(|k| (k.clone(), Vec::new())).collect();
                }
            };

        let coordinator = ScrapeCoordinator::new(
            DuckDuckGoSearch::new(),
            fetcher,
            self.config.hiring_signals.clone(),
            self.config.search_limit,
            cancel,
        );
        coordinator.run(keywords)
    }
}
