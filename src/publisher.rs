use std::collections::HashMap;
use std::time::Duration;

use log::{error, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Outcome of a single delivery attempt. The pipeline reports this to the
/// caller but never retries on its own; the caller may re-trigger the whole
/// upload if desired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    Rejected(u16),
    Unreachable(String),
}

/// Serializes the aggregate keyword -> URLs map as JSON and posts it to the
/// configured downstream sink in one attempt.
pub struct ResultPublisher {
    client: Client,
    endpoint: String,
}

impl ResultPublisher {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build Publisher Client");
        ResultPublisher { client, endpoint }
    }

    pub fn publish(&self, results: &HashMap<String, Vec<String>>) -> PublishOutcome {
        info!(
            "Sending results for {} keywords to {}",
            results.len(),
            self.endpoint
        );

        match self.client.post(&self.endpoint).json(results).send() {
            Ok(resp) if resp.status() == StatusCode::OK => {
                info!("Successfully delivered job data downstream.");
                PublishOutcome::Delivered
            }
            Ok(resp) => {
                error!("Downstream sink rejected results: {}", resp.status());
                PublishOutcome::Rejected(resp.status().as_u16())
            }
            Err(e) => {
                error!("Could not reach downstream sink: {}", e);
                PublishOutcome::Unreachable(e.to_string())
            }
        }
    }
}
