pub mod classify;
pub mod config;
pub mod coordinator;
pub mod delay;
pub mod document;
pub mod entities;
pub mod fetch;
pub mod keywords;
pub mod logger;
pub mod pipeline;
pub mod publisher;
pub mod search;
pub mod server;

// Exporting types for convenience
pub use config::Config;
pub use coordinator::{CancelToken, ScrapeCoordinator};
pub use document::{DecodeError, DocumentFormat};
pub use fetch::{FetchOutcome, PageFetcher, PageResult};
pub use keywords::KeywordExtractor;
pub use pipeline::Pipeline;
pub use publisher::{PublishOutcome, ResultPublisher};
pub use search::{ProviderError, SearchProvider};
