//! Application layer
//!
//! Contains the feed pipeline and its orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod aggregator;
pub mod extent_resolver;
pub mod feed_service;
pub mod normalizer;
pub mod response_cache;
pub mod source_fetcher;

pub use extent_resolver::FeedQuery;
pub use feed_service::FeedService;
pub use response_cache::ResponseCache;
