//! HTTP handlers
//!
//! Axum request handlers for the feed endpoints.

pub mod feed;

pub use feed::serve_feed;
