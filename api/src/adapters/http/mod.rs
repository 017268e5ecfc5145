//! HTTP adapter
//!
//! reqwest-backed implementation of the upstream client port.

pub mod client;

pub use client::HttpUpstreamClient;
