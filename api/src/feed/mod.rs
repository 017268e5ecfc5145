//! Feed module
//!
//! Syndication wire-format rendering.

pub mod renderer;

pub use renderer::{render_rss, RSS_CONTENT_TYPE};
