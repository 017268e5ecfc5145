//! Feed item domain entity
//!
//! The canonical, source-agnostic shape every upstream record is normalized into.

use chrono::{DateTime, Utc};

/// A single entry of a syndication feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Source-unique identifier. Empty means the entry has no usable GUID.
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    /// Creation or last-update time. `None` when the upstream value was missing
    /// or unparsable; such items sort after every dated item.
    pub timestamp: Option<DateTime<Utc>>,
    /// Layer name for WFS features, `comments` for comment records
    pub source: String,
}

impl FeedItem {
    pub fn has_identifier(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Channel-level metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMeta {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: Option<String>,
}

/// A fully aggregated feed, ready for rendering
#[derive(Debug, Clone)]
pub struct Feed {
    pub channel: ChannelMeta,
    pub items: Vec<FeedItem>,
}
