//! Feed renderer
//!
//! Renders aggregated feeds to RSS 2.0.

use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, Item, ItemBuilder};

use crate::domain::entities::{Feed, FeedItem};
use crate::error::AppError;

/// MIME type of rendered feeds
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Render a feed to an RSS document. Items keep their order one-to-one.
pub fn render_rss(feed: &Feed) -> Result<String, AppError> {
    let items: Vec<Item> = feed.items.iter().map(render_item).collect();

    let channel = ChannelBuilder::default()
        .title(feed.channel.title.clone())
        .link(feed.channel.link.clone())
        .description(feed.channel.description.clone())
        .language(feed.channel.language.clone())
        .items(items)
        .build();

    let buf = channel
        .write_to(Vec::new())
        .map_err(|e| AppError::Render(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| AppError::Render(e.to_string()))
}

fn render_item(item: &FeedItem) -> Item {
    // Entries without an identifier are still emitted, just without a GUID
    let guid = item.has_identifier().then(|| {
        GuidBuilder::default()
            .value(item.id.clone())
            .permalink(false)
            .build()
    });

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(item.link.clone()))
        .description(Some(item.description.clone()))
        .guid(guid)
        .pub_date(item.timestamp.map(|t| t.to_rfc2822()))
        .categories(vec![CategoryBuilder::default()
            .name(item.source.clone())
            .build()])
        .build()
}
