//! Domain entities
//!
//! Pure domain models for feeds, their sources and spatial extents.

pub mod extent;
pub mod feed_item;
pub mod source;

pub use extent::{Extent, ExtentParseError};
pub use feed_item::{ChannelMeta, Feed, FeedItem};
pub use source::{
    CommentsSource, FeedDefinition, FieldMapping, SourceSpec, WfsSource, TYPENAME_PARAM,
};
