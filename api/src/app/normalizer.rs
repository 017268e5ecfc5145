//! Record normalizer
//!
//! Maps raw upstream records onto [`FeedItem`]. Extraction is best effort:
//! missing or mistyped values become empty strings or an absent timestamp.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::entities::{FeedItem, FieldMapping};
use crate::domain::ports::{CommentRecord, GeoFeature};

/// Comment bodies longer than this are cut, ellipsis included
pub const COMMENT_PREVIEW_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Source tag of comment items
pub const COMMENTS_SOURCE: &str = "comments";

/// Parse an RFC 3339 timestamp with optional fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Cut `text` to at most `max_chars` characters, the last three being `...`.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let ellipsis_len = ELLIPSIS.chars().count();
    if max_chars <= ellipsis_len {
        return ELLIPSIS.to_string();
    }
    let kept: String = text.chars().take(max_chars - ellipsis_len).collect();
    format!("{}{}", kept, ELLIPSIS)
}

fn string_property(properties: &Map<String, Value>, key: Option<&str>) -> String {
    key.and_then(|k| properties.get(k))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn native_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Normalize a WFS feature.
///
/// `base_link` is the map client URL without a trailing slash; the item links
/// back to the feature on the map.
pub fn normalize_feature(
    feature: &GeoFeature,
    layer: &str,
    fields: &FieldMapping,
    base_link: &str,
) -> FeedItem {
    let properties = &feature.properties;

    let id = match fields.id.as_deref() {
        Some(key) => native_id(properties.get(key)),
        None => native_id(feature.id.as_ref()),
    };

    let timestamp = fields
        .timestamp
        .as_deref()
        .and_then(|key| properties.get(key))
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    FeedItem {
        link: format!("{}/?features={}", base_link, id),
        id,
        title: string_property(properties, fields.title.as_deref()),
        description: string_property(properties, fields.description.as_deref()),
        timestamp,
        source: layer.to_string(),
    }
}

/// Normalize a comment: `"<nickname>: <preview>"` as both title and description.
pub fn normalize_comment(comment: &CommentRecord) -> FeedItem {
    let text = format!(
        "{}: {}",
        comment.by_nickname,
        truncate_chars(&comment.content, COMMENT_PREVIEW_CHARS)
    );

    FeedItem {
        id: comment.id.clone(),
        title: text.clone(),
        description: text,
        link: comment.page.url.clone(),
        timestamp: comment.created_at.as_deref().and_then(parse_timestamp),
        source: COMMENTS_SOURCE.to_string(),
    }
}
