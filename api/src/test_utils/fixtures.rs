//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::app::normalizer::parse_timestamp;
use crate::config::FeedsConfig;
use crate::domain::entities::{Extent, FeedItem};
use crate::domain::ports::upstream::{Bookmark, CommentPageRef};
use crate::domain::ports::{CommentRecord, GeoFeature, ProjectConfig};

/// Feed table used across service and router tests.
///
/// - `/feeds/comments.xml`: comment source
/// - `/feeds/parks.xml`: single layer `parks`
/// - `/feeds/merged.xml`: `parks` + `playgrounds`, capped at 2
/// - `/feeds/three.xml`: `parks` + `playgrounds` + `benches`
pub const TEST_FEEDS_TOML: &str = r#"
base_url = "https://map.example.org"
ows_url = "https://qgis.example.org/ows/"
project_url = "https://map.example.org/api/project"
default_projection = "EPSG:3301"
default_extent = [100.0, 100.0, 900.0, 900.0]

[bookmarks]
group = "cities"
default_city = "tallinn"

[paths."/feeds/comments.xml"]
title = "Comments"
description = "Latest comments"
language = "et"
source = { type = "comments", url = "https://comments.example.org/api/comments", app_id = "map" }

[paths."/feeds/parks.xml"]
title = "Parks"

[paths."/feeds/parks.xml".source]
type = "wfs"
layers = ["parks"]
fields = { title = "name", description = "info", timestamp = "updated" }

[paths."/feeds/merged.xml"]
title = "Merged places"

[paths."/feeds/merged.xml".source]
type = "wfs"
layers = ["parks", "playgrounds"]
params = { MAXFEATURES = 2 }
fields = { title = "name", description = "info", timestamp = "updated" }

[paths."/feeds/three.xml"]
title = "Everything"

[paths."/feeds/three.xml".source]
type = "wfs"
layers = ["parks", "playgrounds", "benches"]
fields = { title = "name", timestamp = "updated" }
"#;

pub fn test_feeds_config() -> FeedsConfig {
    FeedsConfig::from_toml_str(TEST_FEEDS_TOML).expect("test feed configuration is valid")
}

/// Project configuration with bookmarks in the `cities` group
pub fn test_project_config(zoom: Extent, cities: &[(&str, Extent)]) -> ProjectConfig {
    let group: HashMap<String, Bookmark> = cities
        .iter()
        .map(|(id, extent)| {
            (
                id.to_string(),
                Bookmark {
                    id: id.to_string(),
                    title: id.to_uppercase(),
                    rotation: 0.0,
                    extent: extent.as_array().to_vec(),
                    content: String::new(),
                },
            )
        })
        .collect();

    ProjectConfig {
        bookmarks: HashMap::from([("cities".to_string(), group)]),
        projection: "EPSG:3301".to_string(),
        zoom_extent: zoom.as_array().to_vec(),
    }
}

/// GeoJSON feature with `name` and `updated` properties
pub fn test_feature(id: &str, name: &str, updated: &str) -> GeoFeature {
    let properties: Map<String, Value> = json!({
        "name": name,
        "info": format!("{} details", name),
        "updated": updated,
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    GeoFeature {
        id: Some(Value::String(id.to_string())),
        properties,
    }
}

pub fn test_comment(id: &str, nickname: &str, content: &str, created_at: &str) -> CommentRecord {
    CommentRecord {
        id: id.to_string(),
        created_at: Some(created_at.to_string()),
        content: content.to_string(),
        by_nickname: nickname.to_string(),
        page: CommentPageRef {
            url: format!("https://map.example.org/?comment={}", id),
        },
    }
}

/// Normalized item from the `parks` layer
pub fn test_item(id: &str, timestamp: Option<&str>) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        title: format!("Item {}", id),
        description: String::new(),
        link: format!("https://map.example.org/?features={}", id),
        timestamp: timestamp.and_then(parse_timestamp),
        source: "parks".to_string(),
    }
}
