//! Upstream client port trait
//!
//! Defines the interface for the three outbound services a feed can depend on:
//! the comment service, the WFS endpoint and the project-configuration document.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::UpstreamError;

/// Helper to deserialize null as default (empty vec, etc.)
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope of the comment service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub data: CommentPageData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPageData {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub data: Vec<CommentRecord>,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub page_count: i64,
}

/// A single comment as returned by the comment service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub id: String,
    /// Kept raw; parsed leniently during normalization
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub by_nickname: String,
    #[serde(default)]
    pub page: CommentPageRef,
}

/// Page the comment was left on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPageRef {
    #[serde(default)]
    pub url: String,
}

/// GeoJSON FeatureCollection, reduced to what feeds need
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub features: Vec<GeoFeature>,
}

/// GeoJSON Feature. Geometry is not used by feeds and is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoFeature {
    /// Native identifier, a string or a number per RFC 7946
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub properties: Map<String, Value>,
}

/// Named location in the project configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub extent: Vec<f64>,
    #[serde(default)]
    pub content: String,
}

/// Remote project-configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// group -> city id -> bookmark
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub bookmarks: HashMap<String, HashMap<String, Bookmark>>,
    #[serde(default)]
    pub projection: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub zoom_extent: Vec<f64>,
}

impl ProjectConfig {
    pub fn bookmark(&self, group: &str, city: &str) -> Option<&Bookmark> {
        self.bookmarks.get(group).and_then(|g| g.get(city))
    }
}

/// Port trait for outbound HTTP reads
#[async_trait]
pub trait UpstreamClient: Send + Sync + 'static {
    /// Fetch one page of comments
    async fn get_comments(&self, url: &Url) -> Result<CommentPage, UpstreamError>;

    /// Fetch one WFS GetFeature response
    async fn get_features(&self, url: &Url) -> Result<FeatureCollection, UpstreamError>;

    /// Fetch the project-configuration document holding bookmarks
    async fn get_project_config(&self, url: &Url) -> Result<ProjectConfig, UpstreamError>;
}
