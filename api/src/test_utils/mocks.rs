//! Mock implementations of port traits
//!
//! In-memory upstream client that can be configured per test and records
//! every request it receives.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use crate::domain::entities::TYPENAME_PARAM;
use crate::domain::ports::upstream::CommentPageData;
use crate::domain::ports::{
    CommentPage, CommentRecord, FeatureCollection, GeoFeature, ProjectConfig, UpstreamClient,
};
use crate::error::UpstreamError;

// ============================================================================
// Mock Upstream Client
// ============================================================================

#[derive(Clone, Default)]
pub struct MockUpstreamClient {
    /// Layer name -> features returned for it
    layers: Arc<RwLock<HashMap<String, Vec<GeoFeature>>>>,
    /// Layers answering with 503
    failing_layers: Arc<RwLock<HashSet<String>>>,
    /// Layer name -> raw response body, decoded like a real payload
    raw_layers: Arc<RwLock<HashMap<String, String>>>,
    /// `None` makes the comment service fail
    comments: Arc<RwLock<Option<Vec<CommentRecord>>>>,
    /// `None` makes the project-config fetch fail
    project_config: Arc<RwLock<Option<ProjectConfig>>>,
    /// Applied before every response
    delay: Arc<RwLock<Option<Duration>>>,
    feature_requests: Arc<RwLock<Vec<Url>>>,
    comment_requests: Arc<RwLock<Vec<Url>>>,
    project_requests: Arc<RwLock<usize>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the features a layer returns
    pub fn with_layer(self, layer: &str, features: Vec<GeoFeature>) -> Self {
        self.layers
            .write()
            .unwrap()
            .insert(layer.to_string(), features);
        self
    }

    /// Configure a layer to fail with a non-success status
    pub fn with_failing_layer(self, layer: &str) -> Self {
        self.failing_layers
            .write()
            .unwrap()
            .insert(layer.to_string());
        self
    }

    /// Configure a layer to answer 200 with `body` as its payload
    pub fn with_raw_layer(self, layer: &str, body: &str) -> Self {
        self.raw_layers
            .write()
            .unwrap()
            .insert(layer.to_string(), body.to_string());
        self
    }

    pub fn with_comments(self, comments: Vec<CommentRecord>) -> Self {
        *self.comments.write().unwrap() = Some(comments);
        self
    }

    pub fn with_project_config(self, config: ProjectConfig) -> Self {
        *self.project_config.write().unwrap() = Some(config);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    pub fn feature_requests(&self) -> Vec<Url> {
        self.feature_requests.read().unwrap().clone()
    }

    pub fn comment_requests(&self) -> Vec<Url> {
        self.comment_requests.read().unwrap().clone()
    }

    pub fn project_config_requests(&self) -> usize {
        *self.project_requests.read().unwrap()
    }

    async fn simulate_latency(&self) {
        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn status_error(status: u16, url: &Url) -> UpstreamError {
    UpstreamError::Status {
        status,
        url: url.to_string(),
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn get_comments(&self, url: &Url) -> Result<CommentPage, UpstreamError> {
        self.comment_requests.write().unwrap().push(url.clone());
        self.simulate_latency().await;

        let comments = self.comments.read().unwrap().clone();
        match comments {
            Some(data) => Ok(CommentPage {
                data: CommentPageData {
                    comment_count: data.len() as i64,
                    page_size: data.len() as i64,
                    page_count: 1,
                    data,
                },
            }),
            None => Err(status_error(500, url)),
        }
    }

    async fn get_features(&self, url: &Url) -> Result<FeatureCollection, UpstreamError> {
        self.feature_requests.write().unwrap().push(url.clone());
        self.simulate_latency().await;

        let layer = url
            .query_pairs()
            .find(|(k, _)| k == TYPENAME_PARAM)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        if self.failing_layers.read().unwrap().contains(&layer) {
            return Err(status_error(503, url));
        }

        let raw = self.raw_layers.read().unwrap().get(&layer).cloned();
        if let Some(body) = raw {
            return serde_json::from_str(&body)
                .map_err(|e| UpstreamError::Deserialization(e.to_string()));
        }

        let features = self.layers.read().unwrap().get(&layer).cloned();
        match features {
            Some(features) => Ok(FeatureCollection { features }),
            None => Err(status_error(404, url)),
        }
    }

    async fn get_project_config(&self, url: &Url) -> Result<ProjectConfig, UpstreamError> {
        *self.project_requests.write().unwrap() += 1;
        self.simulate_latency().await;

        let config = self.project_config.read().unwrap().clone();
        config.ok_or_else(|| status_error(502, url))
    }
}
