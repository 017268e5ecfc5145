//! Upstream HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::ports::{CommentPage, FeatureCollection, ProjectConfig, UpstreamClient};
use crate::error::UpstreamError;

/// Implementation of the upstream client over reqwest
pub struct HttpUpstreamClient {
    http: Client,
}

impl HttpUpstreamClient {
    /// `timeout` bounds every single outbound request.
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mapfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        self.handle_response(url, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| UpstreamError::Deserialization(e.to_string()))
        } else {
            Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn get_comments(&self, url: &Url) -> Result<CommentPage, UpstreamError> {
        self.get_json(url).await
    }

    async fn get_features(&self, url: &Url) -> Result<FeatureCollection, UpstreamError> {
        self.get_json(url).await
    }

    async fn get_project_config(&self, url: &Url) -> Result<ProjectConfig, UpstreamError> {
        self.get_json(url).await
    }
}
