//! Feed service
//!
//! Builds one feed per request: look up the definition, resolve the extent,
//! fetch, normalize and aggregate. The whole pipeline runs under a deadline;
//! when it expires every in-flight upstream request is dropped.

use std::sync::Arc;
use std::time::Duration;

use crate::app::aggregator::aggregate;
use crate::app::extent_resolver::{ExtentResolver, FeedQuery};
use crate::app::normalizer::{normalize_comment, normalize_feature};
use crate::app::source_fetcher::SourceFetcher;
use crate::config::FeedsConfig;
use crate::domain::entities::{
    ChannelMeta, CommentsSource, Feed, FeedDefinition, FeedItem, SourceSpec, WfsSource,
};
use crate::domain::ports::UpstreamClient;
use crate::error::AppError;

/// Service for generating feeds
pub struct FeedService<C>
where
    C: UpstreamClient,
{
    config: Arc<FeedsConfig>,
    extents: ExtentResolver<C>,
    fetcher: SourceFetcher<C>,
    deadline: Duration,
}

impl<C> FeedService<C>
where
    C: UpstreamClient,
{
    pub fn new(
        client: Arc<C>,
        config: Arc<FeedsConfig>,
        deadline: Duration,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            extents: ExtentResolver::new(client.clone(), &config),
            fetcher: SourceFetcher::new(
                client,
                config.ows_url.clone(),
                config.default_projection.clone(),
                fetch_concurrency,
            ),
            config,
            deadline,
        }
    }

    /// Generate the feed served at `path`
    pub async fn generate_feed(&self, path: &str, query: &FeedQuery) -> Result<Feed, AppError> {
        let definition = self.config.feed(path).ok_or(AppError::NotFound)?;

        tokio::time::timeout(self.deadline, self.build(definition, query))
            .await
            .map_err(|_| AppError::Timeout)?
    }

    async fn build(
        &self,
        definition: &FeedDefinition,
        query: &FeedQuery,
    ) -> Result<Feed, AppError> {
        let items = match &definition.source {
            SourceSpec::Comments(source) => self.comment_items(source).await?,
            SourceSpec::Wfs(source) => self.wfs_items(source, query).await?,
        };

        tracing::info!(
            "Built {} feed {:?} with {} items",
            definition.source.kind(),
            definition.title,
            items.len()
        );

        Ok(Feed {
            channel: self.channel(definition),
            items,
        })
    }

    async fn comment_items(&self, source: &CommentsSource) -> Result<Vec<FeedItem>, AppError> {
        let comments = self.fetcher.fetch_comments(source).await?;
        Ok(comments.iter().map(normalize_comment).collect())
    }

    async fn wfs_items(
        &self,
        source: &WfsSource,
        query: &FeedQuery,
    ) -> Result<Vec<FeedItem>, AppError> {
        let resolved = self.extents.resolve(query).await;
        if self.config.strict_extent {
            if let Some(warning) = resolved.invalid_bbox() {
                return Err(AppError::InvalidExtent(warning.to_string()));
            }
        }

        let batches = self.fetcher.fetch_layers(source, &resolved.extent).await?;
        let base_link = self.config.base_link();

        let layers: Vec<Vec<FeedItem>> = batches
            .iter()
            .map(|batch| {
                batch
                    .features
                    .iter()
                    .map(|f| normalize_feature(f, &batch.layer, &source.fields, base_link))
                    .collect()
            })
            .collect();

        Ok(aggregate(layers, source.item_cap()))
    }

    fn channel(&self, definition: &FeedDefinition) -> ChannelMeta {
        ChannelMeta {
            title: definition.title.clone(),
            description: definition.description.clone(),
            link: self.config.base_url.clone(),
            language: definition.language.clone(),
        }
    }
}
